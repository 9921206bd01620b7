//! Telegram Bot API client.
//!
//! [`TelegramClient`] speaks the HTTP Bot API directly: `sendMessage`,
//! `editMessageText`, `answerCallbackQuery` for outbound traffic and
//! `getUpdates` long polling for the bot loop. Outbound sends are retried
//! with exponential backoff on transport failures; API-level rejections
//! (bad chat id, blocked bot) are not retried since they will not heal.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Production Bot API host.
const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Retry delays in seconds for transient send failures (1s, 2s, 4s).
const RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

/// HTTP request timeout for a single non-polling call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Extra slack on top of the long-poll timeout before the HTTP request
/// itself is abandoned.
const POLL_TIMEOUT_MARGIN: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for Telegram API failures.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Telegram accepted the request but rejected it at the API level.
    #[error("Telegram API error {code}: {description}")]
    Api { code: i64, description: String },

    /// The response body did not match the Bot API envelope.
    #[error("Malformed Telegram response")]
    MalformedResponse,
}

impl TelegramError {
    /// Whether the failure means the target chat is unreachable (unknown
    /// chat id, or the user blocked the bot). Callers surface this
    /// distinctly instead of retrying.
    pub fn is_chat_unreachable(&self) -> bool {
        match self {
            TelegramError::Api { code, description } => {
                *code == 403 || description.to_lowercase().contains("chat not found")
            }
            _ => false,
        }
    }

    /// Transport-level failures are worth retrying; API rejections are not.
    fn is_transient(&self) -> bool {
        matches!(self, TelegramError::Request(_))
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Bot API response envelope: `{ok, result}` or `{ok, error_code,
/// description}`.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    error_code: Option<i64>,
    description: Option<String>,
}

/// Inline keyboard attached to a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    /// A keyboard of button rows.
    pub fn new(rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        Self {
            inline_keyboard: rows,
        }
    }

    /// A keyboard with a single one-button row.
    pub fn single(button: InlineKeyboardButton) -> Self {
        Self::new(vec![vec![button]])
    }
}

/// One inline button: either a URL button or a callback button.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
}

impl InlineKeyboardButton {
    /// Button that opens a URL.
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
            callback_data: None,
        }
    }

    /// Button that fires a callback query with the given data.
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
            callback_data: Some(data.into()),
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
struct EditMessageTextRequest<'a> {
    chat_id: &'a str,
    message_id: i64,
    text: &'a str,
    parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
struct AnswerCallbackQueryRequest<'a> {
    callback_query_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
}

/// A delivered message, as echoed back by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
}

/// A callback query fired by an inline keyboard button.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

/// One long-poll update: a message, a callback query, or something we
/// ignore.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

// ---------------------------------------------------------------------------
// TelegramClient
// ---------------------------------------------------------------------------

/// HTTP client for one bot token.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl TelegramClient {
    /// Create a client for the production Bot API.
    pub fn new(token: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            api_base: TELEGRAM_API_BASE.to_string(),
            token: token.into(),
        }
    }

    /// Point the client at a different API host (tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Send a Markdown message, optionally with an inline keyboard.
    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, TelegramError> {
        self.call(
            "sendMessage",
            &SendMessageRequest {
                chat_id,
                text,
                parse_mode: "Markdown",
                reply_markup: keyboard,
            },
        )
        .await
    }

    /// Send a message, retrying transient transport failures with
    /// exponential backoff (1 s, 2 s, 4 s). API-level rejections are
    /// returned immediately.
    pub async fn send_message_with_retry(
        &self,
        chat_id: &str,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, TelegramError> {
        let mut last_err: Option<TelegramError> = None;

        for (attempt, delay_secs) in RETRY_DELAYS_SECS.iter().enumerate() {
            match self.send_message(chat_id, text, keyboard).await {
                Ok(message) => return Ok(message),
                Err(e) if e.is_transient() => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        chat_id,
                        error = %e,
                        "Telegram send attempt failed, retrying"
                    );
                    last_err = Some(e);
                    tokio::time::sleep(Duration::from_secs(*delay_secs)).await;
                }
                Err(e) => return Err(e),
            }
        }

        // Final attempt after the last backoff.
        match self.send_message(chat_id, text, keyboard).await {
            Ok(message) => Ok(message),
            Err(e) => {
                tracing::error!(chat_id, error = %e, "Telegram send failed after all retries");
                Err(last_err.unwrap_or(e))
            }
        }
    }

    /// Replace the text (and keyboard) of a previously sent message.
    pub async fn edit_message_text(
        &self,
        chat_id: &str,
        message_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, TelegramError> {
        self.call(
            "editMessageText",
            &EditMessageTextRequest {
                chat_id,
                message_id,
                text,
                parse_mode: "Markdown",
                reply_markup: keyboard,
            },
        )
        .await
    }

    /// Acknowledge a callback query, optionally flashing a toast.
    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> Result<bool, TelegramError> {
        self.call(
            "answerCallbackQuery",
            &AnswerCallbackQueryRequest {
                callback_query_id,
                text,
            },
        )
        .await
    }

    /// Long-poll for updates after `offset`, waiting up to
    /// `timeout_secs` server-side.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let url = self.method_url("getUpdates");
        let response = self
            .client
            .post(&url)
            // The long poll must outlive the default request timeout.
            .timeout(Duration::from_secs(timeout_secs) + POLL_TIMEOUT_MARGIN)
            .json(&GetUpdatesRequest {
                offset,
                timeout: timeout_secs,
            })
            .send()
            .await?;
        Self::unwrap_envelope(response.json().await?)
    }

    /// POST a method call and unwrap the response envelope.
    async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        body: &impl Serialize,
    ) -> Result<R, TelegramError> {
        let url = self.method_url(method);
        let response = self.client.post(&url).json(body).send().await?;
        Self::unwrap_envelope(response.json().await?)
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    fn unwrap_envelope<R>(envelope: ApiResponse<R>) -> Result<R, TelegramError> {
        if envelope.ok {
            envelope.result.ok_or(TelegramError::MalformedResponse)
        } else {
            Err(TelegramError::Api {
                code: envelope.error_code.unwrap_or(0),
                description: envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
