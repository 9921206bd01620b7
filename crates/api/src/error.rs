use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ledgeguard_notify::telegram::TelegramError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`TelegramError`] for delivery failures and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON
/// error responses. There is no domain-error variant on purpose: the
/// core operations (issue, verify, position lookup) resolve every
/// failure to a safe default instead of raising.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Outbound Telegram delivery failed.
    #[error("Telegram delivery failed: {0}")]
    Delivery(#[from] TelegramError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A required collaborator is not configured.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- Delivery errors ---
            AppError::Delivery(err) => classify_delivery_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                msg.clone(),
            ),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a Telegram error into an HTTP status, error code, and message.
///
/// - An unreachable chat (unknown id, bot blocked) maps to 502 with a
///   distinct code so the front-end can tell the user.
/// - Everything else maps to a generic 502 delivery failure.
fn classify_delivery_error(err: &TelegramError) -> (StatusCode, &'static str, String) {
    if err.is_chat_unreachable() {
        tracing::error!(error = %err, "Telegram chat unreachable");
        (
            StatusCode::BAD_GATEWAY,
            "CHAT_UNREACHABLE",
            "Chat not found in Telegram or bot blocked by user".to_string(),
        )
    } else {
        tracing::error!(error = %err, "Telegram delivery error");
        (
            StatusCode::BAD_GATEWAY,
            "DELIVERY_FAILED",
            "Failed to send Telegram notification".to_string(),
        )
    }
}
