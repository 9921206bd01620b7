//! The notification relay: `POST /api/notify-telegram`.
//!
//! Called by the protection front-end after an off-system transaction
//! completes. When the full receipt (`txHash`, `positionId`,
//! `newHealth`) is present the success notification is rendered
//! server-side; otherwise the caller's `message` is forwarded as-is.
//! Missing optional fields select the basic path, they are never an
//! error.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use ledgeguard_notify::render;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for `POST /api/notify-telegram`.
///
/// `userId` and `message` are required; the rest upgrade the
/// notification to the rendered success card when all are present.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyRequest {
    pub user_id: Option<String>,
    pub message: Option<String>,
    pub tx_hash: Option<String>,
    pub position_id: Option<String>,
    pub new_health: Option<f64>,
}

/// Response body on successful delivery.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyResponse {
    pub success: bool,
    pub message: &'static str,
    pub chat_id: String,
    pub message_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_health: Option<f64>,
}

/// POST /api/notify-telegram
pub async fn notify_telegram(
    State(state): State<AppState>,
    Json(request): Json<NotifyRequest>,
) -> AppResult<Json<NotifyResponse>> {
    let user_id = require_field(request.user_id.as_deref())?;
    let message = require_field(request.message.as_deref())?;

    let telegram = state.telegram.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Telegram delivery is not configured".to_string())
    })?;

    let sent = match (&request.tx_hash, &request.position_id, request.new_health) {
        // Full receipt: render the success card with an explorer button.
        (Some(tx_hash), Some(position_id), Some(new_health)) => {
            tracing::info!(
                user_id,
                %position_id,
                %tx_hash,
                "Relaying protection success notification"
            );
            let text = render::protection_success(position_id, tx_hash, new_health);
            let keyboard = render::explorer_keyboard(tx_hash);
            telegram
                .send_message_with_retry(user_id, &text, Some(&keyboard))
                .await?
        }

        // Basic path: forward the caller's message, attach a transaction
        // button only when a hash came along.
        _ => {
            tracing::info!(user_id, "Relaying basic notification");
            let keyboard = request.tx_hash.as_deref().map(render::explorer_keyboard);
            telegram
                .send_message_with_retry(user_id, message, keyboard.as_ref())
                .await?
        }
    };

    tracing::info!(user_id, message_id = sent.message_id, "Notification delivered");

    Ok(Json(NotifyResponse {
        success: true,
        message: "Notification sent successfully",
        chat_id: user_id.to_string(),
        message_id: sent.message_id,
        tx_hash: request.tx_hash,
        new_health: request.new_health,
    }))
}

/// Reject absent or empty required fields with the documented 400 shape.
fn require_field(value: Option<&str>) -> Result<&str, AppError> {
    value.filter(|v| !v.is_empty()).ok_or_else(|| {
        AppError::BadRequest("Missing required fields: userId, message".to_string())
    })
}

/// Routes mounted at `/api`.
pub fn router() -> Router<AppState> {
    Router::new().route("/notify-telegram", post(notify_telegram))
}
