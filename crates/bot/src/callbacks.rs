//! Inline-keyboard callback parsing and handling.
//!
//! The protect flow is the reason this bot exists: a button press binds
//! the pressing user to a position and answers with an HMAC-signed deep
//! link into the protection front-end.

use ledgeguard_core::contract;
use ledgeguard_notify::render::{self, CALLBACK_DETAILS_PREFIX, CALLBACK_PROTECT_PREFIX};
use ledgeguard_notify::telegram::{CallbackQuery, TelegramError};

use crate::context::BotContext;

/// A recognized callback action with its position id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Protect(String),
    Details(String),
}

impl CallbackAction {
    /// Parse callback data (`protect_<id>` / `details_<id>`).
    pub fn parse(data: &str) -> Option<Self> {
        if let Some(id) = data.strip_prefix(CALLBACK_PROTECT_PREFIX) {
            (!id.is_empty()).then(|| CallbackAction::Protect(id.to_string()))
        } else if let Some(id) = data.strip_prefix(CALLBACK_DETAILS_PREFIX) {
            (!id.is_empty()).then(|| CallbackAction::Details(id.to_string()))
        } else {
            None
        }
    }
}

/// Handle one callback query end to end.
pub async fn handle_callback(ctx: &BotContext, query: &CallbackQuery) -> Result<(), TelegramError> {
    let action = query.data.as_deref().and_then(CallbackAction::parse);

    // Without the originating message there is nothing to edit; just
    // acknowledge so the client stops its spinner.
    let Some(message) = &query.message else {
        ctx.telegram.answer_callback_query(&query.id, None).await?;
        tracing::warn!(callback_id = %query.id, "Callback query without message");
        return Ok(());
    };
    let chat_id = message.chat.id.to_string();

    match action {
        Some(CallbackAction::Protect(position_id)) => {
            ctx.telegram
                .answer_callback_query(&query.id, Some("\u{1F6E1} Protection activated!"))
                .await?;

            let user_id = query.from.id.to_string();
            let link = ctx.deeplink.issue(&position_id, &user_id);
            tracing::info!(
                %position_id,
                %user_id,
                signed = link.is_signed(),
                "Issued protection deep link"
            );

            let text = render::protection_activated(&link);
            let keyboard = render::open_app_keyboard(&link);
            ctx.telegram
                .edit_message_text(&chat_id, message.message_id, &text, Some(&keyboard))
                .await?;
        }

        Some(CallbackAction::Details(position_id)) => {
            ctx.telegram.answer_callback_query(&query.id, None).await?;

            let position = ctx.positions.position_details(&position_id);
            let text = render::position_details(&position, &contract::contract_info());
            let keyboard = render::details_keyboard(&position_id);
            ctx.telegram
                .edit_message_text(&chat_id, message.message_id, &text, Some(&keyboard))
                .await?;
        }

        None => {
            ctx.telegram.answer_callback_query(&query.id, None).await?;
            tracing::warn!(callback_id = %query.id, data = ?query.data, "Unknown callback action");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_protect_action() {
        assert_eq!(
            CallbackAction::parse("protect_XLM-123"),
            Some(CallbackAction::Protect("XLM-123".to_string()))
        );
    }

    #[test]
    fn parses_details_action() {
        assert_eq!(
            CallbackAction::parse("details_XLM-123"),
            Some(CallbackAction::Details("XLM-123".to_string()))
        );
    }

    #[test]
    fn rejects_empty_position_id() {
        assert_eq!(CallbackAction::parse("protect_"), None);
        assert_eq!(CallbackAction::parse("details_"), None);
    }

    #[test]
    fn rejects_unknown_data() {
        assert_eq!(CallbackAction::parse("refinance_XLM-123"), None);
        assert_eq!(CallbackAction::parse(""), None);
    }
}
