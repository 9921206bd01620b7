//! Slash-command parsing and handling.

use ledgeguard_core::contract;
use ledgeguard_core::position::DEMO_POSITION_ID;
use ledgeguard_notify::render;
use ledgeguard_notify::telegram::TelegramError;

use crate::context::BotContext;

/// Health factor shown by `/demo` after the pretend protection.
const DEMO_NEW_HEALTH: f64 = 1.85;

/// A recognized bot command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Status,
    Alert,
    Contract,
    Demo,
    Ping,
}

impl Command {
    /// Parse the first word of a message as a command.
    ///
    /// Accepts the `/command@botname` form Telegram uses in group chats.
    /// Returns `None` for non-commands and unknown commands.
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        let name = first.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);

        match name {
            "start" => Some(Command::Start),
            "status" => Some(Command::Status),
            "alert" => Some(Command::Alert),
            "contract" => Some(Command::Contract),
            "demo" => Some(Command::Demo),
            "ping" => Some(Command::Ping),
            _ => None,
        }
    }
}

/// Execute a command for the given chat.
pub async fn handle_command(
    ctx: &BotContext,
    command: Command,
    chat_id: &str,
) -> Result<(), TelegramError> {
    tracing::info!(chat_id, ?command, "Handling command");

    match command {
        Command::Start => {
            ctx.telegram
                .send_message(chat_id, &render::welcome(), None)
                .await?;
        }

        Command::Status => {
            let positions = ctx.positions.positions_for_user(chat_id);
            if positions.is_empty() {
                ctx.telegram
                    .send_message(chat_id, &render::no_positions(), None)
                    .await?;
            } else {
                let text = render::status_overview(&positions);
                let keyboard = render::status_keyboard(&positions);
                ctx.telegram
                    .send_message(chat_id, &text, keyboard.as_ref())
                    .await?;
            }
        }

        Command::Alert => {
            // Preview the push alert for the user's riskiest position.
            let positions = ctx.positions.positions_for_user(chat_id);
            let riskiest = positions
                .iter()
                .max_by(|a, b| a.risk_score.total_cmp(&b.risk_score));

            match riskiest {
                Some(position) => {
                    let text = render::liquidation_alert(position, &contract::contract_info());
                    let keyboard = render::alert_keyboard(&position.id);
                    ctx.telegram
                        .send_message(chat_id, &text, Some(&keyboard))
                        .await?;
                }
                None => {
                    ctx.telegram
                        .send_message(chat_id, &render::no_positions(), None)
                        .await?;
                }
            }
        }

        Command::Contract => {
            let text = render::contract_card(&contract::contract_info());
            ctx.telegram.send_message(chat_id, &text, None).await?;
        }

        Command::Demo => {
            let receipt = contract::trigger_protection(DEMO_POSITION_ID);
            let text = render::demo_result(&receipt, DEMO_NEW_HEALTH);
            let keyboard = render::explorer_keyboard(&receipt.tx_hash);
            ctx.telegram
                .send_message(chat_id, &text, Some(&keyboard))
                .await?;
        }

        Command::Ping => {
            ctx.telegram
                .send_message(chat_id, "\u{1F3D3} Pong! Bot is up and polling.", None)
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/status"), Some(Command::Status));
        assert_eq!(Command::parse("/alert"), Some(Command::Alert));
        assert_eq!(Command::parse("/contract"), Some(Command::Contract));
        assert_eq!(Command::parse("/demo"), Some(Command::Demo));
        assert_eq!(Command::parse("/ping"), Some(Command::Ping));
    }

    #[test]
    fn parses_group_chat_form() {
        assert_eq!(Command::parse("/status@ledgeguard_bot"), Some(Command::Status));
    }

    #[test]
    fn ignores_trailing_arguments() {
        assert_eq!(Command::parse("/status please"), Some(Command::Status));
    }

    #[test]
    fn rejects_non_commands() {
        assert_eq!(Command::parse("hello"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("/unknown"), None);
        assert_eq!(Command::parse("status"), None);
    }
}
