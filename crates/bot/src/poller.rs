//! Long-polling update loop with backoff and cancellation.
//!
//! Polls `getUpdates`, dispatches each update to the command or callback
//! handler, and keeps going until the [`CancellationToken`] fires. A
//! failed poll backs off exponentially; a failed handler never kills the
//! loop.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use ledgeguard_notify::render;
use ledgeguard_notify::telegram::{CallbackQuery, Update};

use crate::callbacks::handle_callback;
use crate::commands::{handle_command, Command};
use crate::context::BotContext;

/// Delay before the first retry after a failed poll.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Upper bound on the delay between failed polls.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Factor by which the delay grows after each failure.
const BACKOFF_MULTIPLIER: f64 = 2.0;

/// Calculate the next backoff delay, clamped to [`MAX_BACKOFF`].
fn next_delay(current: Duration) -> Duration {
    let next_ms = (current.as_millis() as f64 * BACKOFF_MULTIPLIER) as u64;
    Duration::from_millis(next_ms).min(MAX_BACKOFF)
}

/// Compute the `getUpdates` offset that acknowledges every update in the
/// batch, keeping the current offset when the batch is empty.
fn next_offset(updates: &[Update], current: Option<i64>) -> Option<i64> {
    updates.iter().map(|u| u.update_id + 1).max().or(current)
}

/// Run the update loop until cancelled.
pub async fn run(ctx: Arc<BotContext>, poll_timeout_secs: u64, cancel: CancellationToken) {
    let mut offset: Option<i64> = None;
    let mut backoff = INITIAL_BACKOFF;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Update loop cancelled");
                return;
            }
            result = ctx.telegram.get_updates(offset, poll_timeout_secs) => {
                match result {
                    Ok(updates) => {
                        backoff = INITIAL_BACKOFF;
                        offset = next_offset(&updates, offset);
                        for update in updates {
                            dispatch(&ctx, update).await;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            delay_ms = backoff.as_millis() as u64,
                            "Polling failed, backing off"
                        );
                        tokio::select! {
                            _ = cancel.cancelled() => return,
                            _ = tokio::time::sleep(backoff) => {}
                        }
                        backoff = next_delay(backoff);
                    }
                }
            }
        }
    }
}

/// Route one update to its handler. Handler errors are logged (and, for
/// callbacks, surfaced to the user) but never propagate.
async fn dispatch(ctx: &BotContext, update: Update) {
    if let Some(message) = update.message {
        let Some(text) = &message.text else { return };
        let Some(command) = Command::parse(text) else { return };

        let chat_id = message.chat.id.to_string();
        if let Err(e) = handle_command(ctx, command, &chat_id).await {
            tracing::error!(%chat_id, error = %e, "Command handling failed");
        }
    } else if let Some(query) = update.callback_query {
        if let Err(e) = handle_callback(ctx, &query).await {
            tracing::error!(callback_id = %query.id, error = %e, "Callback handling failed");
            apologize(ctx, &query).await;
        }
    }
}

/// Best-effort replacement of the original message with an apology.
async fn apologize(ctx: &BotContext, query: &CallbackQuery) {
    let Some(message) = &query.message else { return };
    let chat_id = message.chat.id.to_string();

    if let Err(e) = ctx
        .telegram
        .edit_message_text(&chat_id, message.message_id, &render::callback_error(), None)
        .await
    {
        tracing::error!(%chat_id, error = %e, "Failed to deliver error message");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(id: i64) -> Update {
        Update {
            update_id: id,
            message: None,
            callback_query: None,
        }
    }

    #[test]
    fn empty_batch_keeps_offset() {
        assert_eq!(next_offset(&[], None), None);
        assert_eq!(next_offset(&[], Some(7)), Some(7));
    }

    #[test]
    fn offset_acknowledges_highest_update() {
        assert_eq!(next_offset(&[update(3), update(9), update(5)], Some(2)), Some(10));
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let d1 = next_delay(INITIAL_BACKOFF);
        assert_eq!(d1, Duration::from_secs(2));
        assert_eq!(next_delay(d1), Duration::from_secs(4));
        assert_eq!(next_delay(Duration::from_secs(25)), MAX_BACKOFF);
    }
}
