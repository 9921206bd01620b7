use ledgeguard_core::deeplink::DeeplinkService;
use ledgeguard_core::position::PositionStore;
use ledgeguard_notify::telegram::TelegramClient;

use crate::config::BotConfig;

/// Everything a command or callback handler needs, built once at startup
/// and shared via `Arc`.
pub struct BotContext {
    /// Bot API client.
    pub telegram: TelegramClient,
    /// Deep-link issuance service (secret injected from config).
    pub deeplink: DeeplinkService,
    /// Mocked position lookup.
    pub positions: PositionStore,
}

impl BotContext {
    pub fn new(config: &BotConfig) -> Self {
        Self {
            telegram: TelegramClient::new(config.telegram_token.clone()),
            deeplink: DeeplinkService::new(
                config.frontend_url.clone(),
                config.deeplink_secret.clone(),
            ),
            positions: PositionStore::new(),
        }
    }
}
