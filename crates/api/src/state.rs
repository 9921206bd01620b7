use std::sync::Arc;

use ledgeguard_core::deeplink::DeeplinkService;
use ledgeguard_notify::telegram::TelegramClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Deep-link issuance/verification service.
    pub deeplink: Arc<DeeplinkService>,
    /// Telegram delivery client; `None` when no token is configured.
    pub telegram: Option<Arc<TelegramClient>>,
}
