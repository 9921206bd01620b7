use url::Url;

/// Default front-end base URL for deep links.
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

/// Default server-side long-poll timeout in seconds.
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

/// Bot configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot API token.
    pub telegram_token: String,
    /// Deep-link signing secret. Absent means issued links are unsigned.
    pub deeplink_secret: Option<String>,
    /// Base URL of the protection front-end that deep links point at.
    pub frontend_url: Url,
    /// `getUpdates` long-poll timeout in seconds.
    pub poll_timeout_secs: u64,
}

impl BotConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `TELEGRAM_TOKEN` is not set, signalling that the
    /// bot cannot run at all.
    ///
    /// | Variable            | Required | Default                    |
    /// |---------------------|----------|----------------------------|
    /// | `TELEGRAM_TOKEN`    | yes      | —                          |
    /// | `DEEPLINK_SECRET`   | no       | — (unsigned links)         |
    /// | `FRONTEND_URL`      | no       | `http://localhost:3000`    |
    /// | `POLL_TIMEOUT_SECS` | no       | `30`                       |
    pub fn from_env() -> Option<Self> {
        let telegram_token = std::env::var("TELEGRAM_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())?;

        Some(Self {
            telegram_token,
            deeplink_secret: std::env::var("DEEPLINK_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string())
                .parse()
                .expect("FRONTEND_URL must be a valid URL"),
            poll_timeout_secs: std::env::var("POLL_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(DEFAULT_POLL_TIMEOUT_SECS),
        })
    }
}
