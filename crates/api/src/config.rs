use url::Url;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development
/// except the Telegram token, whose absence puts the relay in a
/// degraded mode (health reports it, delivery returns 503).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the protection front-end that deep links point at.
    pub frontend_url: Url,
    /// Bot token for outbound Telegram delivery.
    pub telegram_token: Option<String>,
    /// Deep-link signing secret. Absent means unsigned links and failing
    /// verification.
    pub deeplink_secret: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `5001`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `FRONTEND_URL`         | `http://localhost:3000`    |
    /// | `TELEGRAM_TOKEN`       | — (degraded when unset)    |
    /// | `DEEPLINK_SECRET`      | — (degraded when unset)    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let frontend_url = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .parse()
            .expect("FRONTEND_URL must be a valid URL");

        let telegram_token = std::env::var("TELEGRAM_TOKEN").ok().filter(|t| !t.is_empty());
        let deeplink_secret = std::env::var("DEEPLINK_SECRET").ok().filter(|s| !s.is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            frontend_url,
            telegram_token,
            deeplink_secret,
        }
    }
}
