#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use url::Url;

use ledgeguard_api::config::ServerConfig;
use ledgeguard_api::router::build_app_router;
use ledgeguard_api::state::AppState;
use ledgeguard_core::deeplink::DeeplinkService;
use ledgeguard_notify::telegram::TelegramClient;

/// Signing secret used by every test app.
pub const TEST_SECRET: &str = "topsecret";

/// Bot token used by every test app that has Telegram configured.
pub const TEST_TOKEN: &str = "42:TEST";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:3000` as CORS origin and front-end base
/// (matching the dev defaults) and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        frontend_url: Url::parse("http://localhost:3000").unwrap(),
        telegram_token: Some(TEST_TOKEN.to_string()),
        deeplink_secret: Some(TEST_SECRET.to_string()),
    }
}

/// Build the full application router with all middleware layers.
///
/// `telegram_api_base` points the Telegram client at a mock server;
/// pass `None` to simulate a deployment without a bot token.
pub fn build_test_app(telegram_api_base: Option<&str>) -> Router {
    let mut config = test_config();
    if telegram_api_base.is_none() {
        config.telegram_token = None;
    }

    let deeplink = Arc::new(DeeplinkService::new(
        config.frontend_url.clone(),
        config.deeplink_secret.clone(),
    ));

    let telegram = telegram_api_base
        .map(|base| Arc::new(TelegramClient::new(TEST_TOKEN).with_api_base(base)));

    let state = AppState {
        config: Arc::new(config.clone()),
        deeplink,
        telegram,
    };

    build_app_router(state, &config)
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a POST request with a JSON body against the app.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a JSON error body with the given code.
pub async fn assert_error_code(response: Response, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code);
}
