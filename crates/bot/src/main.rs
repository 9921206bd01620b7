use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledgeguard_bot::config::BotConfig;
use ledgeguard_bot::context::BotContext;
use ledgeguard_bot::poller;
use ledgeguard_core::contract;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledgeguard_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Some(config) = BotConfig::from_env() else {
        tracing::error!("TELEGRAM_TOKEN environment variable not set");
        std::process::exit(1);
    };

    let info = contract::contract_info();
    tracing::info!(
        contract_id = info.contract_id,
        network = info.network,
        "Ledgeguard bot starting with SafetyVault"
    );

    let ctx = Arc::new(BotContext::new(&config));
    let cancel = CancellationToken::new();

    let poller_handle = tokio::spawn(poller::run(
        Arc::clone(&ctx),
        config.poll_timeout_secs,
        cancel.clone(),
    ));

    tracing::info!("Bot started, polling for updates");

    shutdown_signal().await;

    cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), poller_handle).await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
