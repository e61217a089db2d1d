mod api;
mod middleware;
mod state;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use velora_content::ContentClient;

use crate::api::{build_app, AppState};
use crate::state::ContentState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(velora_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(config = ?config, "starting velora server");

    let client = Arc::new(ContentClient::from_config(&config)?);
    let content = ContentState::new();

    // Initial fetch. Failure is non-fatal: the server starts and answers
    // "content unavailable" until the refresh loop succeeds.
    match content.refresh(&client).await {
        Ok(count) => tracing::info!(services = count, "initial content snapshot loaded"),
        Err(e) => tracing::warn!(error = %e, "initial content fetch failed; starting without snapshot"),
    }

    tokio::spawn(state::run_refresh_loop(
        content.clone(),
        Arc::clone(&client),
        Duration::from_secs(config.content_refresh_secs),
    ));

    let app = build_app(AppState {
        content,
        image_base_url: config.image_base_url.clone(),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
