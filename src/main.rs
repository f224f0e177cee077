use std::{error::Error, sync::Arc};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use yata_server::{app_state::AppState, data_access::data_context::DataContext, map_routes, settings::Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // ── Settings & logging ─────────────────────────────────────
    let settings = Settings::load()?;
    init_tracing(&settings.log_filter);

    // ── Task store ─────────────────────────────────────────────
    let data_context = DataContext::new(&settings.database_path)?;
    tracing::info!(path = %settings.database_path, "task store opened");

    // ── Router ─────────────────────────────────────────────────
    let address = settings.socket_address();
    let state = Arc::new(AppState::new(data_context, settings));
    let app = map_routes(state);

    // ── Start ──────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("server running on http://{address}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
