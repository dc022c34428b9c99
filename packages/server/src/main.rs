use anyhow::Context;
use server::config::AppConfig;
use server::state::AppState;
use service::BroadcastService;
use store::MessageRepository;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = store::init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    store::ensure_schema(&db)
        .await
        .context("Failed to ensure schema")?;

    let state = AppState {
        service: BroadcastService::new(MessageRepository::new(db)),
    };
    let app = server::build_api_router(state);

    let listener = tokio::net::TcpListener::bind(&config.http.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.http.addr))?;
    info!(addr = %config.http.addr, "broadcast-api started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("broadcast-api stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
