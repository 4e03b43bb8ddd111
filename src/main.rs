// jobwatch server: HTTP API plus the daily scrape schedule.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use jobwatch::{
    AlertDispatcher, AppConfig, AppState, ChromiumLauncher, JobStore, Pipeline, ScrapeScheduler,
    build_router,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("loading configuration")?;

    let store = JobStore::open(&config.database_url)
        .await
        .with_context(|| format!("opening store at {}", config.database_url))?;

    let dispatcher = AlertDispatcher::from_config(store.clone(), &config.email, &config.chat)
        .context("configuring alert channels")?;
    info!(channels = ?dispatcher.channels(), "Alert channels ready");

    let pipeline = Arc::new(
        Pipeline::new(ChromiumLauncher, store.clone(), dispatcher, config.scrape.clone())
            .with_export_dir(config.export_dir.clone())
            .with_deadline(config.run_deadline),
    );

    let scheduler = ScrapeScheduler::new(pipeline.clone(), config.schedule.clone());
    scheduler.start().await.context("starting scheduler")?;

    let state = Arc::new(AppState {
        store: store.clone(),
        pipeline,
        default_max_pages: config.scrape.max_pages(),
    });
    let app = build_router(state, &config.cors_allow_origins);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    if let Err(e) = scheduler.shutdown().await {
        warn!("Scheduler did not shut down cleanly: {e}");
    }
    store.close().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for ctrl-c: {e}");
    }
}
