use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use sefr_api::{create_app, AppState};
use sefr_core::services::{RandomDigitSource, SystemClock};
use sefr_infra::InfrastructureServices;
use sefr_shared::config::{AppConfig, LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging)?;

    tracing::info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting Sefr API server"
    );

    let clock = Arc::new(SystemClock);
    let infra = InfrastructureServices::initialize(&config, clock.clone())
        .await
        .context("failed to initialize infrastructure")?;

    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    let keep_alive = Duration::from_secs(config.server.keep_alive);

    let state = web::Data::new(AppState::build(
        config,
        &infra,
        clock,
        Arc::new(RandomDigitSource),
    ));

    let mut server = HttpServer::new(move || create_app(state.clone())).keep_alive(keep_alive);
    if workers > 0 {
        server = server.workers(workers);
    }

    tracing::info!(address = %bind_address, "Server listening");
    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    infra.shutdown().await;
    tracing::info!("Server stopped");
    Ok(())
}

/// Install the global subscriber; `RUST_LOG` overrides the configured level
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .context("invalid log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(logging.source_location)
        .with_line_number(logging.source_location);

    let installed = match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!(e))
}
