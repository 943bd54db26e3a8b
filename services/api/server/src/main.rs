use anyhow::Context;
use fleet_api::metrics::ServerMetrics;
use fleet_api::shutdown::{ShutdownCoordinator, listen_for_shutdown_signals};
use std::sync::Arc;
use telemetry::metrics::Telemetry;

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;

fn main() {
    let config = match fleet_api::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to build tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    runtime.block_on(async {
        if let Err(e) = setup(config).await {
            tracing::error!("Fatal error during setup: {e:#}");
            std::process::exit(1);
        }
    });
}

fn init_tracing(config: &fleet_api::Config) -> anyhow::Result<()> {
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialize tracing filter")?;

    if config.log_format != "pretty" {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_timer(UtcTime::rfc_3339())
            .with_target(true)
            .with_level(true)
            .json();
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_ansi(true)
            .pretty();
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .init();
    }

    Ok(())
}

async fn setup(config: fleet_api::Config) -> anyhow::Result<()> {
    init_tracing(&config)?;

    let addr: String = format!("0.0.0.0:{}", config.api_service_port);
    tracing::info!(
        version = fleet_api::VERSION.unwrap_or("unknown"),
        max_readings_per_request = config.max_readings_per_request,
        "Starting fleet-api service at: {addr}"
    );

    let shutdown = Arc::new(ShutdownCoordinator::new());

    let metrics =
        ServerMetrics::new(None).context("Failed to create server metrics")?;
    let telemetry = Telemetry::new(Some(metrics))
        .await
        .context("Failed to create telemetry")?;
    telemetry
        .start()
        .await
        .context("Failed to start telemetry")?;
    tracing::info!("Initialized telemetry");

    let app_state = fleet_api::AppState {
        telemetry,
        config: Arc::new(config),
        shutdown: shutdown.clone(),
    };
    let app = fleet_api::router(app_state);

    let shutdown_handle = shutdown.clone();
    tokio::spawn(async move {
        listen_for_shutdown_signals().await;
        shutdown_handle.shutdown().await;
    });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    let shutdown_for_serve = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_for_serve.wait_for_shutdown().await
        })
        .await
        .context("Server exited with error")?;

    tracing::info!("fleet-api stopped");
    Ok(())
}
