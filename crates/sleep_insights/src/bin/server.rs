use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::signal;
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};

use garmin_client::config::Config;
use sleep_insights::config::ServerConfig;
use sleep_insights::routes::{AppState, router};
use sleep_insights::{ClientState, SleepInsightsService};

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl+c: {e}");
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let server_config = ServerConfig::from_env()?;

    let env_filter = tracing_subscriber::EnvFilter::try_new(&server_config.log_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    info!(log_filter = %server_config.log_filter, "sleep_insights: log filter");

    for warning in Config::warnings() {
        warn!("{warning}");
    }

    let handle = PrometheusBuilder::new().install_recorder()?;

    let service = SleepInsightsService::new(ClientState::from_env())
        .with_fetch_concurrency(server_config.fetch_concurrency);
    let state = Arc::new(AppState {
        service,
        metrics: Some(handle),
    });

    let app = router(state).layer(TimeoutLayer::with_status_code(
        axum::http::StatusCode::REQUEST_TIMEOUT,
        server_config.request_timeout,
    ));

    let addr = server_config.address;
    info!(
        %addr,
        request_timeout_secs = server_config.request_timeout.as_secs(),
        fetch_concurrency = server_config.fetch_concurrency,
        "starting HTTP server"
    );

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {addr}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
