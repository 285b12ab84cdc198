//! HTTP Server and Scrape Triggering
//!
//! This module implements the Prometheus exporter HTTP server.
//!
//! # Architecture
//!
//! - **HTTP Server**: Axum-based server exposing `/metrics`, `/health`, and `/`
//! - **Pull-triggered acquisition**: there is no background polling loop; each
//!   `/metrics` request runs one acquisition cycle and then serves the
//!   resulting snapshot, so the scrape itself blocks for the device round-trip
//! - **State Management**: shared state (metrics, scraper) using Arc
//!
//! # Endpoints
//!
//! - `GET /` - HTML landing page with links to metrics and health
//! - `GET /metrics` - Runs one acquisition cycle, then renders Prometheus text
//! - `GET /health` - 200 if the last cycle reached the device, 503 otherwise
//!
//! # Error Handling
//!
//! A degraded device never fails the scrape request: acquisition failures are
//! reduced to the `device_api_status` gauge and the response still carries the
//! current snapshot. Only a metrics-rendering fault produces a 500.

use crate::config::{AcquisitionMode, Config};
use crate::device::browser::ChromiumDriver;
use crate::device::{DeviceSession, DeviceSource, HttpSource};
use crate::metrics::MetricsCollector;
use crate::scrape::Scraper;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
struct AppState {
    metrics: MetricsCollector,
    scraper: Arc<Scraper>,
}

pub async fn start(config: Config) -> anyhow::Result<()> {
    let metrics = MetricsCollector::new()?;

    // The acquisition source is process-lifetime; in Browser mode this holds
    // the single shared browser connection.
    let source: Box<dyn DeviceSource> = match config.device.mode {
        AcquisitionMode::Http => Box::new(HttpSource::new(&config.device)?),
        AcquisitionMode::Browser => {
            info!("Launching headless browser for device acquisition");
            let driver = ChromiumDriver::launch().await?;
            Box::new(DeviceSession::new(Box::new(driver), &config.device)?)
        }
    };

    let scraper = Arc::new(Scraper::new(source, metrics.clone()));
    let app = build_router(metrics, scraper);

    // Start the server
    let addr = format!("{}:{}", config.server.addr, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Metrics server listening on {}", addr);
    info!("Metrics available at http://{}/metrics", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Assemble the exporter router around a metric snapshot and scraper.
///
/// Split out from [`start`] so tests can drive the HTTP surface with a stub
/// acquisition source behind the scraper.
pub fn build_router(metrics: MetricsCollector, scraper: Arc<Scraper>) -> Router {
    let state = AppState { metrics, scraper };

    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn root_handler() -> impl IntoResponse {
    axum::response::Html(
        r#"<html>
<head><title>Smart MAIC Exporter</title></head>
<body>
<h1>Smart MAIC Prometheus Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
<p><a href="/health">Health</a></p>
</body>
</html>"#,
    )
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    // One cycle per scrape; overlapping scrapes serialize inside the scraper.
    state.scraper.run_cycle().await;

    match state.metrics.render() {
        Ok(metrics) => metrics.into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    // 1.0 is DeviceApiStatus::Ok; Offline and TooManyRequests are both
    // reported unhealthy.
    if state.metrics.device_api_status.get() == 1.0 {
        (axum::http::StatusCode::OK, "OK")
    } else {
        (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            "Device unreachable",
        )
    }
}
