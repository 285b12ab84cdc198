//! Device Acquisition Sources
//!
//! A [`DeviceSource`] produces the raw payload for one scrape cycle. Two
//! implementations exist: [`HttpSource`] below for direct HTTP acquisition,
//! and [`DeviceSession`](crate::device::session::DeviceSession) for
//! browser-driven acquisition behind the login page.
//!
//! Transport classification happens here: a 429 and any other non-success
//! status are distinguished before the body is ever looked at, so the
//! orchestrator can map them onto the device status gauge.

use crate::config::DeviceConfig;
use crate::error::{ExporterError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Capability to fetch one raw device payload.
///
/// Implementations own their transport (HTTP client or browser connection),
/// which is process-lifetime; each `fetch_raw` call is one scrape-lifetime
/// round-trip.
#[async_trait]
pub trait DeviceSource: Send + Sync {
    async fn fetch_raw(&self) -> Result<String>;
}

/// Direct HTTP GET acquisition of the device JSON endpoint.
pub struct HttpSource {
    client: reqwest::Client,
    data_url: String,
}

impl HttpSource {
    pub fn new(config: &DeviceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            data_url: config.data_url(),
        })
    }
}

#[async_trait]
impl DeviceSource for HttpSource {
    async fn fetch_raw(&self) -> Result<String> {
        debug!("Fetching data from {}", self.data_url);

        let response = self.client.get(&self.data_url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ExporterError::RateLimited);
        }
        if !status.is_success() {
            return Err(ExporterError::UnexpectedStatus(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
