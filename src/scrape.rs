//! Acquisition Orchestrator
//!
//! One inbound scrape request drives one acquisition cycle: fetch the raw
//! payload from the configured [`DeviceSource`], strip the device's HTML
//! wrapper, decode and strictly parse the reading, then publish the whole
//! snapshot.
//!
//! # Sequencing
//!
//! Cycles are fully serialized through a single mutex held for the entire
//! round-trip: the physical device (and its browser session in Browser mode)
//! cannot safely serve overlapping requests. A second trigger blocks until
//! the first cycle completes.
//!
//! # Failure Discipline
//!
//! Every failure is contained within its cycle and reduced to a device status
//! value plus a logged diagnostic. The status gauge is written on every path;
//! channel gauges and the duration gauge are written only on full success, so
//! a degraded device leaves previously published values in place rather than
//! corrupting them with partial or NaN data.

use crate::device::{extract_json, DeviceApiStatus, DeviceSource, ParsedReading, Reading};
use crate::metrics::MetricsCollector;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub struct Scraper {
    source: Box<dyn DeviceSource>,
    metrics: MetricsCollector,
    /// Single-flight gate: at most one device round-trip in flight.
    gate: Mutex<()>,
}

impl Scraper {
    pub fn new(source: Box<dyn DeviceSource>, metrics: MetricsCollector) -> Self {
        Self {
            source,
            metrics,
            gate: Mutex::new(()),
        }
    }

    /// Run one acquisition cycle to completion.
    ///
    /// Never panics and never returns an error: outcomes are published
    /// through the metric snapshot.
    pub async fn run_cycle(&self) {
        let _guard = self.gate.lock().await;
        let started = Instant::now();

        debug!("Starting acquisition cycle");

        match self.acquire_and_decode().await {
            Ok(reading) => {
                self.metrics.set_device_status(DeviceApiStatus::Ok);
                self.metrics.apply_reading(&reading);
                self.metrics
                    .set_scrape_duration(started.elapsed().as_secs_f64());
                info!("Updated metrics in {:?}", started.elapsed());
            }
            Err(e) => {
                let status = e.device_status();
                warn!("Acquisition cycle failed ({:?}): {}", status, e);
                self.metrics.set_device_status(status);
            }
        }
    }

    async fn acquire_and_decode(&self) -> crate::error::Result<ParsedReading> {
        let raw = self.source.fetch_raw().await?;
        debug!("Fetched raw payload ({} bytes)", raw.len());

        let json = extract_json(&raw);
        let reading: Reading = serde_json::from_str(&json)?;
        debug!("Decoded reading from device {}", reading.devid);

        reading.parse()
    }
}
