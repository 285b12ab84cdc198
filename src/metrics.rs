//! Prometheus Metrics Definitions
//!
//! This module owns the metric snapshot exposed by the exporter: one gauge per
//! measured quantity, a tri-state device reachability gauge, and the scrape
//! duration gauge.
//!
//! # Metric Catalogue
//!
//! Per line (labeled `line` ∈ {1,2,3}), all under the `smart_maic_` prefix:
//! - `voltage` (V), `current` (A), `power` (W), `energy` (Wh),
//!   `power_factor`, `frequency` (Hz)
//!
//! Aggregates: `total_current`, `total_power`, `total_energy`, `temperature`.
//!
//! Status: `device_api_status` (0 = Offline, 1 = OK, 2 = Too Many Requests)
//! and the unprefixed `page_scrape_duration_seconds`.
//!
//! # Update Discipline
//!
//! The only mutation paths are [`MetricsCollector::apply_reading`], which
//! replaces every channel value as one batch from an already-validated
//! [`ParsedReading`], and [`MetricsCollector::set_device_status`] /
//! [`MetricsCollector::set_scrape_duration`] on the status side. A failed
//! cycle therefore leaves previously published channel values in place.

use crate::device::{DeviceApiStatus, ParsedReading};
use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

const NAMESPACE: &str = "smart_maic";

/// Line label values, index-aligned with `ParsedReading::lines`.
const LINE_LABELS: [&str; 3] = ["1", "2", "3"];

/// Metric snapshot for the Smart MAIC device
#[derive(Clone)]
pub struct MetricsCollector {
    registry: Arc<Registry>,

    // Per-line channel metrics
    pub voltage: Arc<GaugeVec>,
    pub current: Arc<GaugeVec>,
    pub power: Arc<GaugeVec>,
    pub energy: Arc<GaugeVec>,
    pub power_factor: Arc<GaugeVec>,
    pub frequency: Arc<GaugeVec>,

    // Aggregate metrics
    pub total_current: Arc<Gauge>,
    pub total_power: Arc<Gauge>,
    pub total_energy: Arc<Gauge>,
    pub temperature: Arc<Gauge>,

    // Status metrics
    pub device_api_status: Arc<Gauge>,
    pub scrape_duration_seconds: Arc<Gauge>,
}

impl MetricsCollector {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let voltage = GaugeVec::new(
            Opts::new("voltage", "Voltage per line (V)").namespace(NAMESPACE),
            &["line"],
        )?;

        let current = GaugeVec::new(
            Opts::new("current", "Current per line (A)").namespace(NAMESPACE),
            &["line"],
        )?;

        let power = GaugeVec::new(
            Opts::new("power", "Active Power per line (W)").namespace(NAMESPACE),
            &["line"],
        )?;

        let energy = GaugeVec::new(
            Opts::new("energy", "Energy per line (Wh)").namespace(NAMESPACE),
            &["line"],
        )?;

        let power_factor = GaugeVec::new(
            Opts::new("power_factor", "Power Factor per line").namespace(NAMESPACE),
            &["line"],
        )?;

        let frequency = GaugeVec::new(
            Opts::new("frequency", "Frequency per line (Hz)").namespace(NAMESPACE),
            &["line"],
        )?;

        let total_current = Gauge::with_opts(
            Opts::new("total_current", "Total Current (A)").namespace(NAMESPACE),
        )?;

        let total_power = Gauge::with_opts(
            Opts::new("total_power", "Total Active Power (W)").namespace(NAMESPACE),
        )?;

        let total_energy = Gauge::with_opts(
            Opts::new("total_energy", "Total Energy (Wh)").namespace(NAMESPACE),
        )?;

        let temperature = Gauge::with_opts(
            Opts::new("temperature", "Device Temperature (°C)").namespace(NAMESPACE),
        )?;

        let device_api_status = Gauge::with_opts(
            Opts::new(
                "device_api_status",
                "Device API Status (0 = Offline, 1 = OK, 2 = Too Many Requests)",
            )
            .namespace(NAMESPACE),
        )?;

        // Kept unprefixed for continuity with existing dashboards.
        let scrape_duration_seconds = Gauge::new(
            "page_scrape_duration_seconds",
            "Time taken to scrape the page in seconds.",
        )?;

        registry.register(Box::new(voltage.clone()))?;
        registry.register(Box::new(current.clone()))?;
        registry.register(Box::new(power.clone()))?;
        registry.register(Box::new(energy.clone()))?;
        registry.register(Box::new(power_factor.clone()))?;
        registry.register(Box::new(frequency.clone()))?;
        registry.register(Box::new(total_current.clone()))?;
        registry.register(Box::new(total_power.clone()))?;
        registry.register(Box::new(total_energy.clone()))?;
        registry.register(Box::new(temperature.clone()))?;
        registry.register(Box::new(device_api_status.clone()))?;
        registry.register(Box::new(scrape_duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            voltage: Arc::new(voltage),
            current: Arc::new(current),
            power: Arc::new(power),
            energy: Arc::new(energy),
            power_factor: Arc::new(power_factor),
            frequency: Arc::new(frequency),
            total_current: Arc::new(total_current),
            total_power: Arc::new(total_power),
            total_energy: Arc::new(total_energy),
            temperature: Arc::new(temperature),
            device_api_status: Arc::new(device_api_status),
            scrape_duration_seconds: Arc::new(scrape_duration_seconds),
        })
    }

    /// Project a fully validated reading onto the channel gauges.
    ///
    /// Takes a [`ParsedReading`] rather than a raw reading: every value was
    /// already converted, so this cannot fail partway through a batch.
    pub fn apply_reading(&self, reading: &ParsedReading) {
        for (label, line) in LINE_LABELS.iter().zip(reading.lines.iter()) {
            self.voltage.with_label_values(&[label]).set(line.voltage);
            self.current.with_label_values(&[label]).set(line.current);
            self.power.with_label_values(&[label]).set(line.power);
            self.energy.with_label_values(&[label]).set(line.energy);
            self.power_factor
                .with_label_values(&[label])
                .set(line.power_factor);
            self.frequency
                .with_label_values(&[label])
                .set(line.frequency);
        }

        self.total_current.set(reading.total_current);
        self.total_power.set(reading.total_power);
        self.total_energy.set(reading.total_energy);
        self.temperature.set(reading.temperature);
    }

    pub fn set_device_status(&self, status: DeviceApiStatus) {
        self.device_api_status.set(status.as_f64());
    }

    pub fn set_scrape_duration(&self, seconds: f64) {
        self.scrape_duration_seconds.set(seconds);
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics collector")
    }
}
