//! Smart MAIC Prometheus Exporter
//!
//! A Prometheus metrics exporter for Smart MAIC single- and three-phase
//! energy meters.
//!
//! # Overview
//!
//! The exporter acquires one reading from the meter's embedded web interface
//! per Prometheus scrape and republishes it as a snapshot of named gauges
//! (voltage, current, power, energy, power factor, frequency per line, plus
//! aggregates and device temperature).
//!
//! Two acquisition strategies exist, selected once per deployment:
//!
//! - **Http**: a direct GET of the device's JSON endpoint.
//! - **Browser**: headless-Chromium acquisition for firmware that puts the
//!   JSON endpoint behind a PIN-protected login page.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   HTTP / CDP    ┌───────────────────┐
//! │ Smart MAIC  │ ◄─────────────► │     Exporter      │
//! │   device    │                 │  ┌─────────────┐  │     HTTP     ┌────────────┐
//! └─────────────┘                 │  │   Scraper   │  │ ◄──────────► │ Prometheus │
//!                                 │  └─────────────┘  │   /metrics   └────────────┘
//!                                 │  ┌─────────────┐  │
//!                                 │  │   Metrics   │  │
//!                                 │  └─────────────┘  │
//!                                 └───────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`device`] - Acquisition sources, login session, and payload types
//! - [`scrape`] - Per-scrape acquisition orchestration
//! - [`metrics`] - Prometheus metric definitions
//! - [`server`] - HTTP server
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use smart_maic_exporter::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod metrics;
pub mod scrape;
pub mod server;
