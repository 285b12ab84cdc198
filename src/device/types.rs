//! Smart MAIC Payload Type Definitions
//!
//! Rust struct definitions for the JSON document served by the device at
//! `/?page=getwdata`, plus the parsed form handed to the metric layer.
//!
//! # Design Notes
//!
//! - **String-encoded numbers**: the device reports every measured value as a
//!   decimal number encoded as a string, sometimes with embedded whitespace
//!   (e.g. `"12.50 "`). [`ChannelValue::parse`] is the single conversion
//!   point; a value that does not clean up to a finite float is a hard error
//!   for the whole cycle, never a default.
//! - **Informational fields**: `devid`, `time`, `pout`, `powset` and the four
//!   breaker descriptors are decoded for completeness but not exported as
//!   metrics.
//! - **Two-phase decoding**: [`Reading::parse`] converts all 22 channel values
//!   before any gauge is written, so a single bad channel can never leave the
//!   snapshot partially updated.

#![allow(dead_code)] // Informational payload fields are kept for completeness
use crate::error::{ExporterError, Result};
use serde::Deserialize;

/// Reachability classification of the device for the most recent cycle.
///
/// Exported as the `smart_maic_device_api_status` gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceApiStatus {
    Offline,
    Ok,
    TooManyRequests,
}

impl DeviceApiStatus {
    pub fn as_f64(self) -> f64 {
        match self {
            DeviceApiStatus::Offline => 0.0,
            DeviceApiStatus::Ok => 1.0,
            DeviceApiStatus::TooManyRequests => 2.0,
        }
    }
}

/// One full device snapshot as decoded from a scrape response.
///
/// Constructed fresh on every successful decode and discarded after being
/// projected into metrics; never persisted or diffed against a prior reading.
#[derive(Debug, Deserialize)]
pub struct Reading {
    pub devid: String,
    pub time: serde_json::Number,
    pub pout: String,
    pub powset: String,
    pub data: DeviceData,
}

#[derive(Debug, Deserialize)]
pub struct DeviceData {
    #[serde(rename = "A")]
    pub total_current: ChannelValue,
    #[serde(rename = "W")]
    pub total_power: ChannelValue,
    #[serde(rename = "TWh")]
    pub total_energy: ChannelValue,
    #[serde(rename = "T")]
    pub temperature: ChannelValue,

    #[serde(rename = "V1")]
    pub voltage_1: ChannelValue,
    #[serde(rename = "V2")]
    pub voltage_2: ChannelValue,
    #[serde(rename = "V3")]
    pub voltage_3: ChannelValue,

    #[serde(rename = "A1")]
    pub current_1: ChannelValue,
    #[serde(rename = "A2")]
    pub current_2: ChannelValue,
    #[serde(rename = "A3")]
    pub current_3: ChannelValue,

    #[serde(rename = "W1")]
    pub power_1: ChannelValue,
    #[serde(rename = "W2")]
    pub power_2: ChannelValue,
    #[serde(rename = "W3")]
    pub power_3: ChannelValue,

    #[serde(rename = "Wh1")]
    pub energy_1: ChannelValue,
    #[serde(rename = "Wh2")]
    pub energy_2: ChannelValue,
    #[serde(rename = "Wh3")]
    pub energy_3: ChannelValue,

    #[serde(rename = "PF1")]
    pub power_factor_1: ChannelValue,
    #[serde(rename = "PF2")]
    pub power_factor_2: ChannelValue,
    #[serde(rename = "PF3")]
    pub power_factor_3: ChannelValue,

    #[serde(rename = "Fr1")]
    pub frequency_1: ChannelValue,
    #[serde(rename = "Fr2")]
    pub frequency_2: ChannelValue,
    #[serde(rename = "Fr3")]
    pub frequency_3: ChannelValue,

    #[serde(rename = "br0", default)]
    pub breaker_0: Option<Breaker>,
    #[serde(rename = "br1", default)]
    pub breaker_1: Option<Breaker>,
    #[serde(rename = "br2", default)]
    pub breaker_2: Option<Breaker>,
    #[serde(rename = "br3", default)]
    pub breaker_3: Option<Breaker>,
}

/// One measured quantity: display name, unit, and the raw string-encoded value.
#[derive(Debug, Deserialize, Clone)]
pub struct ChannelValue {
    pub name: String,
    pub unit: String,
    pub value: String,
}

/// Breaker descriptor. Informational only, never exported.
#[derive(Debug, Deserialize, Clone)]
pub struct Breaker {
    pub name: String,
}

impl ChannelValue {
    /// Strict conversion of the raw string value to `f64`.
    ///
    /// All whitespace is stripped before parsing. Non-numeric and non-finite
    /// values (`"N/A"`, `""`, `"nan"`) are errors: a silently wrong electrical
    /// reading is worse than a stale one.
    pub fn parse(&self, field: &'static str) -> Result<f64> {
        let cleaned: String = self.value.chars().filter(|c| !c.is_whitespace()).collect();

        match cleaned.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(ExporterError::Value {
                field,
                raw: self.value.clone(),
            }),
        }
    }
}

/// Per-line values after strict parsing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineValues {
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
    pub energy: f64,
    pub power_factor: f64,
    pub frequency: f64,
}

/// A fully validated reading: every exported value already converted to `f64`.
///
/// Produced by [`Reading::parse`]; the metric layer only ever publishes from
/// this type, which is what makes publication all-or-nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedReading {
    pub lines: [LineValues; 3],
    pub total_current: f64,
    pub total_power: f64,
    pub total_energy: f64,
    pub temperature: f64,
}

impl Reading {
    /// Parse all 22 exported channel values, failing on the first bad one.
    pub fn parse(&self) -> Result<ParsedReading> {
        let d = &self.data;

        let lines = [
            LineValues {
                voltage: d.voltage_1.parse("V1")?,
                current: d.current_1.parse("A1")?,
                power: d.power_1.parse("W1")?,
                energy: d.energy_1.parse("Wh1")?,
                power_factor: d.power_factor_1.parse("PF1")?,
                frequency: d.frequency_1.parse("Fr1")?,
            },
            LineValues {
                voltage: d.voltage_2.parse("V2")?,
                current: d.current_2.parse("A2")?,
                power: d.power_2.parse("W2")?,
                energy: d.energy_2.parse("Wh2")?,
                power_factor: d.power_factor_2.parse("PF2")?,
                frequency: d.frequency_2.parse("Fr2")?,
            },
            LineValues {
                voltage: d.voltage_3.parse("V3")?,
                current: d.current_3.parse("A3")?,
                power: d.power_3.parse("W3")?,
                energy: d.energy_3.parse("Wh3")?,
                power_factor: d.power_factor_3.parse("PF3")?,
                frequency: d.frequency_3.parse("Fr3")?,
            },
        ];

        Ok(ParsedReading {
            lines,
            total_current: d.total_current.parse("A")?,
            total_power: d.total_power.parse("W")?,
            total_energy: d.total_energy.parse("TWh")?,
            temperature: d.temperature.parse("T")?,
        })
    }
}
