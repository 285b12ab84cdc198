use crate::device::DeviceApiStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("device returned 429 Too Many Requests")]
    RateLimited,

    #[error("unexpected HTTP status: {0}")]
    UnexpectedStatus(u16),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("login flow error: {0}")]
    LoginFlow(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("channel {field}: value {raw:?} is not a finite number")]
    Value { field: &'static str, raw: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ExporterError {
    /// How this failure classifies the device for the current cycle.
    ///
    /// Every error kind maps to a status so a failed cycle always leaves a
    /// definite value in the `device_api_status` gauge.
    pub fn device_status(&self) -> DeviceApiStatus {
        match self {
            ExporterError::RateLimited => DeviceApiStatus::TooManyRequests,
            _ => DeviceApiStatus::Offline,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExporterError>;
