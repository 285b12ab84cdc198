use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub device: DeviceConfig,
    pub server: ServerConfig,
}

/// How raw payloads are obtained from the device.
///
/// Exactly one mode is configured per deployment; it is never switched per
/// request.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AcquisitionMode {
    /// Direct HTTP GET of the JSON endpoint.
    #[default]
    Http,
    /// Headless-browser acquisition through the PIN-protected login page.
    Browser,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeviceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub mode: AcquisitionMode,
    /// PIN for the embedded login page. Required in Browser mode.
    #[serde(default)]
    pub pin_code: Option<SecretString>,
    #[serde(default = "default_data_path")]
    pub data_path: String,
    /// Bound on one device round-trip (HTTP request or page navigation).
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_base_url() -> String {
    "http://192.168.10.55".to_string()
}

fn default_data_path() -> String {
    "/?page=getwdata".to_string()
}

fn default_timeout_seconds() -> u64 {
    3
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl DeviceConfig {
    /// Full URL of the device JSON endpoint.
    pub fn data_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.data_path)
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("SMART_MAIC").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let config: Config = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Startup-fatal sanity checks.
    pub fn validate(&self) -> Result<()> {
        if !self.device.base_url.starts_with("http://")
            && !self.device.base_url.starts_with("https://")
        {
            anyhow::bail!(
                "Invalid device base URL {:?}: must start with 'http://' or 'https://'",
                self.device.base_url
            );
        }

        if self.device.mode == AcquisitionMode::Browser && self.device.pin_code.is_none() {
            anyhow::bail!("Browser mode requires a PIN code (PIN_CODE or device.pin_code)");
        }

        Ok(())
    }
}
