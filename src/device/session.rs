//! Device Login Session
//!
//! Browser-mode acquisition. The device serves its JSON endpoint only to a
//! browser session that has passed the PIN login page, so each scrape drives
//! a short page flow: load the root page, log in if the device asks for it,
//! then open the data endpoint and read back the rendered body.
//!
//! The flow is a straight-line state machine: navigate, decide on login,
//! optionally log in, fetch data. Every page interaction runs under the
//! configured round-trip bound, so a device that stalls mid-flow fails the
//! cycle instead of blocking later scrapes. Any browser fault (missing
//! element, timeout) fails the cycle; there is no retry here. Pages are
//! always closed before returning, success or failure; only the underlying
//! browser connection outlives a scrape.

use crate::config::DeviceConfig;
use crate::device::browser::{BrowserDriver, PageHandle};
use crate::device::source::DeviceSource;
use crate::error::{ExporterError, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Page titles that identify the device's login page.
pub const LOGIN_TITLES: &[&str] = &["Login", "MAIC Login"];

/// Browser-driven [`DeviceSource`].
pub struct DeviceSession {
    driver: Box<dyn BrowserDriver>,
    base_url: String,
    data_url: String,
    pin_code: SecretString,
    nav_timeout: Duration,
}

impl DeviceSession {
    pub fn new(driver: Box<dyn BrowserDriver>, config: &DeviceConfig) -> Result<Self> {
        let pin_code = config
            .pin_code
            .clone()
            .ok_or_else(|| ExporterError::Config("Browser mode requires a PIN code".into()))?;

        Ok(Self {
            driver,
            base_url: config.base_url.clone(),
            data_url: config.data_url(),
            pin_code,
            nav_timeout: Duration::from_secs(config.timeout_seconds),
        })
    }

    /// Run one page interaction under the session's round-trip bound.
    ///
    /// The bound applies to every browser operation, not just navigation: a
    /// login submit or body read that never completes must not hold the
    /// orchestrator's single-flight lock past the timeout.
    async fn bounded<T, F>(&self, what: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match timeout(self.nav_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(ExporterError::Browser(format!(
                "{} timed out after {:?}",
                what, self.nav_timeout
            ))),
        }
    }

    async fn load_page(&self, url: &str) -> Result<Box<dyn PageHandle>> {
        self.bounded(
            &format!("navigation to {}", url),
            self.driver.load_page(url),
        )
        .await
    }

    /// Submit the PIN if the loaded page is a login page, otherwise do nothing.
    ///
    /// The title is not re-checked after the submit navigation: a wrong PIN is
    /// not detected here and surfaces later as a decode failure on the data
    /// page.
    async fn login_if_needed(&self, page: &dyn PageHandle) -> Result<()> {
        let title = page.title().await?;
        debug!("Device root page loaded, title={:?}", title);

        if LOGIN_TITLES.contains(&title.as_str()) {
            debug!("Login page detected, submitting PIN");
            page.fill_and_submit_login(self.pin_code.expose_secret())
                .await?;
        }

        Ok(())
    }

    /// Release a page. A close failure never fails a cycle that has already
    /// produced (or failed to produce) its payload.
    async fn close_page(page: Box<dyn PageHandle>) {
        if let Err(e) = page.close().await {
            warn!("Failed to close browser page: {}", e);
        }
    }
}

#[async_trait]
impl DeviceSource for DeviceSession {
    async fn fetch_raw(&self) -> Result<String> {
        let page = self.load_page(&self.base_url).await?;
        let login = self
            .bounded("login flow", self.login_if_needed(page.as_ref()))
            .await;
        Self::close_page(page).await;
        login?;

        let data_page = self.load_page(&self.data_url).await?;
        let html = self
            .bounded("data page read", data_page.body_html())
            .await;
        Self::close_page(data_page).await;

        html
    }
}
