//! Browser Automation Capability
//!
//! The login-protected acquisition path needs a real rendering browser: the
//! device's login page sets session state that the plain JSON endpoint checks.
//! This module defines the narrow capability the session state machine
//! depends on ([`BrowserDriver`] / [`PageHandle`]) and implements it with
//! headless Chromium over the DevTools protocol.
//!
//! Keeping the capability as a trait lets tests drive the session with a stub
//! instead of a live browser.

use crate::error::{ExporterError, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use tracing::{debug, warn};

/// CSS selector of the PIN input on the login page.
pub const PIN_INPUT_SELECTOR: &str = ".minput";

/// CSS selector of the login submit control.
pub const SUBMIT_SELECTOR: &str = ".msbmit";

/// Process-lifetime browser connection that can open pages.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Load `url` in a fresh page and wait for it to finish loading.
    async fn load_page(&self, url: &str) -> Result<Box<dyn PageHandle>>;
}

/// One open page. Scrape-lifetime: callers must `close` it on every exit path.
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Title of the currently loaded document.
    async fn title(&self) -> Result<String>;

    /// Enter `pin` into the PIN input, activate the submit control, and wait
    /// for the resulting navigation to complete.
    async fn fill_and_submit_login(&self, pin: &str) -> Result<()>;

    /// Outer HTML of the rendered `<body>` element.
    async fn body_html(&self) -> Result<String>;

    async fn close(&self) -> Result<()>;
}

fn browser_err(e: impl std::fmt::Display) -> ExporterError {
    ExporterError::Browser(e.to_string())
}

/// Headless Chromium connection, shared across all scrapes.
pub struct ChromiumDriver {
    browser: Browser,
}

impl ChromiumDriver {
    /// Launch a headless browser and start draining its event stream.
    pub async fn launch() -> Result<Self> {
        let config = BrowserConfig::builder().build().map_err(browser_err)?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(browser_err)?;

        // The CDP event handler must be polled for the connection to make
        // progress; it runs until the browser process exits.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("Browser event handler error: {}", e);
                }
            }
            debug!("Browser event handler finished");
        });

        Ok(Self { browser })
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn load_page(&self, url: &str) -> Result<Box<dyn PageHandle>> {
        let page = self.browser.new_page(url).await.map_err(browser_err)?;
        page.wait_for_navigation().await.map_err(browser_err)?;
        Ok(Box::new(ChromiumPage { page }))
    }
}

struct ChromiumPage {
    page: Page,
}

#[async_trait]
impl PageHandle for ChromiumPage {
    async fn title(&self) -> Result<String> {
        let title = self.page.get_title().await.map_err(browser_err)?;
        Ok(title.unwrap_or_default())
    }

    async fn fill_and_submit_login(&self, pin: &str) -> Result<()> {
        let login_err = |e: chromiumoxide::error::CdpError| ExporterError::LoginFlow(e.to_string());

        let input = self.page.find_element(PIN_INPUT_SELECTOR).await.map_err(login_err)?;
        input.click().await.map_err(login_err)?;
        input.type_str(pin).await.map_err(login_err)?;

        let submit = self.page.find_element(SUBMIT_SELECTOR).await.map_err(login_err)?;
        submit.click().await.map_err(login_err)?;

        self.page.wait_for_navigation().await.map_err(login_err)?;
        Ok(())
    }

    async fn body_html(&self) -> Result<String> {
        self.page
            .evaluate("document.body.outerHTML")
            .await
            .map_err(browser_err)?
            .into_value()
            .map_err(browser_err)
    }

    async fn close(&self) -> Result<()> {
        self.page.clone().close().await.map_err(browser_err)
    }
}
