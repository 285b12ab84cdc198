use async_trait::async_trait;
use secrecy::SecretString;
use smart_maic_exporter::config::{AcquisitionMode, DeviceConfig};
use smart_maic_exporter::device::browser::{BrowserDriver, PageHandle};
use smart_maic_exporter::device::{DeviceSession, DeviceSource};
use smart_maic_exporter::error::{ExporterError, Result};
use std::sync::{Arc, Mutex};

const DATA_BODY: &str =
    r#"<body><pre>{"devid":"6A2F51"}</pre><div class="json-formatter-container"></div></body>"#;

/// Event log shared between the stub driver and the assertions.
type Log = Arc<Mutex<Vec<String>>>;

struct StubDriver {
    root_title: String,
    fail_login: bool,
    log: Log,
}

#[async_trait]
impl BrowserDriver for StubDriver {
    async fn load_page(&self, url: &str) -> Result<Box<dyn PageHandle>> {
        self.log.lock().unwrap().push(format!("load {}", url));
        let is_data_page = url.contains("page=getwdata");
        Ok(Box::new(StubPage {
            title: if is_data_page {
                "".to_string()
            } else {
                self.root_title.clone()
            },
            fail_login: self.fail_login,
            log: self.log.clone(),
        }))
    }
}

struct StubPage {
    title: String,
    fail_login: bool,
    log: Log,
}

#[async_trait]
impl PageHandle for StubPage {
    async fn title(&self) -> Result<String> {
        Ok(self.title.clone())
    }

    async fn fill_and_submit_login(&self, pin: &str) -> Result<()> {
        self.log.lock().unwrap().push(format!("login {}", pin));
        if self.fail_login {
            Err(ExporterError::LoginFlow("element .minput not found".into()))
        } else {
            Ok(())
        }
    }

    async fn body_html(&self) -> Result<String> {
        self.log.lock().unwrap().push("body_html".to_string());
        Ok(DATA_BODY.to_string())
    }

    async fn close(&self) -> Result<()> {
        self.log.lock().unwrap().push("close".to_string());
        Ok(())
    }
}

fn device_config() -> DeviceConfig {
    DeviceConfig {
        base_url: "http://192.168.10.55".to_string(),
        mode: AcquisitionMode::Browser,
        pin_code: Some(SecretString::from("4321")),
        data_path: "/?page=getwdata".to_string(),
        timeout_seconds: 3,
    }
}

fn session(root_title: &str, fail_login: bool) -> (DeviceSession, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let driver = StubDriver {
        root_title: root_title.to_string(),
        fail_login,
        log: log.clone(),
    };
    let session = DeviceSession::new(Box::new(driver), &device_config()).unwrap();
    (session, log)
}

#[tokio::test]
async fn test_login_page_triggers_single_pin_submission() {
    let (session, log) = session("Login", false);

    let body = session.fetch_raw().await.unwrap();
    assert_eq!(body, DATA_BODY);

    let events = log.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "load http://192.168.10.55",
            "login 4321",
            "close",
            "load http://192.168.10.55/?page=getwdata",
            "body_html",
            "close",
        ]
    );
}

#[tokio::test]
async fn test_maic_login_title_also_triggers_login() {
    let (session, log) = session("MAIC Login", false);

    session.fetch_raw().await.unwrap();

    let events = log.lock().unwrap().clone();
    assert!(events.contains(&"login 4321".to_string()));
}

#[tokio::test]
async fn test_authenticated_session_skips_login() {
    let (session, log) = session("Smart MAIC", false);

    let body = session.fetch_raw().await.unwrap();
    assert_eq!(body, DATA_BODY);

    let events = log.lock().unwrap().clone();
    assert!(
        !events.iter().any(|e| e.starts_with("login")),
        "unexpected login interaction: {:?}",
        events
    );
}

#[tokio::test]
async fn test_login_failure_aborts_but_closes_page() {
    let (session, log) = session("Login", true);

    let err = session.fetch_raw().await.unwrap_err();
    assert!(matches!(err, ExporterError::LoginFlow(_)));

    let events = log.lock().unwrap().clone();
    // The root page was released even though the cycle failed, and the data
    // endpoint was never opened.
    assert!(events.contains(&"close".to_string()));
    assert!(!events.iter().any(|e| e.contains("getwdata")));
}

/// Driver whose pages stall forever in a chosen operation.
struct HangingDriver {
    hang_login: bool,
    hang_body: bool,
    log: Log,
}

#[async_trait]
impl BrowserDriver for HangingDriver {
    async fn load_page(&self, url: &str) -> Result<Box<dyn PageHandle>> {
        self.log.lock().unwrap().push(format!("load {}", url));
        let is_data_page = url.contains("page=getwdata");
        Ok(Box::new(HangingPage {
            title: if is_data_page || self.hang_body {
                "".to_string()
            } else {
                "Login".to_string()
            },
            hang_login: self.hang_login,
            hang_body: self.hang_body,
            log: self.log.clone(),
        }))
    }
}

struct HangingPage {
    title: String,
    hang_login: bool,
    hang_body: bool,
    log: Log,
}

#[async_trait]
impl PageHandle for HangingPage {
    async fn title(&self) -> Result<String> {
        Ok(self.title.clone())
    }

    async fn fill_and_submit_login(&self, pin: &str) -> Result<()> {
        self.log.lock().unwrap().push(format!("login {}", pin));
        if self.hang_login {
            // Device accepted the click but the navigation never completes
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        }
        Ok(())
    }

    async fn body_html(&self) -> Result<String> {
        self.log.lock().unwrap().push("body_html".to_string());
        if self.hang_body {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        }
        Ok(DATA_BODY.to_string())
    }

    async fn close(&self) -> Result<()> {
        self.log.lock().unwrap().push("close".to_string());
        Ok(())
    }
}

fn hanging_session(hang_login: bool, hang_body: bool) -> (DeviceSession, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let driver = HangingDriver {
        hang_login,
        hang_body,
        log: log.clone(),
    };
    let session = DeviceSession::new(Box::new(driver), &device_config()).unwrap();
    (session, log)
}

#[tokio::test(start_paused = true)]
async fn test_hung_login_submit_times_out() {
    let (session, log) = hanging_session(true, false);

    let err = session.fetch_raw().await.unwrap_err();
    assert!(
        matches!(&err, ExporterError::Browser(msg) if msg.contains("timed out")),
        "expected timeout error, got {}",
        err
    );

    let events = log.lock().unwrap().clone();
    // The stalled page was still released, and the data endpoint never opened
    assert!(events.contains(&"login 4321".to_string()));
    assert!(events.contains(&"close".to_string()));
    assert!(!events.iter().any(|e| e.contains("getwdata")));
}

#[tokio::test(start_paused = true)]
async fn test_hung_data_page_read_times_out() {
    let (session, log) = hanging_session(false, true);

    let err = session.fetch_raw().await.unwrap_err();
    assert!(
        matches!(&err, ExporterError::Browser(msg) if msg.contains("timed out")),
        "expected timeout error, got {}",
        err
    );

    let events = log.lock().unwrap().clone();
    // Both the root page and the stalled data page were released
    assert_eq!(
        events.iter().filter(|e| e.as_str() == "close").count(),
        2,
        "both pages should be closed: {:?}",
        events
    );
}

#[test]
fn test_browser_mode_requires_pin() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let driver = StubDriver {
        root_title: "Login".to_string(),
        fail_login: false,
        log,
    };
    let mut config = device_config();
    config.pin_code = None;

    assert!(DeviceSession::new(Box::new(driver), &config).is_err());
}
