use secrecy::SecretString;
use smart_maic_exporter::config::{AcquisitionMode, Config, DeviceConfig, ServerConfig};

fn base_config() -> Config {
    Config {
        device: DeviceConfig {
            base_url: "http://192.168.10.55".to_string(),
            mode: AcquisitionMode::Http,
            pin_code: None,
            data_path: "/?page=getwdata".to_string(),
            timeout_seconds: 3,
        },
        server: ServerConfig {
            addr: "0.0.0.0".to_string(),
            port: 8000,
        },
    }
}

#[test]
fn test_valid_http_config() {
    assert!(base_config().validate().is_ok());
}

#[test]
fn test_https_scheme_accepted() {
    let mut config = base_config();
    config.device.base_url = "https://meter.local".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_scheme_is_fatal() {
    for bad in ["192.168.10.55", "ftp://device", "httpx://device", ""] {
        let mut config = base_config();
        config.device.base_url = bad.to_string();
        assert!(
            config.validate().is_err(),
            "expected base URL {:?} to be rejected",
            bad
        );
    }
}

#[test]
fn test_browser_mode_without_pin_is_fatal() {
    let mut config = base_config();
    config.device.mode = AcquisitionMode::Browser;
    assert!(config.validate().is_err());

    config.device.pin_code = Some(SecretString::from("0000"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_data_url_joins_base_and_path() {
    let config = base_config();
    assert_eq!(
        config.device.data_url(),
        "http://192.168.10.55/?page=getwdata"
    );

    let mut trailing = base_config();
    trailing.device.base_url = "http://meter.local/".to_string();
    assert_eq!(
        trailing.device.data_url(),
        "http://meter.local/?page=getwdata"
    );
}
