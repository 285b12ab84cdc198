use anyhow::Result;
use clap::Parser;
use smart_maic_exporter::{
    config::{AcquisitionMode, Config},
    server,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// Device base URL (overrides config)
    #[arg(long, env = "BASE_URL")]
    base_url: Option<String>,

    /// Login PIN for browser-mode acquisition (overrides config)
    #[arg(long, env = "PIN_CODE")]
    pin_code: Option<String>,

    /// Acquisition mode: http or browser (overrides config)
    #[arg(long, env = "ACQUISITION_MODE", value_enum)]
    mode: Option<Mode>,

    /// Port to listen on for metrics
    #[arg(short, long, env = "EXPORTER_PORT", default_value = "8000")]
    port: u16,

    /// Address to bind to
    #[arg(short, long, env = "EXPORTER_ADDR", default_value = "0.0.0.0")]
    addr: String,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
enum Mode {
    Http,
    Browser,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Smart MAIC Prometheus Exporter v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;

    // Override with CLI arguments if provided
    if let Some(base_url) = args.base_url {
        config.device.base_url = base_url;
    }
    if let Some(pin) = args.pin_code {
        config.device.pin_code = Some(secrecy::SecretString::new(pin.into()));
    }
    if let Some(mode) = args.mode {
        config.device.mode = match mode {
            Mode::Http => AcquisitionMode::Http,
            Mode::Browser => AcquisitionMode::Browser,
        };
    }
    config.server.port = args.port;
    config.server.addr = args.addr;

    // Re-check after overrides: an invalid base URL or a browser deployment
    // without a PIN is startup-fatal.
    config.validate()?;

    info!("Configuration loaded successfully");
    info!(
        "Device: {} ({:?} mode)",
        config.device.base_url, config.device.mode
    );
    info!(
        "Metrics endpoint: http://{}:{}/metrics",
        config.server.addr, config.server.port
    );

    // Start the metrics server
    if let Err(e) = server::start(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
