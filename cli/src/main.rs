//! Court booking service CLI server
//!
//! Headless booking API suitable for deployment as a systemd service,
//! Docker container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/court-booking/config.toml)
//! court-booking-service
//!
//! # Custom config path
//! court-booking-service --config /etc/court-booking/config.toml
//!
//! # Override port and data directory
//! court-booking-service --api-port 8080 --data-dir /var/lib/court-booking
//!
//! # Validate config without starting
//! court-booking-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use court_booking::config::AppConfig;
use court_booking::server::{init_tracing, ServerHandle, ServerOptions};

/// Tennis court booking service.
#[derive(Parser, Debug)]
#[command(
    name = "court-booking-service",
    version,
    about = "Tennis court reservation service",
    long_about = "REST API for booking tennis courts, backed by JSON files \
                  with advisory file locks.\n\n\
                  Default config: ~/.config/court-booking/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "COURT_BOOKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the directory holding the JSON data files.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Do not install the Prometheus recorder or serve `/metrics`.
    #[arg(long)]
    no_metrics: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .unwrap_or_else(court_booking::default_config_path);

    let loaded = AppConfig::load(&config_path);

    if cli.check {
        let mut config = loaded?;
        apply_overrides(&mut config, cli.api_port, cli.data_dir, cli.log_level);
        config.validate()?;
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.server.address());
        println!("   Data dir    : {}", config.storage.data_dir.display());
        println!(
            "   Hours       : {}-{} ({} min slots)",
            config.facility.opening_time, config.facility.closing_time, config.facility.slot_minutes
        );
        println!("   Courts      : {}", config.facility.courts.len());
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    let mut config = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", config_path.display(), e);
            eprintln!("Using default configuration.");
            AppConfig::default()
        }
    };
    apply_overrides(&mut config, cli.api_port, cli.data_dir, cli.log_level);

    // Init tracing after overrides so --log-level takes effect
    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    // ── Start server ───────────────────────────────────────────
    let handle = match ServerHandle::start(ServerOptions {
        config,
        enable_metrics: !cli.no_metrics,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start: {}", e);
            return Err(e);
        }
    };

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");

    // Wait for shutdown signal, then clean up
    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}

fn apply_overrides(
    config: &mut AppConfig,
    api_port: Option<u16>,
    data_dir: Option<PathBuf>,
    log_level: Option<String>,
) {
    if let Some(port) = api_port {
        config.server.api_port = port;
    }
    if let Some(dir) = data_dir {
        config.storage.data_dir = dir;
    }
    if let Some(level) = log_level {
        config.logging.level = level;
    }
}
