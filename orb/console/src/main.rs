//! Orb Console - talk to the kernel, jot thoughts, track projects
//!
//! # Usage
//!
//! ```bash
//! # Start with defaults (kernel at http://localhost:8000)
//! orb-console
//!
//! # Point at another kernel
//! orb-console --kernel-url http://10.0.0.5:8000
//!
//! # With config file
//! orb-console --config ~/.config/orb/console.toml
//!
//! # Verbose logging (logs go to stderr)
//! RUST_LOG=debug orb-console
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing::{info, warn};

use orb_console::App;
use orb_core::{
    default_config_path, load_config_from_path, ConfigOverrides, HttpKernelBackend, KernelBackend,
};

/// Orb Console - line-oriented client for the Orb kernel
#[derive(Parser, Debug)]
#[command(name = "orb-console")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "ORB_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Kernel bridge base URL (overrides config and ORB_KERNEL_URL)
    #[arg(short = 'u', long, value_name = "URL")]
    kernel_url: Option<String>,

    /// Whole-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    request_timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "ORB_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Do not check the kernel before starting
    #[arg(long)]
    skip_health_check: bool,
}

/// Initialize logging with the specified level
///
/// Logs go to stderr so stdout stays the console surface.
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("orb_console={level},orb_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);
    info!("Orb console starting");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config_path = args.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(config_path).context("Failed to load configuration")?;

    let mut overrides = ConfigOverrides::new();
    if let Some(url) = args.kernel_url {
        overrides = overrides.with_kernel_url(url);
    }
    if let Some(secs) = args.request_timeout_secs {
        overrides = overrides.with_request_timeout_secs(secs);
    }
    overrides.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    info!(
        kernel_url = %config.kernel_url,
        source = %config.source(),
        "Configuration resolved"
    );

    let backend = Arc::new(
        HttpKernelBackend::from_config(&config).context("Failed to create kernel client")?,
    );
    info!(
        backend = backend.name(),
        base_url = backend.base_url(),
        "Kernel client ready"
    );

    if !args.skip_health_check && !backend.health_check().await {
        warn!(kernel_url = %config.kernel_url, "Kernel not reachable");
        eprintln!(
            "warning: kernel at {} is not reachable, chat replies will fail until it is",
            config.kernel_url
        );
    }

    let mut app = App::new(backend, &config.degraded_status);
    app.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    info!("Orb console stopped");
    Ok(())
}
