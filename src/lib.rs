// Kamba - Angolan slang dictionary core
// Content, selection, entitlement gate and AI-assisted translation

pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod integrations;

pub use error::{KambaError, KambaResult};

use anyhow::Result;
use tracing::info;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Initialize logging
///
/// @param ansi_colors - Whether to enable ANSI color codes in logs
/// @param verbose - Default to DEBUG instead of INFO when RUST_LOG is unset
pub fn init_with_logger(ansi_colors: bool, verbose: bool) -> Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "kamba=debug" } else { "kamba=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt::Subscriber::builder()
        .with_ansi(ansi_colors)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(verbose)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Initializing kamba v{}", version());
    Ok(())
}
