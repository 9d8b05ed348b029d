//! CLI command implementations

pub mod login;
pub mod logs;
pub mod register;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use securepay_core::{LogEvent, LoggingService, SecurePayContext};

/// Get the data directory from environment or default
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SECUREPAY_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".securepay")
    }
}

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir();
    // Ensure directory exists
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get or create the SecurePay context
pub fn get_context() -> Result<SecurePayContext> {
    let data_dir = get_data_dir();

    // Create directory if it doesn't exist
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    SecurePayContext::new(&data_dir).context("Failed to initialize SecurePay context")
}

/// Refuse to prompt when stdin is not a terminal
pub fn require_tty() -> Result<()> {
    if !atty::is(atty::Stream::Stdin) {
        anyhow::bail!("Interactive input required; re-run with the missing values as flags");
    }
    Ok(())
}
