//! Tracing initialization
//!
//! Logs go to stderr so that stdout carries nothing but the balances CSV.
//! `RUST_LOG` takes precedence over the directive passed on the command line.

use crate::types::TransferError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the log filter from `RUST_LOG`, or from `default_directive` if unset
///
/// # Errors
///
/// Returns `InvalidConfig` if `RUST_LOG` is unset and `default_directive`
/// does not parse.
pub fn build_filter(default_directive: &str) -> Result<EnvFilter, TransferError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive).map_err(|e| TransferError::InvalidConfig {
            message: format!("invalid log directive '{}': {}", default_directive, e),
        }),
    }
}

/// Install the global tracing subscriber
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_logging(default_directive: &str) -> Result<(), TransferError> {
    let filter = build_filter(default_directive)?;

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();

    Ok(())
}
