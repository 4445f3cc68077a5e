use crate::core::LockPolicy;
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Execute account-to-account transfers from CSV files
#[derive(Parser, Debug)]
#[command(name = "transfer-engine")]
#[command(about = "Execute account-to-account transfers from CSV files", long_about = None)]
pub struct CliArgs {
    /// Accounts CSV file path (`id,balance`)
    #[arg(value_name = "ACCOUNTS", help = "Path to the accounts CSV file")]
    pub accounts_file: PathBuf,

    /// Transfers CSV file path (`from,to,amount`)
    #[arg(value_name = "TRANSFERS", help = "Path to the transfers CSV file")]
    pub transfers_file: PathBuf,

    /// Processing strategy to use for executing transfers
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for sequential or 'async' for concurrent batches"
    )]
    pub strategy: StrategyType,

    /// Critical-section policy for transfers
    #[arg(
        long = "lock-policy",
        value_name = "POLICY",
        default_value = "per-account",
        help = "Lock policy: 'global' for one lock or 'per-account' for ordered per-account locks"
    )]
    pub lock_policy: LockPolicy,

    /// Number of transfers per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of transfers per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of concurrent transfers (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of transfers executing concurrently (default: CPU cores)"
    )]
    pub max_concurrent_transfers: Option<usize>,

    /// Optional per-transfer outcome report
    #[arg(
        long = "results",
        value_name = "PATH",
        help = "Write per-transfer outcomes as CSV to this file"
    )]
    pub results_file: Option<PathBuf>,

    /// Default log filter, overridden by RUST_LOG
    #[arg(
        long = "log-level",
        value_name = "DIRECTIVE",
        default_value = "info",
        help = "Log filter directive, e.g. 'debug' or 'rust_transfer_engine=trace' (RUST_LOG takes precedence)"
    )]
    pub log_level: String,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Uses the provided values or falls back to defaults. Zero values are
    /// replaced by defaults with a warning (see `BatchConfig::new`).
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_transfers.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size()),
                self.max_concurrent_transfers
                    .unwrap_or(default.max_concurrent_transfers()),
            )
        } else {
            BatchConfig::default()
        }
    }
}
