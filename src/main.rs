//! Transfer Engine CLI
//!
//! Command-line interface for executing account-to-account transfers from CSV
//! files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- accounts.csv transfers.csv > balances.csv
//! cargo run -- --strategy sync accounts.csv transfers.csv > balances.csv
//! cargo run -- --lock-policy global --results outcomes.csv accounts.csv transfers.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 accounts.csv transfers.csv
//! ```
//!
//! The program seeds an in-memory store from the accounts file, runs every
//! transfer through the coordinator using the selected strategy and prints
//! the final balances to stdout. Logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success (individual transfers may still have been rejected)
//! - 1: Error (file not found, file not readable, runtime failure, etc.)

use rust_transfer_engine::cli::{self, CliArgs, StrategyType};
use rust_transfer_engine::io::write_results_csv;
use rust_transfer_engine::logging;
use rust_transfer_engine::strategy::{self, outcome_counts, success_count};
use rust_transfer_engine::types::TransferError;
use std::fs::File;
use std::io::BufWriter;
use std::process;
use tracing::{error, info};

fn main() {
    let args = cli::parse_args();

    if let Err(e) = logging::init_logging(&args.log_level) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), TransferError> {
    let config = if args.strategy == StrategyType::Async {
        Some(args.to_batch_config())
    } else {
        None
    };
    let strategy = strategy::create_strategy(args.strategy, args.lock_policy, config);

    info!(
        strategy = ?args.strategy,
        lock_policy = ?args.lock_policy,
        "Processing {} against {}",
        args.transfers_file.display(),
        args.accounts_file.display()
    );

    let mut output = std::io::stdout();
    let results = strategy.process(&args.accounts_file, &args.transfers_file, &mut output)?;

    if let Some(path) = &args.results_file {
        let file = File::create(path).map_err(|e| TransferError::IoError {
            message: format!("Failed to create '{}': {}", path.display(), e),
        })?;
        write_results_csv(&results, &mut BufWriter::new(file))?;
    }

    info!(
        transfers = results.len(),
        succeeded = success_count(&results),
        outcomes = ?outcome_counts(&results),
        "Finished processing"
    );

    Ok(())
}
