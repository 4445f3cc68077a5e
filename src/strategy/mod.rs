//! Processing strategy module for transfer batches
//!
//! This module defines the Strategy pattern for complete processing
//! pipelines: seeding the account store from the accounts file, running the
//! transfers file through the coordinator and writing the final balances.
//! Different implementations (sequential, concurrent batches) can be selected
//! at runtime.

use crate::cli::StrategyType;
use crate::core::{LockPolicy, TransferCoordinator};
use crate::types::{Account, ProcessingResult, TransferError, TransferOutcome};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tracing::warn;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete transfer pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Load accounts, execute transfers and write final balances
    ///
    /// # Arguments
    ///
    /// * `accounts_path` - CSV file with `id,balance` rows
    /// * `transfers_path` - CSV file with `from,to,amount` rows
    /// * `output` - Writer receiving the final `id,balance` CSV
    ///
    /// # Returns
    ///
    /// One `ProcessingResult` per valid transfer row, in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Either input file cannot be opened
    /// - A fatal I/O error occurs during writing
    /// - The async runtime cannot be created
    ///
    /// Invalid rows and rejected transfers are not errors: rows are logged
    /// and skipped, rejections are reported in the returned results.
    fn process(
        &self,
        accounts_path: &Path,
        transfers_path: &Path,
        output: &mut dyn Write,
    ) -> Result<Vec<ProcessingResult>, TransferError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `lock_policy` - Critical-section policy for the coordinator
/// * `config` - Optional configuration for async batch processing (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    lock_policy: LockPolicy,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(lock_policy)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config, lock_policy))
        }
    }
}

/// Register an account read from the accounts file
///
/// Rejected accounts (duplicates, invalid records) are logged and skipped.
/// Returns whether the account was created.
pub(crate) fn register_account(coordinator: &TransferCoordinator, account: Account) -> bool {
    let id = account.id.clone();
    match coordinator.create_account(account) {
        Ok(()) => true,
        Err(e) => {
            warn!(account = %id, "Skipping account record: {}", e);
            false
        }
    }
}

/// Count results per outcome
pub fn outcome_counts(results: &[ProcessingResult]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for processed in results {
        *counts.entry(processed.result.outcome.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Number of results that committed
pub fn success_count(results: &[ProcessingResult]) -> usize {
    results
        .iter()
        .filter(|processed| processed.result.outcome == TransferOutcome::Success)
        .count()
}
