//! Asynchronous batch processing strategy
//!
//! This module provides a concurrent implementation of the ProcessingStrategy
//! trait. Transfers are read in batches and every batch is executed
//! concurrently against a shared coordinator.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_transfers)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (bounded spawn_blocking fan-out)
//!     └── TransferCoordinator (lock policy + account store)
//! ```
//!
//! # Ordering
//!
//! Batches are processed one after another, but transfers inside a batch run
//! in an unspecified order. Final balances therefore only match the
//! sequential strategy when the outcome of a batch does not depend on the
//! order of its transfers. Conservation and non-negativity hold regardless.

use crate::core::{BatchProcessor, InMemoryAccountStore, LockPolicy, TransferCoordinator};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::{write_accounts_csv, AccountCsvRecord, TransferCsvRecord};
use crate::strategy::{register_account, ProcessingStrategy};
use crate::types::{ProcessingResult, TransferError};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};
use tracing::{debug, info, warn};

/// Configuration for batch processing
///
/// Controls how many transfers are read per batch and how many execute at
/// once. Both values are always at least 1; build one with [`new`](Self::new)
/// or [`Default`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    batch_size: usize,
    max_concurrent_transfers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_transfers: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values are replaced by the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_transfers: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size, default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_transfers = if max_concurrent_transfers == 0 {
            warn!(
                "Invalid max_concurrent_transfers ({}), using default ({})",
                max_concurrent_transfers, default.max_concurrent_transfers
            );
            default.max_concurrent_transfers
        } else {
            max_concurrent_transfers
        };

        Self {
            batch_size,
            max_concurrent_transfers,
        }
    }

    /// Number of transfers per batch
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Maximum number of transfers executing concurrently
    pub fn max_concurrent_transfers(&self) -> usize {
        self.max_concurrent_transfers
    }
}

/// Asynchronous batch processing strategy
///
/// # Configuration
///
/// - `batch_size`: Number of transfers per batch (default: 1000)
/// - `max_concurrent_transfers`: Runtime worker threads and in-flight
///   transfer limit (default: CPU cores)
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    lock_policy: LockPolicy,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy with the specified configuration
    pub fn new(config: BatchConfig, lock_policy: LockPolicy) -> Self {
        Self {
            config,
            lock_policy,
        }
    }

    async fn run(
        &self,
        accounts_path: &Path,
        transfers_path: &Path,
    ) -> Result<(Arc<TransferCoordinator>, Vec<ProcessingResult>), TransferError> {
        let mut accounts: AsyncReader<_, AccountCsvRecord> =
            AsyncReader::new(open(accounts_path).await?);
        let mut transfers: AsyncReader<_, TransferCsvRecord> =
            AsyncReader::new(open(transfers_path).await?);

        let coordinator = Arc::new(TransferCoordinator::new(
            Arc::new(InMemoryAccountStore::new()),
            self.lock_policy,
        ));

        let mut loaded = 0usize;
        loop {
            let batch = accounts.read_batch(self.config.batch_size).await;
            if batch.is_empty() {
                break;
            }
            for account in batch {
                if register_account(&coordinator, account) {
                    loaded += 1;
                }
            }
        }
        info!(accounts = loaded, skipped = accounts.skipped(), "Loaded accounts");

        let processor = BatchProcessor::new(
            Arc::clone(&coordinator),
            self.config.max_concurrent_transfers,
        );

        let mut results = Vec::new();
        let mut batches = 0usize;
        loop {
            let batch = transfers.read_batch(self.config.batch_size).await;
            if batch.is_empty() {
                break;
            }

            // Wait for the whole batch before reading the next one
            results.extend(processor.process_batch(batch).await);
            batches += 1;
        }
        debug!(batches, skipped = transfers.skipped(), "Processed transfer batches");

        Ok((coordinator, results))
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Process both files with concurrent transfer batches
    ///
    /// 1. Creates a tokio multi-threaded runtime
    /// 2. Opens both files (fatal if either is missing)
    /// 3. Registers every valid account row
    /// 4. Reads transfers in batches and runs each batch concurrently
    /// 5. Writes the final balances to `output`
    fn process(
        &self,
        accounts_path: &Path,
        transfers_path: &Path,
        output: &mut dyn Write,
    ) -> Result<Vec<ProcessingResult>, TransferError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_transfers)
            .build()
            .map_err(|e| TransferError::RuntimeError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        let (coordinator, results) =
            runtime.block_on(self.run(accounts_path, transfers_path))?;

        write_accounts_csv(&coordinator.accounts(), output)?;

        Ok(results)
    }
}

/// Open a file for csv-async through the tokio compatibility layer
async fn open(path: &Path) -> Result<Compat<tokio::fs::File>, TransferError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| TransferError::open_failed(path, e))?;

    Ok(file.compat())
}
