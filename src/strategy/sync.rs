//! Synchronous processing strategy
//!
//! This module provides a sequential implementation of the ProcessingStrategy
//! trait. Transfers are executed one at a time in file order, so the final
//! balances are fully determined by the input files.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Transfer execution to `TransferCoordinator`
//! - CSV output to `csv_format::write_accounts_csv`

use crate::core::{InMemoryAccountStore, LockPolicy, TransferCoordinator};
use crate::io::csv_format::{write_accounts_csv, AccountCsvRecord, TransferCsvRecord};
use crate::io::sync_reader::SyncReader;
use crate::strategy::{register_account, ProcessingStrategy};
use crate::types::{ProcessingResult, TransferError};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use rust_transfer_engine::core::LockPolicy;
/// use rust_transfer_engine::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(LockPolicy::PerAccount);
/// let mut output = io::stdout();
///
/// strategy
///     .process(Path::new("accounts.csv"), Path::new("transfers.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncProcessingStrategy {
    lock_policy: LockPolicy,
}

impl SyncProcessingStrategy {
    pub fn new(lock_policy: LockPolicy) -> Self {
        Self { lock_policy }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Process both files sequentially
    ///
    /// 1. Opens both files (fatal if either is missing)
    /// 2. Registers every valid account row
    /// 3. Runs every valid transfer row through the coordinator, in order
    /// 4. Writes the final balances to `output`
    fn process(
        &self,
        accounts_path: &Path,
        transfers_path: &Path,
        output: &mut dyn Write,
    ) -> Result<Vec<ProcessingResult>, TransferError> {
        let accounts = SyncReader::<AccountCsvRecord>::new(accounts_path)?;
        let transfers = SyncReader::<TransferCsvRecord>::new(transfers_path)?;

        let coordinator =
            TransferCoordinator::new(Arc::new(InMemoryAccountStore::new()), self.lock_policy);

        let mut loaded = 0usize;
        for row in accounts {
            match row {
                Ok(account) => {
                    if register_account(&coordinator, account) {
                        loaded += 1;
                    }
                }
                Err(e) => warn!("Skipping account record: {}", e),
            }
        }
        info!(accounts = loaded, "Loaded accounts");

        let mut results = Vec::new();
        for row in transfers {
            match row {
                Ok(request) => {
                    let result = coordinator.transfer(&request);
                    results.push(ProcessingResult { request, result });
                }
                Err(e) => warn!("Skipping transfer record: {}", e),
            }
        }

        write_accounts_csv(&coordinator.accounts(), output)?;

        Ok(results)
    }
}
