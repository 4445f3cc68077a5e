//! Concurrent batch processing of transfer requests
//!
//! This module provides the `BatchProcessor` struct, which runs every request
//! of a batch against a shared `TransferCoordinator` concurrently.
//!
//! # Design
//!
//! The coordinator is synchronous and blocks on `std::sync::Mutex`, so each
//! transfer runs on tokio's blocking pool via `spawn_blocking`. A semaphore
//! bounds how many transfers are in flight at once. Ordering between
//! requests is not preserved; correctness under any interleaving is the
//! coordinator's job.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── Arc<TransferCoordinator>  (shared transfer executor)
//!     └── Arc<Semaphore>            (in-flight transfer limit)
//! ```
//!
//! # Thread Safety
//!
//! The processor is cloneable and can be safely shared across async tasks.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, error};

use crate::core::coordinator::TransferCoordinator;
use crate::types::{ProcessingResult, TransferError, TransferRequest, TransferResult};

/// Batch processor with bounded concurrency
#[derive(Clone)]
pub struct BatchProcessor {
    /// Shared transfer executor
    coordinator: Arc<TransferCoordinator>,

    /// Permits for in-flight transfers
    permits: Arc<Semaphore>,
}

impl BatchProcessor {
    /// Create a new BatchProcessor
    ///
    /// # Arguments
    ///
    /// * `coordinator` - Arc-wrapped coordinator shared by all tasks
    /// * `max_concurrent` - Maximum number of transfers executing at once
    ///   (values below 1 are raised to 1)
    pub fn new(coordinator: Arc<TransferCoordinator>, max_concurrent: usize) -> Self {
        Self {
            coordinator,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Process a batch of transfer requests concurrently
    ///
    /// # Returns
    ///
    /// One `ProcessingResult` per request, in the same order as the input
    /// batch. Execution order between requests is unspecified.
    ///
    /// # Guarantees
    ///
    /// - Every request is processed, even if some fail
    /// - A task that dies before reporting yields a `Failure` result; no
    ///   balance is left half-applied because the coordinator commits whole
    ///   legs and restores on fault
    pub async fn process_batch(&self, batch: Vec<TransferRequest>) -> Vec<ProcessingResult> {
        debug!(size = batch.len(), "Dispatching transfer batch");

        let mut tasks = Vec::with_capacity(batch.len());
        for request in batch {
            let coordinator = Arc::clone(&self.coordinator);
            let permits = Arc::clone(&self.permits);
            let task_request = request.clone();

            let task = tokio::spawn(run_transfer(coordinator, permits, task_request));
            tasks.push((request, task));
        }

        let mut results = Vec::with_capacity(tasks.len());
        for (request, task) in tasks {
            let result = match task.await {
                Ok(Ok(result)) => result,
                Ok(Err(e)) => {
                    error!(from = %request.from, to = %request.to, "Transfer task failed: {}", e);
                    TransferResult::from(e)
                }
                Err(e) => {
                    error!(from = %request.from, to = %request.to, "Transfer task panicked: {}", e);
                    TransferResult::from(TransferError::RuntimeError {
                        message: e.to_string(),
                    })
                }
            };
            results.push(ProcessingResult { request, result });
        }

        results
    }
}

/// Wait for a permit, then run one transfer on the blocking pool
async fn run_transfer(
    coordinator: Arc<TransferCoordinator>,
    permits: Arc<Semaphore>,
    request: TransferRequest,
) -> Result<TransferResult, TransferError> {
    // The semaphore is never closed, so acquire only fails on a bug
    let _permit = permits
        .acquire_owned()
        .await
        .map_err(|e| TransferError::RuntimeError {
            message: e.to_string(),
        })?;

    tokio::task::spawn_blocking(move || coordinator.transfer(&request))
        .await
        .map_err(|e| TransferError::RuntimeError {
            message: e.to_string(),
        })
}
