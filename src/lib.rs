//! Rust Transfer Engine Library
//! # Overview
//!
//! This library moves money between in-memory accounts with correctness
//! guarantees under concurrent access, plus a CSV batch front-end with a
//! sequential and a concurrent strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, TransferRequest, TransferResult, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::account_store`] - Thread-safe account storage
//!   - [`core::validator`] - Balance admission rule
//!   - [`core::lock_manager`] - Global and ordered per-account locking
//!   - [`core::coordinator`] - Transfer orchestration
//!   - [`core::batch_processor`] - Concurrent batch dispatch
//! - [`io`] - CSV readers and writers
//! - [`strategy`] - End-to-end processing pipelines
//! - [`logging`] - Tracing subscriber setup
//!
//! # Guarantees
//!
//! For every committed transfer:
//!
//! - The sum of all balances is unchanged
//! - No balance drops below zero
//! - Both legs are applied, or neither is
//!
//! # Outcomes
//!
//! - **Success**: Both balances were updated
//! - **InsufficientFunds**: Non-positive amount, or the source cannot cover it
//! - **AccountNotFound**: An endpoint does not exist
//! - **SameAccount**: Source and target are the same account
//! - **Failure**: The store failed mid-commit; every written leg was restored

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use core::{
    AccountStore, InMemoryAccountStore, LockPolicy, NotificationSink, TransferCoordinator,
};
pub use io::write_accounts_csv;
pub use types::{
    Account, AccountId, ProcessingResult, TransferError, TransferOutcome, TransferRequest,
    TransferResult,
};
