//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account record and identifier
//! - `transfer`: Transfer requests, outcomes and results
//! - `error`: Error types for the transfer engine

pub mod account;
pub mod error;
pub mod transfer;

pub use account::{Account, AccountId};
pub use error::TransferError;
pub use transfer::{ProcessingResult, TransferOutcome, TransferRequest, TransferResult};
