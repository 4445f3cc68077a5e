//! Transfer-related types for the transfer engine
//!
//! This module defines the transfer request handed to the coordinator and the
//! result it reports back.

use super::account::AccountId;
use super::error::TransferError;
use rust_decimal::Decimal;
use std::fmt;

/// A request to move `amount` from one account to another
///
/// Requests are transient: created per call and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Account to debit
    pub from: AccountId,

    /// Account to credit (must differ from `from`)
    pub to: AccountId,

    /// Amount to move (must be strictly positive)
    pub amount: Decimal,
}

impl TransferRequest {
    pub fn new(from: impl Into<AccountId>, to: impl Into<AccountId>, amount: Decimal) -> Self {
        TransferRequest {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

/// Outcome tag of a transfer
///
/// Only `Success` means balances changed. Every other outcome guarantees
/// that no stored balance was mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferOutcome {
    /// Both legs were committed
    Success,

    /// Business-rule rejection (non-positive amount, empty or short source)
    InsufficientFunds,

    /// One or both endpoints do not exist
    AccountNotFound,

    /// Source and target are the same account
    SameAccount,

    /// Unexpected fault while committing; the caller may retry
    Failure,
}

impl TransferOutcome {
    /// Stable snake_case name used in CSV output
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferOutcome::Success => "success",
            TransferOutcome::InsufficientFunds => "insufficient_funds",
            TransferOutcome::AccountNotFound => "account_not_found",
            TransferOutcome::SameAccount => "same_account",
            TransferOutcome::Failure => "failure",
        }
    }
}

impl fmt::Display for TransferOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    pub outcome: TransferOutcome,
    pub message: Option<String>,
}

impl TransferResult {
    pub fn success(message: impl Into<String>) -> Self {
        TransferResult {
            outcome: TransferOutcome::Success,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == TransferOutcome::Success
    }

    /// True for unexpected commit faults, as opposed to business rejections
    pub fn is_failure(&self) -> bool {
        self.outcome == TransferOutcome::Failure
    }
}

impl From<TransferError> for TransferResult {
    /// Classify an error into the outcome reported to the caller
    ///
    /// Expected rejections keep their own tag; anything else is a `Failure`.
    fn from(error: TransferError) -> Self {
        let outcome = match error {
            TransferError::AccountNotFound { .. } => TransferOutcome::AccountNotFound,
            TransferError::InsufficientFunds { .. } => TransferOutcome::InsufficientFunds,
            TransferError::SameAccount { .. } => TransferOutcome::SameAccount,
            _ => TransferOutcome::Failure,
        };

        TransferResult {
            outcome,
            message: Some(error.to_string()),
        }
    }
}

/// A processed request paired with its result
///
/// Produced by the batch pipelines for reporting.
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The request that was processed
    pub request: TransferRequest,

    /// What the coordinator reported for it
    pub result: TransferResult,
}
