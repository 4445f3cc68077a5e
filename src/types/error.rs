//! Error types for the transfer engine
//!
//! This module defines all error types that can occur while loading accounts,
//! reading transfer requests and executing transfers.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **CSV Parsing Errors**: Malformed CSV, invalid amounts, etc.
//! - **Store Errors**: Unknown or duplicate account identifiers, invalid records
//! - **Transfer Errors**: Same-account requests, insufficient funds
//! - **Commit Errors**: Store faults inside the critical section, arithmetic overflow

use rust_decimal::Decimal;
use std::path::Path;
use thiserror::Error;

/// Main error type for the transfer engine
///
/// Each variant carries enough context to be reported as-is in logs and in
/// the `message` of a `TransferResult`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransferError {
    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents processing from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// This is a recoverable error - the malformed record is skipped
    /// and processing continues with the next record.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Malformed amount or balance value
    #[error("Invalid amount '{amount}'")]
    InvalidAmount {
        /// The invalid amount string
        amount: String,
    },

    /// Account identifier is empty
    #[error("Invalid account id '{id}'")]
    InvalidAccountId {
        /// The rejected identifier
        id: String,
    },

    /// Account would be created with a negative balance
    #[error("Account {id} cannot be created with negative balance {balance}")]
    NegativeBalance {
        /// Account identifier
        id: String,
        /// Rejected opening balance
        balance: Decimal,
    },

    /// An account with this identifier already exists
    #[error("Account id {id} already exists!")]
    DuplicateAccountId {
        /// The duplicated identifier
        id: String,
    },

    /// No account with this identifier exists
    #[error("Account {id} not found")]
    AccountNotFound {
        /// The missing identifier
        id: String,
    },

    /// Source and target of a transfer are the same account
    #[error("Cannot transfer from account {id} to itself")]
    SameAccount {
        /// The account named on both sides
        id: String,
    },

    /// Transfer amount is not admissible against the source balance
    #[error("Insufficient funds in account {id}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Source account identifier
        id: String,
        /// Source balance at validation time
        balance: Decimal,
        /// Requested transfer amount
        requested: Decimal,
    },

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation} for account {id}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account identifier
        id: String,
    },

    /// Arithmetic underflow would occur
    #[error("Arithmetic underflow in {operation} for account {id}")]
    ArithmeticUnderflow {
        /// Operation that would underflow
        operation: String,
        /// Account identifier
        id: String,
    },

    /// The store rejected a write inside the critical section
    ///
    /// Reported as a `Failure`; any leg already written has been restored.
    #[error("Commit failed for account {id}: {message}")]
    CommitFailed {
        /// Account whose record could not be written
        id: String,
        /// Underlying store error
        message: String,
    },

    /// A notification sink could not deliver a message
    ///
    /// Never escalated into a transfer result.
    #[error("Notification for account {id} failed: {message}")]
    NotificationFailed {
        /// Account the notification was addressed to
        id: String,
        /// Description of the delivery failure
        message: String,
    },

    /// A command-line setting could not be applied
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the rejected setting
        message: String,
    },

    /// The async runtime could not be created
    #[error("Runtime error: {message}")]
    RuntimeError {
        /// Description of the runtime error
        message: String,
    },
}

// Conversion from io::Error to TransferError
impl From<std::io::Error> for TransferError {
    fn from(error: std::io::Error) -> Self {
        TransferError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to TransferError
impl From<csv::Error> for TransferError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        TransferError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl TransferError {
    /// Create an AccountNotFound error
    pub fn account_not_found(id: &str) -> Self {
        TransferError::AccountNotFound { id: id.to_string() }
    }

    /// Create a DuplicateAccountId error
    pub fn duplicate_account_id(id: &str) -> Self {
        TransferError::DuplicateAccountId { id: id.to_string() }
    }

    /// Create an InvalidAccountId error
    pub fn invalid_account_id(id: &str) -> Self {
        TransferError::InvalidAccountId { id: id.to_string() }
    }

    /// Create a NegativeBalance error
    pub fn negative_balance(id: &str, balance: Decimal) -> Self {
        TransferError::NegativeBalance {
            id: id.to_string(),
            balance,
        }
    }

    /// Create a SameAccount error
    pub fn same_account(id: &str) -> Self {
        TransferError::SameAccount { id: id.to_string() }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(id: &str, balance: Decimal, requested: Decimal) -> Self {
        TransferError::InsufficientFunds {
            id: id.to_string(),
            balance,
            requested,
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: &str) -> Self {
        TransferError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, id: &str) -> Self {
        TransferError::ArithmeticOverflow {
            operation: operation.to_string(),
            id: id.to_string(),
        }
    }

    /// Create an ArithmeticUnderflow error
    pub fn arithmetic_underflow(operation: &str, id: &str) -> Self {
        TransferError::ArithmeticUnderflow {
            operation: operation.to_string(),
            id: id.to_string(),
        }
    }

    /// Create a CommitFailed error
    pub fn commit_failed(id: &str, message: impl ToString) -> Self {
        TransferError::CommitFailed {
            id: id.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a NotificationFailed error
    pub fn notification_failed(id: &str, message: impl ToString) -> Self {
        TransferError::NotificationFailed {
            id: id.to_string(),
            message: message.to_string(),
        }
    }

    /// Classify a failure to open an input file
    ///
    /// A missing file becomes `FileNotFound`; anything else is an `IoError`
    /// naming the path.
    pub fn open_failed(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => TransferError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => TransferError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), error),
            },
        }
    }
}
