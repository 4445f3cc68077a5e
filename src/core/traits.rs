//! Core traits for account storage and transfer notifications
//!
//! These are the seams between the transfer coordinator and its external
//! collaborators. The coordinator only ever talks to a store or a sink
//! through these traits, so tests can substitute faulty implementations.

use crate::types::{Account, TransferError};
use rust_decimal::Decimal;

/// Keyed storage of account records
///
/// Implementations must make every individual call atomic with respect to
/// the record it touches: a `get` never observes a half-written `update`.
/// No atomicity is promised across two accounts; that is the coordinator's
/// job.
pub trait AccountStore: Send + Sync {
    /// Fetch a snapshot of an account
    fn get(&self, id: &str) -> Result<Account, TransferError>;

    /// Insert a new account, failing if the identifier is taken
    fn create(&self, account: Account) -> Result<(), TransferError>;

    /// Replace the record of an existing account
    fn update(&self, account: Account) -> Result<(), TransferError>;

    /// Remove an account, returning its last record
    fn remove(&self, id: &str) -> Result<Account, TransferError>;

    /// Snapshot of every account, sorted by identifier
    fn get_all_accounts(&self) -> Vec<Account>;

    /// Sum of all balances
    fn total_balance(&self) -> Decimal {
        self.get_all_accounts()
            .iter()
            .map(|account| account.balance)
            .sum()
    }
}

/// Receiver of debit/credit messages after a committed transfer
///
/// Calls happen outside any transfer lock. Errors are logged by the caller
/// and never affect the transfer result.
pub trait NotificationSink: Send + Sync {
    fn notify_about_transfer(&self, account: &Account, message: &str)
        -> Result<(), TransferError>;
}
