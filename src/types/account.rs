//! Account-related types for the transfer engine
//!
//! This module defines the Account record held by the account store.

use rust_decimal::Decimal;

/// Account identifier
///
/// Any non-empty string. Identifiers are compared byte-wise, which is also
/// the global order used when acquiring per-account locks.
pub type AccountId = String;

/// Account record
///
/// Accounts are plain values: the store owns the authoritative copy and hands
/// out clones. A clone is a snapshot and is never written back except through
/// `AccountStore::update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Unique account identifier
    pub id: AccountId,

    /// Current balance
    ///
    /// Never negative once an account has been created or a transfer has
    /// been committed.
    pub balance: Decimal,
}

impl Account {
    /// Create an account with the given opening balance
    pub fn new(id: impl Into<AccountId>, balance: Decimal) -> Self {
        Account {
            id: id.into(),
            balance,
        }
    }

    /// Create an account with a zero balance
    pub fn empty(id: impl Into<AccountId>) -> Self {
        Self::new(id, Decimal::ZERO)
    }

    /// Copy of this account carrying a different balance
    pub fn with_balance(&self, balance: Decimal) -> Self {
        Account {
            id: self.id.clone(),
            balance,
        }
    }
}
