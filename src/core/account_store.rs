//! Thread-safe in-memory account store
//!
//! This module provides `InMemoryAccountStore`, the `AccountStore`
//! implementation used by the transfer coordinator.
//!
//! # Design
//!
//! Accounts live in a `DashMap`, a sharded concurrent HashMap. Every method
//! touches a single entry while holding that entry's shard lock, so a record
//! is never observed half-written. Callers only ever receive clones; there is
//! no way to obtain a reference into the map and mutate it outside an
//! `update` call.
//!
//! # Thread Safety
//!
//! Account-creation flows may call `create` concurrently with transfers; the
//! store synchronizes those calls itself, independently of transfer locking.

use crate::core::traits::AccountStore;
use crate::types::{Account, AccountId, TransferError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rust_decimal::Decimal;

/// Concurrent map of account identifiers to account records
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    /// Concurrent HashMap storing accounts by identifier
    accounts: DashMap<AccountId, Account>,
}

impl InMemoryAccountStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Number of stored accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn get(&self, id: &str) -> Result<Account, TransferError> {
        self.accounts
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| TransferError::account_not_found(id))
    }

    /// Insert a new account
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The identifier is empty
    /// - The opening balance is negative
    /// - An account with the same identifier already exists (never overwritten)
    fn create(&self, account: Account) -> Result<(), TransferError> {
        if account.id.trim().is_empty() {
            return Err(TransferError::invalid_account_id(&account.id));
        }
        if account.balance < Decimal::ZERO {
            return Err(TransferError::negative_balance(&account.id, account.balance));
        }

        match self.accounts.entry(account.id.clone()) {
            Entry::Occupied(_) => Err(TransferError::duplicate_account_id(&account.id)),
            Entry::Vacant(slot) => {
                slot.insert(account);
                Ok(())
            }
        }
    }

    fn update(&self, account: Account) -> Result<(), TransferError> {
        let mut entry = self
            .accounts
            .get_mut(&account.id)
            .ok_or_else(|| TransferError::account_not_found(&account.id))?;
        *entry = account;
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<Account, TransferError> {
        self.accounts
            .remove(id)
            .map(|(_, account)| account)
            .ok_or_else(|| TransferError::account_not_found(id))
    }

    fn get_all_accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by(|a, b| a.id.cmp(&b.id));
        accounts
    }
}
