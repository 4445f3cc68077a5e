//! Critical-section management for transfers
//!
//! `TransferLocks` decides which lock(s) a transfer holds while it re-reads,
//! re-validates and commits both account records.
//!
//! # Policies
//!
//! - [`LockPolicy::Global`]: one mutex for every transfer. Simplest correct
//!   policy; unrelated transfers are serialized too.
//! - [`LockPolicy::PerAccount`]: one mutex per account identifier. A transfer
//!   takes the locks of its two accounts in ascending identifier order, so two
//!   transfers sharing an account serialize, disjoint transfers run in
//!   parallel, and no lock cycle (deadlock) can form.
//!
//! Per-account mutexes are created on first use. An entry is dropped by
//! [`TransferLocks::prune`] once its account is gone and no transfer holds
//! it, so the registry is bounded by the live accounts plus the transfers in
//! flight. The registry's own shard lock is released before a transfer
//! blocks on an account mutex.

use crate::types::AccountId;
use clap::ValueEnum;
use dashmap::DashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Locking discipline for the transfer critical section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LockPolicy {
    /// Single lock shared by all transfers
    Global,
    /// One lock per account, acquired in identifier order
    #[default]
    PerAccount,
}

/// Order two account identifiers for lock acquisition
///
/// Every transfer acquires the smaller identifier first.
pub fn lock_order<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Lock registry used by the transfer coordinator
#[derive(Debug, Default)]
pub struct TransferLocks {
    policy: LockPolicy,
    global: Mutex<()>,
    per_account: DashMap<AccountId, Arc<Mutex<()>>>,
}

impl TransferLocks {
    pub fn new(policy: LockPolicy) -> Self {
        Self {
            policy,
            global: Mutex::new(()),
            per_account: DashMap::new(),
        }
    }

    pub fn policy(&self) -> LockPolicy {
        self.policy
    }

    /// Run `f` with exclusive access to the accounts `from` and `to`
    ///
    /// Locks are released when `f` returns, including when it panics.
    pub fn with_transfer_lock<R>(&self, from: &str, to: &str, f: impl FnOnce() -> R) -> R {
        match self.policy {
            LockPolicy::Global => {
                let _guard = acquire(&self.global);
                f()
            }
            LockPolicy::PerAccount => {
                let (first_id, second_id) = lock_order(from, to);
                let first = self.account_lock(first_id);
                let _first_guard = acquire(&first);

                if first_id == second_id {
                    return f();
                }

                let second = self.account_lock(second_id);
                let _second_guard = acquire(&second);
                f()
            }
        }
    }

    /// Run `f` with exclusive access to the single account `id`
    pub fn with_account_lock<R>(&self, id: &str, f: impl FnOnce() -> R) -> R {
        match self.policy {
            LockPolicy::Global => {
                let _guard = acquire(&self.global);
                f()
            }
            LockPolicy::PerAccount => {
                let lock = self.account_lock(id);
                let _guard = acquire(&lock);
                f()
            }
        }
    }

    /// Drop the lock entry for `id` unless a transfer still holds it
    ///
    /// Returns `true` if an entry was removed. An entry that is in use stays,
    /// so every holder of an identifier always shares one mutex.
    pub fn prune(&self, id: &str) -> bool {
        // The shard write lock keeps `account_lock` from cloning the entry
        // while its reference count is checked
        self.per_account
            .remove_if(id, |_, lock| Arc::strong_count(lock) == 1)
            .is_some()
    }

    /// Number of per-account locks currently registered
    pub fn account_lock_count(&self) -> usize {
        self.per_account.len()
    }

    fn account_lock(&self, id: &str) -> Arc<Mutex<()>> {
        if let Some(lock) = self.per_account.get(id) {
            return Arc::clone(lock.value());
        }
        Arc::clone(
            self.per_account
                .entry(id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        )
    }
}

// The mutexes guard no data, so a poisoned lock is still usable.
fn acquire(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}
