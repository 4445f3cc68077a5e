//! Transfer coordination
//!
//! This module provides `TransferCoordinator`, the only component that
//! mutates balances. It orchestrates a transfer in the following order:
//!
//! 1. Reject same-account requests
//! 2. Fetch both accounts (advisory snapshot)
//! 3. Validate the amount against the snapshot
//! 4. Enter the critical section chosen by the [`LockPolicy`]
//! 5. Re-fetch and re-validate, then compute both new balances
//! 6. Commit the debit leg, then the credit leg; restore the debit leg if the
//!    credit leg cannot be written
//! 7. Leave the critical section
//! 8. Notify both account owners
//!
//! Steps 1-3 are cheap early rejections. The snapshot may be stale by the
//! time the lock is taken, so step 5 is the authoritative check.

use crate::core::lock_manager::{LockPolicy, TransferLocks};
use crate::core::notification::LoggingNotificationSink;
use crate::core::traits::{AccountStore, NotificationSink};
use crate::core::validator::is_transfer_allowed;
use crate::types::{Account, TransferError, TransferRequest, TransferResult};
use rust_decimal::Decimal;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Executes transfers against a shared account store
///
/// The coordinator is `Send + Sync`; share it behind an `Arc` and call
/// [`transfer`](Self::transfer) from as many threads as needed.
pub struct TransferCoordinator {
    store: Arc<dyn AccountStore>,
    locks: TransferLocks,
    notifier: Arc<dyn NotificationSink>,
}

impl TransferCoordinator {
    /// Create a coordinator that logs notifications
    pub fn new(store: Arc<dyn AccountStore>, policy: LockPolicy) -> Self {
        Self {
            store,
            locks: TransferLocks::new(policy),
            notifier: Arc::new(LoggingNotificationSink),
        }
    }

    /// Replace the notification sink
    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn lock_policy(&self) -> LockPolicy {
        self.locks.policy()
    }

    pub fn store(&self) -> &Arc<dyn AccountStore> {
        &self.store
    }

    /// Register a new account
    ///
    /// Account creation is synchronized by the store and does not take any
    /// transfer lock.
    pub fn create_account(&self, account: Account) -> Result<(), TransferError> {
        info!(account = %account.id, balance = %account.balance, "Creating account");
        self.store.create(account)
    }

    pub fn get_account(&self, id: &str) -> Result<Account, TransferError> {
        debug!(account = %id, "Retrieving account");
        self.store.get(id)
    }

    /// Delete an account and return its last record
    ///
    /// Waits for in-flight transfers touching the account, then drops its
    /// transfer lock entry.
    pub fn remove_account(&self, id: &str) -> Result<Account, TransferError> {
        info!(account = %id, "Removing account");
        let removed = self.locks.with_account_lock(id, || self.store.remove(id));
        self.locks.prune(id);
        removed
    }

    /// Snapshot of all accounts, sorted by identifier
    pub fn accounts(&self) -> Vec<Account> {
        self.store.get_all_accounts()
    }

    /// Move `request.amount` from `request.from` to `request.to`
    ///
    /// Never panics and never leaves a single leg applied. Rejections
    /// (`SameAccount`, `AccountNotFound`, `InsufficientFunds`) are decided
    /// before anything is written; `Failure` means a commit fault occurred
    /// and every written leg was restored.
    pub fn transfer(&self, request: &TransferRequest) -> TransferResult {
        debug!(
            from = %request.from,
            to = %request.to,
            amount = %request.amount,
            "Processing transfer"
        );

        match self.try_transfer(request) {
            Ok((debited, credited)) => {
                // Locks are released at this point
                self.notify(
                    &debited,
                    &format!(" is debited with amount {}", request.amount),
                );
                self.notify(
                    &credited,
                    &format!(" is credited with amount {}", request.amount),
                );

                TransferResult::success(format!(
                    "Transferred {} from {} to {}",
                    request.amount, request.from, request.to
                ))
            }
            Err(e) => {
                let result = TransferResult::from(e);
                if result.is_failure() {
                    warn!(from = %request.from, to = %request.to, "Transfer failed: {:?}", result.message);
                } else {
                    debug!(from = %request.from, to = %request.to, "Transfer rejected: {:?}", result.message);
                }
                result
            }
        }
    }

    fn try_transfer(&self, request: &TransferRequest) -> Result<(Account, Account), TransferError> {
        if request.from == request.to {
            return Err(TransferError::same_account(&request.from));
        }

        let source = self.store.get(&request.from)?;
        self.store.get(&request.to)?;

        ensure_allowed(&source, request.amount)?;

        let applied = self
            .locks
            .with_transfer_lock(&request.from, &request.to, || self.apply(request));

        // An account removed after the advisory read leaves lock entries behind
        if let Err(TransferError::AccountNotFound { .. }) = applied {
            self.locks.prune(&request.from);
            self.locks.prune(&request.to);
        }

        applied
    }

    /// Body of the critical section
    ///
    /// Must only be called while holding the transfer lock(s) for both
    /// accounts.
    fn apply(&self, request: &TransferRequest) -> Result<(Account, Account), TransferError> {
        let source = self.store.get(&request.from)?;
        let target = self.store.get(&request.to)?;

        ensure_allowed(&source, request.amount)?;

        let debited_balance = exact_sub(source.balance, request.amount)
            .ok_or_else(|| TransferError::arithmetic_underflow("debit", &source.id))?;
        let credited_balance = exact_add(target.balance, request.amount)
            .ok_or_else(|| TransferError::arithmetic_overflow("credit", &target.id))?;

        let debited = source.with_balance(debited_balance);
        let credited = target.with_balance(credited_balance);

        self.commit(&debited)?;

        if let Err(e) = self.commit(&credited) {
            if let Err(rollback) = self.commit(&source) {
                error!(
                    account = %source.id,
                    "Failed to restore debited account after credit failure: {}", rollback
                );
            }
            return Err(e);
        }

        Ok((debited, credited))
    }

    /// Write one record, turning store errors and panics into `CommitFailed`
    fn commit(&self, account: &Account) -> Result<(), TransferError> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.store.update(account.clone()))) {
            Ok(result) => result.map_err(|e| TransferError::commit_failed(&account.id, e)),
            Err(_) => Err(TransferError::commit_failed(
                &account.id,
                "store panicked during update",
            )),
        }
    }

    fn notify(&self, account: &Account, message: &str) {
        let delivered = panic::catch_unwind(AssertUnwindSafe(|| {
            self.notifier.notify_about_transfer(account, message)
        }));

        match delivered {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(account = %account.id, "Ignoring notification error: {}", e),
            Err(_) => warn!(account = %account.id, "Ignoring panic in notification sink"),
        }
    }
}

fn ensure_allowed(source: &Account, amount: Decimal) -> Result<(), TransferError> {
    if is_transfer_allowed(amount, source.balance) {
        Ok(())
    } else {
        Err(TransferError::insufficient_funds(
            &source.id,
            source.balance,
            amount,
        ))
    }
}

// `Decimal` rounds rather than fail once a result needs more than 28
// significant digits. Undoing the operation both ways detects the lost
// digits; for non-negative operands an exact result always round-trips.
fn exact_add(a: Decimal, b: Decimal) -> Option<Decimal> {
    let sum = a.checked_add(b)?;
    (sum.checked_sub(b)? == a && sum.checked_sub(a)? == b).then_some(sum)
}

fn exact_sub(a: Decimal, b: Decimal) -> Option<Decimal> {
    let difference = a.checked_sub(b)?;
    (difference.checked_add(b)? == a && a.checked_sub(difference)? == b).then_some(difference)
}
