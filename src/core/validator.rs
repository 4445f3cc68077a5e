//! Balance validation
//!
//! Decides whether a transfer amount may be debited from a source balance.
//! The rule is stricter than a plain `balance >= amount`: the source must
//! itself hold a positive balance, so an empty account can never originate
//! a transfer.

use rust_decimal::Decimal;

/// Check whether `amount` may be transferred out of `source_balance`
///
/// Allowed iff `amount > 0`, `source_balance > 0` and the debit leaves the
/// balance at zero or above.
pub fn is_transfer_allowed(amount: Decimal, source_balance: Decimal) -> bool {
    amount > Decimal::ZERO && has_available_balance(amount, source_balance)
}

fn has_available_balance(amount: Decimal, source_balance: Decimal) -> bool {
    source_balance > Decimal::ZERO && source_balance - amount >= Decimal::ZERO
}
