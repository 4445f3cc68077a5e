//! CSV format handling for accounts, transfer requests and transfer results
//!
//! This module centralizes all CSV format concerns, providing:
//! - Row structures for deserialization (`AccountCsvRecord`, `TransferCsvRecord`)
//! - Conversion from CSV rows to domain types
//! - Account balance and transfer result serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{Account, ProcessingResult, TransferError, TransferRequest};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// A deserializable CSV row that converts into a domain value
///
/// Lets the sync and async readers stay generic over the file they read.
pub trait CsvRecord: DeserializeOwned {
    /// Domain type produced by a valid row
    type Output;

    /// Validate the row and convert it
    fn convert(self) -> Result<Self::Output, TransferError>;
}

/// Row of the accounts file: `id,balance`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AccountCsvRecord {
    pub id: String,
    pub balance: String,
}

/// Row of the transfers file: `from,to,amount`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TransferCsvRecord {
    pub from: String,
    pub to: String,
    pub amount: String,
}

impl CsvRecord for AccountCsvRecord {
    type Output = Account;

    fn convert(self) -> Result<Account, TransferError> {
        convert_account_record(self)
    }
}

impl CsvRecord for TransferCsvRecord {
    type Output = TransferRequest;

    fn convert(self) -> Result<TransferRequest, TransferError> {
        convert_transfer_record(self)
    }
}

/// Convert an AccountCsvRecord to an Account
///
/// # Errors
///
/// - `InvalidAccountId` if the id is blank
/// - `InvalidAmount` if the balance is not a decimal number
/// - `NegativeBalance` if the balance is below zero
pub fn convert_account_record(record: AccountCsvRecord) -> Result<Account, TransferError> {
    let id = parse_account_id(&record.id)?;
    let balance = parse_decimal(&record.balance)?;

    if balance < Decimal::ZERO {
        return Err(TransferError::negative_balance(&id, balance));
    }

    Ok(Account::new(id, balance))
}

/// Convert a TransferCsvRecord to a TransferRequest
///
/// Only the shape of the row is checked here. Same-account requests and
/// non-positive amounts are left for the coordinator to reject, so they show
/// up in the results with their proper outcome.
///
/// # Errors
///
/// - `InvalidAccountId` if either side is blank
/// - `InvalidAmount` if the amount is not a decimal number
pub fn convert_transfer_record(record: TransferCsvRecord) -> Result<TransferRequest, TransferError> {
    let from = parse_account_id(&record.from)?;
    let to = parse_account_id(&record.to)?;
    let amount = parse_decimal(&record.amount)?;

    Ok(TransferRequest::new(from, to, amount))
}

fn parse_account_id(raw: &str) -> Result<String, TransferError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(TransferError::invalid_account_id(raw));
    }
    Ok(id.to_string())
}

fn parse_decimal(raw: &str) -> Result<Decimal, TransferError> {
    Decimal::from_str(raw.trim()).map_err(|_| TransferError::invalid_amount(raw))
}

/// Write account balances to CSV format
///
/// Writes accounts with columns `id,balance`, sorted by id for
/// deterministic output. Balances are printed with four decimal places.
///
/// # Arguments
///
/// * `accounts` - Slice of accounts to write
/// * `output` - Mutable reference to a writer for outputting CSV
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), TransferError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["id", "balance"])?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by(|a, b| a.id.cmp(&b.id));

    for account in sorted_accounts {
        writer.write_record([account.id, format!("{:.4}", account.balance)])?;
    }

    writer.flush()?;

    Ok(())
}

/// Write per-transfer outcomes to CSV format
///
/// Columns: `from,to,amount,outcome,message`. Rows keep the order of
/// `results`; a missing message is written as an empty field.
pub fn write_results_csv(
    results: &[ProcessingResult],
    output: &mut dyn Write,
) -> Result<(), TransferError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["from", "to", "amount", "outcome", "message"])?;

    for processed in results {
        let amount = processed.request.amount.to_string();
        writer.write_record([
            processed.request.from.as_str(),
            processed.request.to.as_str(),
            amount.as_str(),
            processed.result.outcome.as_str(),
            processed.result.message.as_deref().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}
