//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over the rows of an accounts or transfers
//! file. Delegates row validation to the csv_format module.
//!
//! # Iterator Interface
//!
//! `SyncReader<T>` yields `Result<T::Output, TransferError>` for each CSV
//! row:
//!
//! ```no_run
//! use rust_transfer_engine::io::csv_format::TransferCsvRecord;
//! use rust_transfer_engine::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::<TransferCsvRecord>::new(Path::new("transfers.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(request) => println!("Transfer: {:?}", request),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual row errors are yielded as `ParseError` items carrying the
//!   1-based line number (the header is line 1)

use crate::io::csv_format::CsvRecord;
use crate::types::TransferError;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::marker::PhantomData;
use std::path::Path;

/// Synchronous CSV reader
///
/// Reads one row at a time; memory use does not grow with the file size.
#[derive(Debug)]
pub struct SyncReader<T> {
    reader: csv::Reader<File>,
    line_num: u64,
    _record: PhantomData<T>,
}

impl<T: CsvRecord> SyncReader<T> {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader is configured to trim whitespace from all fields and
    /// to accept rows with a varying number of fields (they fail per row
    /// instead of aborting the file).
    ///
    /// # Errors
    ///
    /// * `FileNotFound` if the path does not exist
    /// * `IoError` if the file exists but cannot be opened
    pub fn new(path: &Path) -> Result<Self, TransferError> {
        let file = File::open(path).map_err(|e| TransferError::open_failed(path, e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 1,
            _record: PhantomData,
        })
    }
}

impl<T: CsvRecord> Iterator for SyncReader<T> {
    type Item = Result<T::Output, TransferError>;

    /// Get the next converted row
    ///
    /// # Returns
    ///
    /// * `Some(Ok(_))` - Successfully converted row
    /// * `Some(Err(ParseError))` - Parse or conversion error with line number
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<T>();
        let row = deserializer.next()?;
        self.line_num += 1;

        let line = self.line_num;
        Some(
            row.map_err(TransferError::from)
                .and_then(T::convert)
                .map_err(|e| match e {
                    TransferError::ParseError { message, .. } => TransferError::ParseError {
                        line: Some(line),
                        message,
                    },
                    other => TransferError::ParseError {
                        line: Some(line),
                        message: other.to_string(),
                    },
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::csv_format::{AccountCsvRecord, TransferCsvRecord};
    use crate::types::{Account, TransferRequest};
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_sync_reader_fails_on_missing_file() {
        let result = SyncReader::<AccountCsvRecord>::new(Path::new("nonexistent.csv"));

        assert!(matches!(result, Err(TransferError::FileNotFound { .. })));
    }

    #[test]
    fn test_sync_reader_reads_accounts() {
        let file = create_temp_csv("id,balance\nId-1,100\nId-2,0.5\n");

        let reader = SyncReader::<AccountCsvRecord>::new(file.path()).unwrap();
        let accounts: Vec<Account> = reader.map(Result::unwrap).collect();

        assert_eq!(
            accounts,
            vec![Account::new("Id-1", dec!(100)), Account::new("Id-2", dec!(0.5))]
        );
    }

    #[test]
    fn test_sync_reader_reads_transfers() {
        let file = create_temp_csv("from,to,amount\n  X ,  Y  ,  30  \nY,X,0\n");

        let reader = SyncReader::<TransferCsvRecord>::new(file.path()).unwrap();
        let requests: Vec<TransferRequest> = reader.map(Result::unwrap).collect();

        assert_eq!(
            requests,
            vec![
                TransferRequest::new("X", "Y", dec!(30)),
                TransferRequest::new("Y", "X", dec!(0)),
            ]
        );
    }

    #[test]
    fn test_sync_reader_includes_line_numbers_in_errors() {
        let file = create_temp_csv("from,to,amount\nX,Y,10\nX,Y,invalid\nX,Y,5\n");

        let reader = SyncReader::<TransferCsvRecord>::new(file.path()).unwrap();
        let records: Vec<_> = reader.collect();

        assert_eq!(records.len(), 3);
        assert!(records[0].is_ok());
        assert!(records[2].is_ok());
        let error = records[1].as_ref().unwrap_err();
        assert!(matches!(error, TransferError::ParseError { line: Some(3), .. }));
        assert!(error.to_string().contains("Invalid amount"));
    }

    #[test]
    fn test_sync_reader_continues_after_short_row() {
        let file = create_temp_csv("from,to,amount\nX,Y\nX,Y,5\n");

        let reader = SyncReader::<TransferCsvRecord>::new(file.path()).unwrap();
        let records: Vec<_> = reader.collect();

        assert_eq!(records.len(), 2);
        assert!(records[0].is_err());
        assert_eq!(
            records[1].as_ref().unwrap(),
            &TransferRequest::new("X", "Y", dec!(5))
        );
    }

    #[test]
    fn test_sync_reader_handles_empty_file_after_header() {
        let file = create_temp_csv("id,balance\n");

        let reader = SyncReader::<AccountCsvRecord>::new(file.path()).unwrap();

        assert_eq!(reader.count(), 0);
    }
}
