//! Asynchronous CSV reader with batch interface
//!
//! Provides a streaming interface over the rows of an accounts or transfers
//! file, read in batches for the async pipeline.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader<T> → Batches of T::Output
//!                  ↓
//!           csv_format module
//!           (CsvRecord::convert)
//! ```

use crate::io::csv_format::CsvRecord;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use std::marker::PhantomData;
use tracing::warn;

/// Asynchronous CSV reader
///
/// Invalid rows are logged and skipped, so a batch only ever contains
/// converted values.
pub struct AsyncReader<R: AsyncRead + Unpin, T> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    skipped: usize,
    _record: PhantomData<T>,
}

impl<R, T> AsyncReader<R, T>
where
    R: AsyncRead + Unpin + Send + 'static,
    T: CsvRecord,
{
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            skipped: 0,
            _record: PhantomData,
        }
    }

    /// Read a batch of converted rows
    ///
    /// Reads up to `batch_size` valid rows. Invalid rows are logged with
    /// `warn!` and do not count towards the batch size.
    ///
    /// # Returns
    ///
    /// The converted rows in file order. An empty vector means the end of
    /// the file was reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<T::Output> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<T>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(row)) => match row.convert() {
                    Ok(value) => batch.push(value),
                    Err(e) => {
                        self.skipped += 1;
                        warn!("Skipping invalid record: {}", e);
                    }
                },
                Some(Err(e)) => {
                    self.skipped += 1;
                    warn!("Skipping unparsable record: {}", e);
                }
                None => break,
            }
        }

        batch
    }

    /// Number of rows skipped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
