//! Transfer notifications
//!
//! Sinks that receive the debit/credit messages emitted after a committed
//! transfer. The coordinator calls them after releasing its locks and
//! swallows whatever they return.

use crate::core::traits::NotificationSink;
use crate::types::{Account, TransferError};
use tracing::debug;

/// Sink that writes every notification to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotificationSink;

impl NotificationSink for LoggingNotificationSink {
    fn notify_about_transfer(
        &self,
        account: &Account,
        message: &str,
    ) -> Result<(), TransferError> {
        debug!(account = %account.id, "Sending notification to owner of {}: {}", account.id, message);
        Ok(())
    }
}

/// Sink that discards every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotificationSink;

impl NotificationSink for NoopNotificationSink {
    fn notify_about_transfer(&self, _account: &Account, _message: &str) -> Result<(), TransferError> {
        Ok(())
    }
}
