//! Core business logic module
//!
//! This module contains the transfer core:
//! - `traits` - Store and notification seams
//! - `account_store` - Thread-safe in-memory account storage
//! - `validator` - Balance admission rule
//! - `lock_manager` - Critical-section policies and lock ordering
//! - `coordinator` - Transfer orchestration
//! - `notification` - Built-in notification sinks
//! - `batch_processor` - Concurrent dispatch of transfer batches

pub mod account_store;
pub mod batch_processor;
pub mod coordinator;
pub mod lock_manager;
pub mod notification;
pub mod traits;
pub mod validator;

pub use account_store::InMemoryAccountStore;
pub use batch_processor::BatchProcessor;
pub use coordinator::TransferCoordinator;
pub use lock_manager::{lock_order, LockPolicy, TransferLocks};
pub use notification::{LoggingNotificationSink, NoopNotificationSink};
pub use traits::{AccountStore, NotificationSink};
pub use validator::is_transfer_allowed;
