//! Completed-order persistence.
//!
//! The task only sees the narrow [`OrderStore`] trait; the failure policy
//! (log-and-continue, retry, hard-fail) lives with the caller.

pub mod json_file;

pub use json_file::JsonFileStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::order::CoffeeOrder;

/// Durable sink for completed orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Overwrite the stored snapshot with `order`.
    ///
    /// A point-in-time snapshot, not an event log: each completed order
    /// replaces whatever was written before.
    async fn save(&self, order: &CoffeeOrder) -> Result<(), StoreError>;
}
