//! JSON-file order store — one well-known path, fully overwritten per order.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::error::StoreError;
use crate::order::CoffeeOrder;
use crate::store::OrderStore;

/// Writes the completed order as a pretty-printed JSON document.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store writing to `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The path the snapshot is written to.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl OrderStore for JsonFileStore {
    async fn save(&self, order: &CoffeeOrder) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(order)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, json).await?;
        tracing::info!(path = %self.path.display(), "Order saved");
        Ok(())
    }
}
