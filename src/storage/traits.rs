use crate::error::Result;
use crate::types::{NormalizedItem, StoredItem};
use async_trait::async_trait;

/// Storage collaborator the batch loader writes pantry items into.
///
/// Every call to `create_item` appends a new record; nothing is deduplicated
/// or updated in place.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist one item and return it with its assigned id
    async fn create_item(&self, item: &NormalizedItem) -> Result<StoredItem>;

    /// Release the underlying connection. Called once at the end of every run.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
