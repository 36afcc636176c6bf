use super::traits::Storage;
use crate::error::{IngestError, Result};
use crate::types::{NormalizedItem, StoredItem};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// In-memory storage implementation for development/testing
pub struct InMemoryStorage {
    items: Arc<Mutex<Vec<StoredItem>>>,
    closed: AtomicBool,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
            closed: AtomicBool::new(false),
        }
    }

    /// Snapshot of everything stored so far, in insertion order
    pub fn items(&self) -> Vec<StoredItem> {
        self.items
            .lock()
            .map(|items| items.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_item(&self, item: &NormalizedItem) -> Result<StoredItem> {
        if self.is_closed() {
            return Err(IngestError::storage("storage is closed"));
        }

        let stored = StoredItem {
            id: Uuid::new_v4(),
            item: item.clone(),
            created_at: Utc::now(),
        };

        let mut items = self
            .items
            .lock()
            .map_err(|_| IngestError::storage("item store lock poisoned"))?;
        items.push(stored.clone());

        debug!("Created item: {} with id {}", stored.name(), stored.id);
        Ok(stored)
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        debug!("Closed in-memory storage");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> NormalizedItem {
        NormalizedItem {
            name: name.to_string(),
            expiration_date: None,
            quantity: 1,
            keywords: Vec::new(),
            placement: "Unknown".to_string(),
            hidden: false,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_unique_ids() {
        let storage = InMemoryStorage::new();
        let a = storage.create_item(&item("Milk")).await.unwrap();
        let b = storage.create_item(&item("Milk")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.name(), "Milk");
        assert_eq!(storage.len(), 2);
    }

    #[tokio::test]
    async fn test_create_after_close_fails() {
        let storage = InMemoryStorage::new();
        storage.close().await.unwrap();

        assert!(storage.is_closed());
        assert!(storage.create_item(&item("Milk")).await.is_err());
        assert!(storage.is_empty());
    }
}
