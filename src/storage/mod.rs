pub mod in_memory;
pub mod traits;

#[cfg(feature = "db")]
pub mod database;

pub use in_memory::InMemoryStorage;
pub use traits::Storage;

#[cfg(feature = "db")]
pub use database::DatabaseStorage;

use crate::config::{StoreBackend, StoreConfig};
use crate::error::Result;
use std::sync::Arc;
use tracing::info;

/// Acquire the storage backend selected by `config`. Failure here is fatal.
pub async fn open(config: &StoreConfig) -> Result<Arc<dyn Storage>> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory storage; items are discarded when the run ends");
            Ok(Arc::new(InMemoryStorage::new()))
        }
        #[cfg(feature = "db")]
        StoreBackend::Libsql => Ok(Arc::new(DatabaseStorage::connect(config).await?)),
        #[cfg(not(feature = "db"))]
        StoreBackend::Libsql => Err(crate::error::IngestError::Config(
            "the libsql store requires building with the `db` feature".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_memory_store() {
        let storage = open(&StoreConfig::default()).await.unwrap();
        storage.close().await.unwrap();
    }

    #[cfg(not(feature = "db"))]
    #[tokio::test]
    async fn test_libsql_without_feature_is_config_error() {
        let config = StoreConfig {
            backend: StoreBackend::Libsql,
            ..StoreConfig::default()
        };
        assert!(matches!(
            open(&config).await,
            Err(crate::error::IngestError::Config(_))
        ));
    }
}
