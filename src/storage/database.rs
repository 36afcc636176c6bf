use super::traits::Storage;
use crate::config::StoreConfig;
use crate::error::{IngestError, Result};
use crate::types::{NormalizedItem, StoredItem};
use async_trait::async_trait;
use chrono::Utc;
use libsql::{Builder, Connection, Database};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS food_items (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    expiration_date TEXT,
    quantity INTEGER NOT NULL,
    image_url TEXT,
    keywords TEXT NOT NULL,
    placement TEXT NOT NULL,
    hidden INTEGER NOT NULL,
    created_at TEXT NOT NULL
)";

const INSERT_ITEM_SQL: &str = "INSERT INTO food_items \
    (id, name, expiration_date, quantity, image_url, keywords, placement, hidden, created_at) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";

/// libSQL-backed storage, either a local database file or a remote Turso database
pub struct DatabaseStorage {
    _db: Database,
    conn: Mutex<Option<Connection>>,
}

impl DatabaseStorage {
    /// Open the database described by `config` and make sure the items table exists
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let db = match (&config.url, &config.auth_token) {
            (Some(url), Some(token)) => {
                info!("Connecting to Turso database at {}", url);
                Builder::new_remote(url.clone(), token.clone())
                    .build()
                    .await
            }
            (Some(_), None) => {
                return Err(IngestError::Config(
                    "LIBSQL_AUTH_TOKEN must be set when LIBSQL_URL is used".to_string(),
                ))
            }
            (None, _) => {
                info!("Opening local database at {}", config.database_path.display());
                Builder::new_local(&config.database_path).build().await
            }
        }
        .map_err(|e| IngestError::Database {
            message: format!("Failed to connect to database: {e}"),
        })?;

        let conn = db.connect().map_err(|e| IngestError::Database {
            message: format!("Failed to get database connection: {e}"),
        })?;

        conn.execute(CREATE_TABLE_SQL, ())
            .await
            .map_err(|e| IngestError::Database {
                message: format!("Failed to prepare food_items table: {e}"),
            })?;

        Ok(Self {
            _db: db,
            conn: Mutex::new(Some(conn)),
        })
    }
}

#[async_trait]
impl Storage for DatabaseStorage {
    async fn create_item(&self, item: &NormalizedItem) -> Result<StoredItem> {
        let guard = self.conn.lock().await;
        let conn = guard
            .as_ref()
            .ok_or_else(|| IngestError::storage("database connection is closed"))?;

        let stored = StoredItem {
            id: Uuid::new_v4(),
            item: item.clone(),
            created_at: Utc::now(),
        };
        let keywords = serde_json::to_string(&item.keywords)?;

        conn.execute(
            INSERT_ITEM_SQL,
            libsql::params![
                stored.id.to_string(),
                item.name.clone(),
                item.expiration_date.map(|d| d.format("%Y-%m-%d").to_string()),
                i64::from(item.quantity),
                item.image_url.clone(),
                keywords,
                item.placement.clone(),
                i64::from(item.hidden),
                stored.created_at.to_rfc3339()
            ],
        )
        .await
        .map_err(|e| IngestError::Database {
            message: format!("Failed to insert item: {e}"),
        })?;

        debug!("Created item: {} with id {}", stored.name(), stored.id);
        Ok(stored)
    }

    async fn close(&self) -> Result<()> {
        if self.conn.lock().await.take().is_some() {
            debug!("Closed database connection");
        }
        Ok(())
    }
}
