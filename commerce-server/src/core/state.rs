use sqlx::SqlitePool;

use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::translations::{DbTranslationSource, SystemClock, TranslationCache};

/// Server state - shared handle to all services
///
/// Cloning is cheap: the pool and the cache are reference-counted
/// internally.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub db: SqlitePool,
    /// Translation read-through cache
    pub translation_cache: TranslationCache,
}

impl ServerState {
    /// Initialize server state
    ///
    /// 1. Ensure the work directory layout exists
    /// 2. Open the database and run migrations
    /// 3. Wire the translation cache over the database
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_dir().join("commerce.db");
        let db_service = DbService::new(&db_path.to_string_lossy(), config.max_db_connections)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;
        let db = db_service.pool;

        let translation_cache = TranslationCache::new(
            std::sync::Arc::new(DbTranslationSource::new(db.clone())),
            std::sync::Arc::new(SystemClock),
            std::time::Duration::from_millis(config.translation_cache_ttl_ms),
        );

        Ok(Self {
            config: config.clone(),
            db,
            translation_cache,
        })
    }

    /// Create server state from pre-built parts (used by tests)
    pub fn new(config: Config, db: SqlitePool, translation_cache: TranslationCache) -> Self {
        Self {
            config,
            db,
            translation_cache,
        }
    }

    pub fn get_db(&self) -> SqlitePool {
        self.db.clone()
    }

    /// Absolute path for a file stored under the storage root
    pub fn storage_path(&self, disk_path: &str) -> std::path::PathBuf {
        self.config.storage_dir().join(disk_path)
    }
}
