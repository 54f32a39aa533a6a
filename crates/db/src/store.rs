//! The store handle shared by every repository.

use crate::{DbPool, Dialect, StoreResult};
use crate::dialect::POSTGRES_DB_TYPE;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Settings fixed at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Database type discriminator, `mysql` or `postgres`.
    pub db_type: String,
    /// Prepended to every table this store owns.
    pub table_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_type: POSTGRES_DB_TYPE.to_string(),
            table_prefix: "focalboard_".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// SqlStore
// ---------------------------------------------------------------------------

/// Pool plus configuration. Cheap to clone; holds no per-call state.
#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: DbPool,
    config: StoreConfig,
}

impl SqlStore {
    pub fn new(pool: DbPool, config: StoreConfig) -> Self {
        Self { pool, config }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Resolve the configured database type, failing for unsupported ones.
    pub fn dialect(&self) -> StoreResult<Dialect> {
        Dialect::from_db_type(&self.config.db_type)
    }

    /// Prefixed name of a table owned by this store.
    pub fn table(&self, name: &str) -> String {
        format!("{}{}", self.config.table_prefix, name)
    }
}
