//! Typed error type for the db crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Connectivity or SQL failure reported by the driver.
    #[error("sqlx error: {0}")]
    Query(#[from] sqlx::Error),

    /// A row came back in a shape that does not match the projection.
    #[error("row decode error: {0}")]
    Decode(#[source] sqlx::Error),

    #[error("settings serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("settings deserialization error: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The configured database type has no SQL for the requested operation.
    #[error(
        "method is unsupported on database type '{0}'. Supported databases are - MySQL and PostgreSQL"
    )]
    UnsupportedDatabase(String),

    #[error("workspace not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// True for the "no matching row" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Query(sqlx::Error::RowNotFound))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
