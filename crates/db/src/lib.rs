//! `db` crate — workspace persistence layer.
//!
//! Provides a connection pool, the [`SqlStore`] handle, a small dialect-aware
//! statement builder, and the workspace repository operations for MySQL and
//! Postgres deployments.

pub mod dialect;
pub mod error;
pub mod models;
pub mod pool;
pub mod query;
pub mod repository;
pub mod store;

pub use dialect::Dialect;
pub use error::{StoreError, StoreResult};
pub use models::{UserWorkspace, Workspace};
pub use pool::DbPool;
pub use repository::new_signup_token;
pub use store::{SqlStore, StoreConfig};
