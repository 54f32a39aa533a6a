//! Connection pool over sqlx's `Any` driver.
//!
//! The concrete engine (MySQL or Postgres) is picked from the URL scheme at
//! connect time; the store separately needs its [`crate::Dialect`] to render
//! SQL.

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use tracing::info;

use crate::StoreResult;

/// Type alias for the shared pool used across the whole application.
pub type DbPool = AnyPool;

/// Create a new connection pool from the given `database_url`.
///
/// `max_connections` controls the pool ceiling.
pub async fn create_pool(database_url: &str, max_connections: u32) -> StoreResult<DbPool> {
    sqlx::any::install_default_drivers();

    info!("Connecting to database (max_connections={})", max_connections);
    let pool = AnyPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Run with: DATABASE_URL=postgres://... cargo test -p db -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url, 2).await.expect("pool creation failed");

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .expect("query failed");
    }
}
