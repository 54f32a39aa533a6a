//! SQL dialects understood by the store.
//!
//! Every fragment of SQL that differs between engines lives here, so the
//! statement builders in [`crate::query`] and the repositories never branch on
//! the database type themselves.

use crate::{StoreError, StoreResult};

/// Database type discriminator for MySQL-family engines.
pub const MYSQL_DB_TYPE: &str = "mysql";
/// Database type discriminator for Postgres-family engines.
pub const POSTGRES_DB_TYPE: &str = "postgres";

/// The closed set of supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Postgres,
}

impl Dialect {
    /// Resolve a configured database type.
    ///
    /// Anything other than `mysql` or `postgres` yields
    /// [`StoreError::UnsupportedDatabase`].
    pub fn from_db_type(db_type: &str) -> StoreResult<Self> {
        match db_type {
            MYSQL_DB_TYPE => Ok(Self::MySql),
            POSTGRES_DB_TYPE => Ok(Self::Postgres),
            other => Err(StoreError::UnsupportedDatabase(other.to_string())),
        }
    }

    /// Guess the database type from a connection URL scheme.
    pub fn infer_from_url(database_url: &str) -> Option<Self> {
        let scheme = database_url.split_once("://")?.0;
        match scheme {
            "mysql" | "mariadb" => Some(Self::MySql),
            "postgres" | "postgresql" => Some(Self::Postgres),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MySql => MYSQL_DB_TYPE,
            Self::Postgres => POSTGRES_DB_TYPE,
        }
    }

    /// Bind parameter marker for the 1-based parameter `index`.
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Self::MySql => "?".to_string(),
            Self::Postgres => format!("${index}"),
        }
    }

    /// Wrap a bind marker so a text parameter lands in a JSON column.
    ///
    /// MySQL-family engines convert text into JSON/TEXT columns on their own,
    /// and MariaDB rejects `CAST(.. AS JSON)`, so only Postgres gets a cast.
    pub fn json_param(self, placeholder: &str) -> String {
        match self {
            Self::MySql => placeholder.to_string(),
            Self::Postgres => format!("CAST({placeholder} AS JSON)"),
        }
    }

    /// Read a JSON (or text) expression back as a plain string.
    pub fn text_expr(self, expr: &str) -> String {
        match self {
            Self::MySql => format!("CAST({expr} AS CHAR)"),
            Self::Postgres => format!("CAST({expr} AS TEXT)"),
        }
    }

    /// Suffix turning an `INSERT` into an insert-or-update keyed on
    /// `conflict_key`, overwriting `columns` with the values just offered.
    pub fn upsert_conflict_clause(self, conflict_key: &str, columns: &[&str]) -> String {
        match self {
            Self::MySql => {
                let sets: Vec<String> = columns
                    .iter()
                    .map(|c| format!("{c} = VALUES({c})"))
                    .collect();
                format!("ON DUPLICATE KEY UPDATE {}", sets.join(", "))
            }
            Self::Postgres => {
                let sets: Vec<String> = columns
                    .iter()
                    .map(|c| format!("{c} = EXCLUDED.{c}"))
                    .collect();
                format!("ON CONFLICT ({conflict_key}) DO UPDATE SET {}", sets.join(", "))
            }
        }
    }

    /// Predicate selecting blocks in `blocks_table` that are not templates.
    ///
    /// MySQL stores `fields` as serialized text, so this is a pattern match on
    /// the compact JSON encoding; Postgres compares the JSON path directly.
    pub fn non_template_filter(self, blocks_table: &str) -> String {
        match self {
            Self::MySql => format!("{blocks_table}.fields LIKE '%\"isTemplate\":false%'"),
            Self::Postgres => format!("{blocks_table}.fields ->> 'isTemplate' = 'false'"),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Dialect {
    type Err = StoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_type(s)
    }
}
