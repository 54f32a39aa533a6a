//! `workspace-store` CLI entry-point.
//!
//! Available sub-commands:
//! - `get`             — print a workspace record.
//! - `count`           — print the number of workspaces.
//! - `user-workspaces` — list the channels a user belongs to with board counts.
//! - `set-token`       — insert or replace a workspace signup token.
//! - `set-settings`    — insert or replace a workspace's JSON settings.
//! - `has-access`      — check whether a user may access a workspace.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use db::{pool::create_pool, Dialect, SqlStore, StoreConfig, Workspace};

#[derive(Parser)]
#[command(
    name = "workspace-store",
    about = "Inspect and update workspace records in a MySQL or Postgres store",
    version
)]
struct Cli {
    #[command(flatten)]
    db: DbArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct DbArgs {
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// `mysql` or `postgres`; inferred from the URL scheme when omitted.
    #[arg(long, env = "DB_TYPE")]
    db_type: Option<Dialect>,

    #[arg(long, env = "TABLE_PREFIX", default_value = "focalboard_")]
    table_prefix: String,

    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 5)]
    max_connections: u32,
}

impl DbArgs {
    fn store_config(&self) -> Result<StoreConfig> {
        let dialect = match self.db_type {
            Some(dialect) => dialect,
            None => Dialect::infer_from_url(&self.database_url)
                .ok_or_else(|| anyhow!("cannot infer database type from URL; pass --db-type"))?,
        };
        Ok(StoreConfig {
            db_type: dialect.as_str().to_string(),
            table_prefix: self.table_prefix.clone(),
        })
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print a workspace record.
    Get { id: String },
    /// Print the number of workspaces.
    Count,
    /// List the channels a user belongs to, with non-template board counts.
    UserWorkspaces { user_id: String },
    /// Insert or replace a workspace signup token.
    SetToken {
        id: String,
        /// Token to store; a fresh one is generated when omitted.
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        modified_by: String,
    },
    /// Insert or replace a workspace's settings.
    SetSettings {
        id: String,
        /// Settings as a JSON document.
        settings: String,
        #[arg(long)]
        modified_by: String,
    },
    /// Check whether a user may access a workspace.
    HasAccess { user_id: String, workspace_id: String },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.db.store_config()?;
    info!(db_type = %config.db_type, table_prefix = %config.table_prefix, "Opening workspace store");

    let pool = create_pool(&cli.db.database_url, cli.db.max_connections)
        .await
        .context("failed to connect to database")?;
    let store = SqlStore::new(pool, config);

    match cli.command {
        Command::Get { id } => {
            let workspace = store.get_workspace(&id).await?;
            print_json(&workspace)?;
        }
        Command::Count => {
            let count = store.get_workspace_count().await?;
            println!("{count}");
        }
        Command::UserWorkspaces { user_id } => {
            let workspaces = store.get_user_workspaces(&user_id).await?;
            print_json(&workspaces)?;
        }
        Command::SetToken { id, token, modified_by } => {
            let workspace = Workspace {
                signup_token: token.unwrap_or_else(db::new_signup_token),
                ..Workspace::new(id, modified_by)
            };
            store.upsert_workspace_signup_token(&workspace).await?;
            info!(workspace_id = %workspace.id, "Signup token stored");
            println!("{}", workspace.signup_token);
        }
        Command::SetSettings { id, settings, modified_by } => {
            let settings = serde_json::from_str(&settings).context("settings must be valid JSON")?;
            let workspace = Workspace { settings, ..Workspace::new(id, modified_by) };
            store.upsert_workspace_settings(&workspace).await?;
            info!(workspace_id = %workspace.id, "Settings stored");
        }
        Command::HasAccess { user_id, workspace_id } => {
            let allowed = store.has_workspace_access(&user_id, &workspace_id).await?;
            println!("{allowed}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("valid arguments")
    }

    #[test]
    fn db_type_is_inferred_from_url() {
        let cli = parse(&["workspace-store", "--database-url", "mysql://u@h/db", "count"]);
        let cfg = cli.db.store_config().unwrap();
        assert_eq!(cfg.db_type, "mysql");
        assert_eq!(cfg.table_prefix, "focalboard_");
    }

    #[test]
    fn explicit_db_type_wins_over_url() {
        let cli = parse(&[
            "workspace-store",
            "--database-url",
            "postgres://h/db",
            "--db-type",
            "mysql",
            "--table-prefix",
            "x_",
            "get",
            "ws1",
        ]);
        let cfg = cli.db.store_config().unwrap();
        assert_eq!(cfg.db_type, "mysql");
        assert_eq!(cfg.table_prefix, "x_");
        assert!(matches!(cli.command, Command::Get { ref id } if id == "ws1"));
    }

    #[test]
    fn unknown_scheme_without_db_type_is_an_error() {
        let cli = parse(&["workspace-store", "--database-url", "sqlite://x.db", "count"]);
        assert!(cli.db.store_config().is_err());
    }

    #[test]
    fn unsupported_db_type_is_rejected_at_parse_time() {
        let parsed = Cli::try_parse_from([
            "workspace-store",
            "--database-url",
            "postgres://h/db",
            "--db-type",
            "sqlite3",
            "count",
        ]);
        let err = parsed.err().expect("sqlite3 must not parse");
        assert!(err.to_string().contains("sqlite3"));
    }

    #[test]
    fn set_token_accepts_optional_token() {
        let cli = parse(&[
            "workspace-store",
            "--database-url",
            "postgres://h/db",
            "set-token",
            "ws1",
            "--modified-by",
            "admin",
        ]);
        match cli.command {
            Command::SetToken { id, token, modified_by } => {
                assert_eq!(id, "ws1");
                assert!(token.is_none());
                assert_eq!(modified_by, "admin");
            }
            _ => panic!("expected set-token"),
        }
    }
}
