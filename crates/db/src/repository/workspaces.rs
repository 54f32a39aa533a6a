//! Workspace reads and upserts.
//!
//! Each operation is a single statement. Statement construction is kept in
//! plain functions so the SQL for both dialects can be checked without a
//! database; the `SqlStore` methods only resolve the dialect, bind and decode.

use chrono::Utc;
use serde_json::Value;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, instrument};
use uuid::Uuid;

use crate::{
    models::{UserWorkspace, Workspace},
    query::{Arg, InsertBuilder, SelectBuilder, Statement},
    Dialect, SqlStore, StoreError, StoreResult,
};

const WORKSPACES: &str = "workspaces";
const BLOCKS: &str = "blocks";

/// Mint a fresh opaque signup token.
pub fn new_signup_token() -> String {
    Uuid::new_v4().simple().to_string()
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

fn signup_token_upsert(dialect: Dialect, table: &str, workspace: &Workspace, now: i64) -> Statement {
    InsertBuilder::insert_into(table)
        .value("id", Arg::text(&workspace.id))
        .value("signup_token", Arg::text(&workspace.signup_token))
        .value("modified_by", Arg::text(&workspace.modified_by))
        .value("update_at", Arg::BigInt(now))
        .on_conflict_update("id", &["signup_token", "modified_by", "update_at"])
        .build(dialect)
}

/// `signup_token` only reaches the insert branch; an existing row keeps its token.
fn settings_upsert(
    dialect: Dialect,
    table: &str,
    workspace: &Workspace,
    settings_json: String,
    signup_token: String,
    now: i64,
) -> Statement {
    InsertBuilder::insert_into(table)
        .value("id", Arg::text(&workspace.id))
        .value("signup_token", Arg::Text(signup_token))
        .value("settings", Arg::Json(settings_json))
        .value("modified_by", Arg::text(&workspace.modified_by))
        .value("update_at", Arg::BigInt(now))
        .on_conflict_update("id", &["settings", "modified_by", "update_at"])
        .build(dialect)
}

fn workspace_select(dialect: Dialect, table: &str, id: &str) -> Statement {
    SelectBuilder::select([
        "id".to_string(),
        "signup_token".to_string(),
        dialect.text_expr("COALESCE(settings, '{}')"),
        "modified_by".to_string(),
        "update_at".to_string(),
    ])
    .from(table)
    .where_eq("id", Arg::text(id))
    .build(dialect)
}

fn workspace_count_select(dialect: Dialect, table: &str) -> Statement {
    SelectBuilder::select(["COUNT(*) AS count"])
        .from(table)
        .build(dialect)
}

/// Channels the user is a member of, each with its non-template board count.
/// The left join keeps channels without boards (count 0).
fn user_workspaces_select(dialect: Dialect, blocks: &str, user_id: &str) -> Statement {
    let board_filter = format!(
        "{blocks} ON {blocks}.workspace_id = ChannelMembers.ChannelId AND {blocks}.type = 'board' AND {}",
        dialect.non_template_filter(blocks),
    );

    SelectBuilder::select([
        "Channels.Id".to_string(),
        "Channels.DisplayName".to_string(),
        format!("COUNT({blocks}.id)"),
    ])
    .from("ChannelMembers")
    .join("Channels ON ChannelMembers.ChannelId = Channels.Id")
    .left_join(board_filter)
    .where_eq("ChannelMembers.UserId", Arg::text(user_id))
    .group_by(["Channels.Id", "Channels.DisplayName"])
    .build(dialect)
}

// ---------------------------------------------------------------------------
// Row decoding
// ---------------------------------------------------------------------------

fn user_workspace_from_row(row: &AnyRow) -> Result<UserWorkspace, sqlx::Error> {
    Ok(UserWorkspace {
        id: row.try_get(0)?,
        title: row.try_get(1)?,
        board_count: row.try_get(2)?,
    })
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

impl SqlStore {
    /// Insert a workspace with its signup token, or overwrite the token,
    /// modifier and timestamp of an existing one.
    #[instrument(skip(self, workspace), fields(workspace_id = %workspace.id))]
    pub async fn upsert_workspace_signup_token(&self, workspace: &Workspace) -> StoreResult<()> {
        let dialect = self.dialect()?;
        let now = Utc::now().timestamp();

        signup_token_upsert(dialect, &self.table(WORKSPACES), workspace, now)
            .query()
            .execute(self.pool())
            .await?;

        debug!("signup token upserted");
        Ok(())
    }

    /// Insert a workspace with settings and a freshly minted token, or
    /// overwrite the settings of an existing one (its token is kept).
    #[instrument(skip(self, workspace), fields(workspace_id = %workspace.id))]
    pub async fn upsert_workspace_settings(&self, workspace: &Workspace) -> StoreResult<()> {
        let dialect = self.dialect()?;
        let now = Utc::now().timestamp();
        let settings_json =
            serde_json::to_string(&workspace.settings).map_err(StoreError::Serialization)?;

        settings_upsert(
            dialect,
            &self.table(WORKSPACES),
            workspace,
            settings_json,
            new_signup_token(),
            now,
        )
        .query()
        .execute(self.pool())
        .await?;

        debug!("settings upserted");
        Ok(())
    }

    /// Fetch a workspace by id.
    ///
    /// Returns [`StoreError::NotFound`] when no row matches. Settings that
    /// were never written come back as `{}`.
    pub async fn get_workspace(&self, id: &str) -> StoreResult<Workspace> {
        let dialect = self.dialect()?;

        let row = workspace_select(dialect, &self.table(WORKSPACES), id)
            .query()
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let settings_json: String = row.try_get(2).map_err(StoreError::Decode)?;
        let settings: Value = serde_json::from_str(&settings_json).map_err(|e| {
            error!(workspace_id = %id, error = %e, "failed to decode workspace settings");
            StoreError::Deserialization(e)
        })?;

        Ok(Workspace {
            id: row.try_get(0).map_err(StoreError::Decode)?,
            signup_token: row.try_get(1).map_err(StoreError::Decode)?,
            settings,
            modified_by: row.try_get(3).map_err(StoreError::Decode)?,
            update_at: row.try_get(4).map_err(StoreError::Decode)?,
        })
    }

    /// Whether `user_id` may access `workspace_id`.
    ///
    /// Placeholder: always grants access. Replace with a membership check
    /// before relying on it for authorization.
    pub async fn has_workspace_access(&self, _user_id: &str, _workspace_id: &str) -> StoreResult<bool> {
        Ok(true)
    }

    /// Total number of workspace rows.
    pub async fn get_workspace_count(&self) -> StoreResult<i64> {
        let dialect = self.dialect()?;

        let row = workspace_count_select(dialect, &self.table(WORKSPACES))
            .query()
            .fetch_one(self.pool())
            .await
            .map_err(|e| {
                error!(error = %e, "failed to query workspace count");
                StoreError::Query(e)
            })?;

        row.try_get::<i64, _>(0).map_err(|e| {
            error!(error = %e, "failed to fetch workspace count");
            StoreError::Decode(e)
        })
    }

    /// Channels `user_id` belongs to, each with its count of non-template
    /// boards.
    ///
    /// Fails with [`StoreError::UnsupportedDatabase`] before touching the
    /// database when the configured type is neither MySQL nor Postgres. A
    /// single malformed row fails the whole call.
    #[instrument(skip(self))]
    pub async fn get_user_workspaces(&self, user_id: &str) -> StoreResult<Vec<UserWorkspace>> {
        let dialect = self.dialect()?;

        let rows = user_workspaces_select(dialect, &self.table(BLOCKS), user_id)
            .query()
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                error!(error = %e, "failed to query user workspaces");
                StoreError::Query(e)
            })?;

        rows.iter()
            .map(user_workspace_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                error!(error = %e, "failed to decode user workspace row");
                StoreError::Decode(e)
            })
    }
}
