//! Records exchanged with the store.
//!
//! These are *persistence* models: they carry no behaviour beyond
//! (de)serialization for upstream handlers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// workspaces
// ---------------------------------------------------------------------------

/// A workspace row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    /// Opaque credential used for self-service joining.
    pub signup_token: String,
    /// Free-form JSON settings; `{}` when never written.
    #[serde(default = "empty_settings")]
    pub settings: Value,
    /// Id of whoever last wrote the row.
    pub modified_by: String,
    /// Unix seconds of the last write.
    pub update_at: i64,
}

impl Workspace {
    /// A workspace with empty settings and no token, ready to be upserted.
    pub fn new(id: impl Into<String>, modified_by: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            signup_token: String::new(),
            settings: empty_settings(),
            modified_by: modified_by.into(),
            update_at: 0,
        }
    }
}

fn empty_settings() -> Value {
    Value::Object(serde_json::Map::new())
}

// ---------------------------------------------------------------------------
// user workspaces (read-only projection)
// ---------------------------------------------------------------------------

/// A channel the user belongs to, with the number of non-template boards in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWorkspace {
    pub id: String,
    pub title: String,
    pub board_count: i64,
}
