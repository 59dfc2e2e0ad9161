//! Shared type definitions for the database layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors specific to database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Schema migration failed: {0}")]
    Migration(String),
}

/// Row-visibility predicate passed into list queries.
///
/// Managers and system-initiated work read with `All`; a salesperson's
/// session reads with `OwnedBy`. The predicate is explicit at every call
/// site instead of being inferred from an ambient role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    OwnedBy(String),
}

impl Scope {
    /// Owner id to bind when the query filters by owner, `None` for `All`.
    pub fn owner(&self) -> Option<&str> {
        match self {
            Scope::All => None,
            Scope::OwnedBy(id) => Some(id.as_str()),
        }
    }
}

/// A row from the `leads` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbLead {
    pub id: String,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Where the lead came from (web form, referral, import).
    pub source: Option<String>,
    pub stage: String,
    pub qualification: Option<String>,
    pub response_status: Option<String>,
    pub owner_id: Option<String>,
    pub estimated_value: Option<f64>,
    /// Demo sessions scheduled so far. Drives first-vs-second demo wording.
    pub demo_count: i32,
    pub next_stage_note: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub converted_at: Option<String>,
}

/// A row from the `tasks` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbTask {
    pub id: String,
    pub lead_id: String,
    pub title: String,
    /// The lead's stage at creation time, frozen. Never re-derived from the
    /// lead's live stage.
    pub stage: String,
    pub flow_kind: String,
    pub status: String,
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub completed_at: Option<String>,
}

/// A row from the `activities` table. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbActivity {
    pub id: String,
    pub lead_id: String,
    pub task_id: Option<String>,
    pub salesperson_id: Option<String>,
    pub outcome: String,
    pub comment: Option<String>,
    pub from_stage: Option<String>,
    pub to_stage: Option<String>,
    pub created_at: String,
}

/// A row from the `appointments` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbAppointment {
    pub id: String,
    pub lead_id: String,
    /// The scheduling provider's event id. Unique; ingest is idempotent on it.
    pub provider_event_id: String,
    pub title: Option<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Outcome of syncing a booking event into appointments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingSyncOutcome {
    /// Event id was not seen before; a new row was inserted.
    New,
    /// Event id already existed; the row was updated in place.
    Updated,
}
