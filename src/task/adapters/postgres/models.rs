//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query and insert row for task records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Rendered identifier.
    pub id: String,
    /// Owning application acronym.
    pub application_acronym: String,
    /// Per-application task number.
    pub number: i64,
    /// Task name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional plan reference.
    pub plan_name: Option<String>,
    /// Workflow state.
    pub state: String,
    /// Creating principal.
    pub creator: String,
    /// Current owner.
    pub owner: String,
    /// Audit notes JSON array.
    pub notes: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
