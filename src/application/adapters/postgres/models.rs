//! Diesel row models for application persistence.

use super::schema::applications;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for application records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ApplicationRow {
    /// Application acronym.
    pub acronym: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional start date.
    pub start_date: Option<NaiveDate>,
    /// Optional end date.
    pub end_date: Option<NaiveDate>,
    /// Issued running number.
    pub running_number: i64,
    /// Creation permission group.
    pub permit_open: Option<String>,
    /// To-do permission group.
    pub permit_todo: Option<String>,
    /// Doing permission group.
    pub permit_doing: Option<String>,
    /// Done permission group.
    pub permit_done: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for application records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = applications)]
pub struct NewApplicationRow {
    /// Application acronym.
    pub acronym: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional start date.
    pub start_date: Option<NaiveDate>,
    /// Optional end date.
    pub end_date: Option<NaiveDate>,
    /// Issued running number.
    pub running_number: i64,
    /// Creation permission group.
    pub permit_open: Option<String>,
    /// To-do permission group.
    pub permit_todo: Option<String>,
    /// Doing permission group.
    pub permit_doing: Option<String>,
    /// Done permission group.
    pub permit_done: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
