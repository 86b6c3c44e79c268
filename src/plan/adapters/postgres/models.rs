//! Diesel row models for plan persistence.

use super::schema::plans;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query and insert row for plan records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = plans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PlanRow {
    /// Owning application acronym.
    pub application_acronym: String,
    /// Plan name.
    pub name: String,
    /// Optional start date.
    pub start_date: Option<NaiveDate>,
    /// Optional end date.
    pub end_date: Option<NaiveDate>,
    /// Optional display colour.
    pub color: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
