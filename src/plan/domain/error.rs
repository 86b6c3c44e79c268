//! Error types for plan validation.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing plan domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanDomainError {
    /// The plan name is empty after trimming.
    #[error("plan name must not be empty")]
    EmptyName,

    /// The plan name exceeds the storage limit.
    #[error("plan name exceeds 100 character limit: {0}")]
    NameTooLong(String),

    /// The colour hint exceeds the storage limit.
    #[error("plan colour exceeds 32 character limit: {0}")]
    ColorTooLong(String),

    /// The end date precedes the start date.
    #[error("plan end date {end} precedes start date {start}")]
    InvalidDateRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },
}
