//! Error types for application domain validation and parsing.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing application domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApplicationDomainError {
    /// The acronym is empty after trimming.
    #[error("application acronym must not be empty")]
    EmptyAcronym,

    /// The acronym exceeds the 50-character storage limit.
    #[error("application acronym exceeds 50 character limit: {0}")]
    AcronymTooLong(String),

    /// The acronym contains characters outside `[A-Za-z0-9_-]`.
    #[error(
        "application acronym '{0}' contains invalid characters (only alphanumeric, '-' and '_' allowed)"
    )]
    InvalidAcronym(String),

    /// The end date precedes the start date.
    #[error("end date {end} precedes start date {start}")]
    InvalidDateRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// The running number can no longer be incremented.
    #[error("running number exhausted for application {0}")]
    RunningNumberExhausted(String),
}

/// Error returned while parsing a workflow stage key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown workflow stage: {0}")]
pub struct ParseStageError(pub String);
