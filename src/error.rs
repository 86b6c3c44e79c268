//! Caller-facing error classification shared by every service.
//!
//! Each service error type maps onto one [`ErrorKind`] so the request layer
//! can render a consistent response without matching on nested variants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified failure kinds surfaced to callers of the workflow core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A referenced application, plan, or task does not exist.
    NotFound,
    /// A uniqueness constraint was violated.
    Conflict,
    /// The principal lacks the required group membership, or no group is
    /// configured for the stage.
    Forbidden,
    /// The requested state is not reachable from the current state.
    InvalidTransition,
    /// The input was malformed or the update was a no-op.
    InvalidArgument,
    /// A transient storage or infrastructure failure.
    Unavailable,
}

impl ErrorKind {
    /// Returns the canonical snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Forbidden => "forbidden",
            Self::InvalidTransition => "invalid_transition",
            Self::InvalidArgument => "invalid_argument",
            Self::Unavailable => "unavailable",
        }
    }

    /// Returns `true` when the failure may succeed on a later attempt.
    ///
    /// Only [`ErrorKind::Unavailable`] is retryable, and callers must still
    /// avoid blindly retrying task creation.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
