//! Immutable audit-trail entries.

use super::{TaskDomainError, TaskState};
use crate::membership::domain::Principal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a task's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditNote {
    principal: Principal,
    state: TaskState,
    timestamp: DateTime<Utc>,
    text: String,
}

impl AuditNote {
    /// Creates a note recorded by `principal` while the task is in `state`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyNote`] when `text` is blank.
    pub fn new(
        principal: Principal,
        state: TaskState,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, TaskDomainError> {
        let body = text.into();
        if body.trim().is_empty() {
            return Err(TaskDomainError::EmptyNote);
        }
        Ok(Self {
            principal,
            state,
            timestamp,
            text: body,
        })
    }

    /// Returns the author.
    #[must_use]
    pub const fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Returns the task state recorded with the note.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns when the note was written.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the note text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}
