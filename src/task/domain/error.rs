//! Error types for task domain validation and state changes.

use super::{TaskId, TaskState};
use crate::error::ErrorKind;
use thiserror::Error;

/// Errors returned while constructing or mutating task domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is not of the form `{acronym}_{number}`.
    #[error("invalid task identifier '{0}', expected ACRONYM_NUMBER")]
    InvalidTaskId(String),

    /// Task numbers start at one.
    #[error("task number must be positive")]
    InvalidTaskNumber,

    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// The task name exceeds the storage limit.
    #[error("task name exceeds 255 character limit")]
    TaskNameTooLong,

    /// An audit note carried no text.
    #[error("audit note text must not be empty")]
    EmptyNote,

    /// A persisted task had no audit notes.
    #[error("task {0} has an empty audit trail")]
    EmptyAuditTrail(TaskId),

    /// The transition table does not allow the requested change.
    #[error("invalid state transition for task {task_id}: {from} -> {to}")]
    InvalidStateTransition {
        /// Task being transitioned.
        task_id: TaskId,
        /// Current state.
        from: TaskState,
        /// Requested state.
        to: TaskState,
    },

    /// The task moved on since the caller validated the change.
    #[error("task {task_id} is in state {actual}, expected {expected}")]
    StaleState {
        /// Task being transitioned.
        task_id: TaskId,
        /// State the change was validated against.
        expected: TaskState,
        /// State found at commit time.
        actual: TaskState,
    },

    /// An edit supplied neither a field nor a note.
    #[error("edit of task {0} changes nothing")]
    EmptyEdit(TaskId),
}

impl TaskDomainError {
    /// Classifies the failure for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidStateTransition { .. } => ErrorKind::InvalidTransition,
            Self::StaleState { .. } => ErrorKind::Conflict,
            Self::EmptyAuditTrail(_) => ErrorKind::Unavailable,
            Self::InvalidTaskId(_)
            | Self::InvalidTaskNumber
            | Self::EmptyTaskName
            | Self::TaskNameTooLong
            | Self::EmptyNote
            | Self::EmptyEdit(_) => ErrorKind::InvalidArgument,
        }
    }
}

/// Error returned while parsing a task state name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task state: {0}")]
pub struct ParseTaskStateError(pub String);
