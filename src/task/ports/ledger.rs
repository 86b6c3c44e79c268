//! Ledger port: task storage with atomic, audited mutations.

use crate::application::domain::AppAcronym;
use crate::error::ErrorKind;
use crate::task::domain::{StateChange, Task, TaskDomainError, TaskEdit, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task ledger operations.
pub type TaskLedgerResult<T> = Result<T, TaskLedgerError>;

/// Task persistence contract.
///
/// Every mutation writes the task fields and its new audit note as one
/// atomic unit, and mutations of the same task are serialized.
#[async_trait]
pub trait TaskLedger: Send + Sync {
    /// Stores a new task under its pre-minted identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLedgerError::DuplicateTask`] when the identifier exists.
    async fn create_with_id(&self, task: &Task) -> TaskLedgerResult<()>;

    /// Finds a task by identifier.
    async fn find_by_id(&self, id: &TaskId) -> TaskLedgerResult<Option<Task>>;

    /// Returns the tasks of an application, highest task number first.
    async fn list_by_application(&self, application: &AppAcronym) -> TaskLedgerResult<Vec<Task>>;

    /// Atomically sets state and owner and prepends the change's note.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLedgerError::NotFound`] when the task does not exist, or
    /// [`TaskLedgerError::Rejected`] with
    /// [`TaskDomainError::StaleState`] when the stored state no longer matches
    /// [`StateChange::expected`]. Nothing is written on error.
    async fn append_note_and_set_state(
        &self,
        id: &TaskId,
        change: &StateChange,
    ) -> TaskLedgerResult<Task>;

    /// Atomically applies a content edit, sets the owner and prepends the
    /// edit's note when present.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLedgerError::NotFound`] when the task does not exist, or
    /// [`TaskLedgerError::Rejected`] for an empty edit.
    async fn update_fields(&self, id: &TaskId, edit: &TaskEdit) -> TaskLedgerResult<Task>;
}

/// Errors returned by task ledger implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskLedgerError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The aggregate refused the mutation.
    #[error(transparent)]
    Rejected(#[from] TaskDomainError),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskLedgerError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns `true` when a racing transition moved the task first.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::Rejected(TaskDomainError::StaleState { .. }))
    }

    /// Classifies the failure for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateTask(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Rejected(err) => err.kind(),
            Self::InvalidPersistedData(_) | Self::Persistence(_) => ErrorKind::Unavailable,
        }
    }
}
