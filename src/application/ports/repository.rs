//! Repository port for application persistence and counter reservation.

use crate::application::domain::{AppAcronym, Application, ApplicationDetails, PermissionUpdate};
use crate::error::ErrorKind;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for application repository operations.
pub type ApplicationRepositoryResult<T> = Result<T, ApplicationRepositoryError>;

/// Application persistence contract.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Stores a new application.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationRepositoryError::DuplicateApplication`] when the
    /// acronym is already registered.
    async fn create(&self, application: &Application) -> ApplicationRepositoryResult<()>;

    /// Finds an application by acronym.
    ///
    /// Returns `None` when the application does not exist.
    async fn find_by_acronym(
        &self,
        acronym: &AppAcronym,
    ) -> ApplicationRepositoryResult<Option<Application>>;

    /// Returns every application ordered by acronym.
    async fn list_all(&self) -> ApplicationRepositoryResult<Vec<Application>>;

    /// Replaces the descriptive metadata and returns the updated application.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationRepositoryError::NotFound`] when the application
    /// does not exist.
    async fn update_details(
        &self,
        acronym: &AppAcronym,
        details: &ApplicationDetails,
        updated_at: DateTime<Utc>,
    ) -> ApplicationRepositoryResult<Application>;

    /// Atomically applies a partial permission change and returns the updated
    /// application.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationRepositoryError::NotFound`] when the application
    /// does not exist.
    async fn update_permissions(
        &self,
        acronym: &AppAcronym,
        update: &PermissionUpdate,
        updated_at: DateTime<Utc>,
    ) -> ApplicationRepositoryResult<Application>;

    /// Atomically increments the running number and returns the new value.
    ///
    /// Concurrent callers for the same acronym never observe the same value;
    /// callers for different acronyms do not contend.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationRepositoryError::NotFound`] when the application
    /// does not exist.
    async fn reserve_next_task_number(&self, acronym: &AppAcronym)
    -> ApplicationRepositoryResult<u64>;
}

/// Errors returned by application repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ApplicationRepositoryError {
    /// An application with the same acronym already exists.
    #[error("duplicate application acronym: {0}")]
    DuplicateApplication(AppAcronym),

    /// The application was not found.
    #[error("application not found: {0}")]
    NotFound(AppAcronym),

    /// The running number cannot be advanced further.
    #[error("running number exhausted for application: {0}")]
    CounterExhausted(AppAcronym),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ApplicationRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Classifies the failure for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateApplication(_) | Self::CounterExhausted(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidPersistedData(_) | Self::Persistence(_) => ErrorKind::Unavailable,
        }
    }
}
