//! Repository port for plan persistence.

use crate::application::domain::AppAcronym;
use crate::error::ErrorKind;
use crate::plan::domain::{Plan, PlanName, PlanSchedule};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for plan repository operations.
pub type PlanRepositoryResult<T> = Result<T, PlanRepositoryError>;

/// Plan persistence contract.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Stores a new plan.
    ///
    /// # Errors
    ///
    /// Returns [`PlanRepositoryError::DuplicatePlan`] when the application
    /// already has a plan with the same name.
    async fn create(&self, plan: &Plan) -> PlanRepositoryResult<()>;

    /// Finds a plan by application and name.
    async fn find(
        &self,
        application: &AppAcronym,
        name: &PlanName,
    ) -> PlanRepositoryResult<Option<Plan>>;

    /// Returns the plans of an application ordered by name.
    async fn list_by_application(
        &self,
        application: &AppAcronym,
    ) -> PlanRepositoryResult<Vec<Plan>>;

    /// Replaces the schedule of a plan and returns the updated plan.
    ///
    /// # Errors
    ///
    /// Returns [`PlanRepositoryError::NotFound`] when the plan does not exist.
    async fn update(
        &self,
        application: &AppAcronym,
        name: &PlanName,
        schedule: &PlanSchedule,
        updated_at: DateTime<Utc>,
    ) -> PlanRepositoryResult<Plan>;
}

/// Errors returned by plan repository implementations.
#[derive(Debug, Clone, Error)]
pub enum PlanRepositoryError {
    /// A plan with the same name exists in the application.
    #[error("duplicate plan {name} in application {application}")]
    DuplicatePlan {
        /// Owning application.
        application: AppAcronym,
        /// Conflicting name.
        name: PlanName,
    },

    /// The owning application does not exist.
    #[error("application not found: {0}")]
    ApplicationNotFound(AppAcronym),

    /// The plan was not found.
    #[error("plan {name} not found in application {application}")]
    NotFound {
        /// Owning application.
        application: AppAcronym,
        /// Requested name.
        name: PlanName,
    },

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PlanRepositoryError {
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
            Self::DuplicatePlan { .. } => ErrorKind::Conflict,
            Self::ApplicationNotFound(_) | Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidPersistedData(_) | Self::Persistence(_) => ErrorKind::Unavailable,
        }
    }
}
