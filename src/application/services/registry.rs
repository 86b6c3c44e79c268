//! Service layer for application administration and lookup.
//!
//! Provides [`ApplicationRegistryService`], which validates administrator
//! requests at the registry boundary: stage keys are parsed into the closed
//! [`Stage`] enumeration and group names into [`GroupName`] before anything
//! reaches the repository.

use crate::application::{
    domain::{
        AppAcronym, Application, ApplicationDetails, ApplicationDomainError, ParseStageError,
        PermissionUpdate, Stage, StagePermissions,
    },
    ports::{ApplicationRepository, ApplicationRepositoryError},
};
use crate::error::ErrorKind;
use crate::membership::{
    domain::{GroupName, MembershipDomainError, Principal},
    ports::{GroupMembership, MembershipError},
    services::PolicyMembership,
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for creating an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateApplicationRequest {
    acronym: String,
    description: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    permissions: Vec<(String, Option<String>)>,
}

impl CreateApplicationRequest {
    /// Creates a request for `acronym` with no metadata and no permissions.
    #[must_use]
    pub fn new(acronym: impl Into<String>) -> Self {
        Self {
            acronym: acronym.into(),
            description: None,
            start_date: None,
            end_date: None,
            permissions: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the planned start and end dates.
    #[must_use]
    pub const fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Permits `group` to perform the stage named `stage`.
    #[must_use]
    pub fn with_permission(mut self, stage: impl Into<String>, group: impl Into<String>) -> Self {
        self.permissions.push((stage.into(), Some(group.into())));
        self
    }
}

/// Service-level errors for application registry operations.
#[derive(Debug, Error)]
pub enum ApplicationRegistryError {
    /// Application field validation failed.
    #[error(transparent)]
    Domain(#[from] ApplicationDomainError),
    /// A group or principal name failed validation.
    #[error(transparent)]
    Identity(#[from] MembershipDomainError),
    /// A permission change named an unknown stage.
    #[error(transparent)]
    UnknownStage(#[from] ParseStageError),
    /// A permission change touched no stage.
    #[error("permission update must name at least one stage")]
    EmptyPermissionUpdate,
    /// The caller is not an administrator.
    #[error("principal {0} is not an administrator")]
    NotAdministrator(Principal),
    /// The membership oracle failed.
    #[error(transparent)]
    Membership(#[from] MembershipError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ApplicationRepositoryError),
}

impl ApplicationRegistryError {
    /// Classifies the failure for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(ApplicationDomainError::RunningNumberExhausted(_)) => ErrorKind::Conflict,
            Self::Domain(_)
            | Self::Identity(_)
            | Self::UnknownStage(_)
            | Self::EmptyPermissionUpdate => ErrorKind::InvalidArgument,
            Self::NotAdministrator(_) => ErrorKind::Forbidden,
            Self::Membership(_) => ErrorKind::Unavailable,
            Self::Repository(err) => err.kind(),
        }
    }
}

/// Result type for application registry service operations.
pub type ApplicationRegistryResult<T> = Result<T, ApplicationRegistryError>;

/// Application administration and lookup service.
#[derive(Clone)]
pub struct ApplicationRegistryService<R, M, C>
where
    R: ApplicationRepository,
    M: GroupMembership,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    membership: PolicyMembership<M>,
    clock: Arc<C>,
}

impl<R, M, C> ApplicationRegistryService<R, M, C>
where
    R: ApplicationRepository,
    M: GroupMembership,
    C: Clock + Send + Sync,
{
    /// Creates a new application registry service.
    #[must_use]
    pub const fn new(repository: Arc<R>, membership: PolicyMembership<M>, clock: Arc<C>) -> Self {
        Self {
            repository,
            membership,
            clock,
        }
    }

    /// Creates an application with its running number at zero.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationRegistryError::NotAdministrator`] when `actor`
    /// may not administer applications, a validation variant for malformed
    /// input, or [`ApplicationRegistryError::Repository`] when the acronym is
    /// taken or persistence fails.
    pub async fn create_application(
        &self,
        actor: &Principal,
        request: CreateApplicationRequest,
    ) -> ApplicationRegistryResult<Application> {
        let CreateApplicationRequest {
            acronym,
            description,
            start_date,
            end_date,
            permissions,
        } = request;

        let parsed_acronym = AppAcronym::new(acronym)?;
        let details = ApplicationDetails::new(description, start_date, end_date)?;
        let mut stage_permissions = StagePermissions::none();
        stage_permissions.apply(&parse_permission_update(permissions)?);

        self.require_administrator(actor).await?;

        let application = Application::new(
            parsed_acronym,
            details,
            stage_permissions,
            &*self.clock,
        );
        self.repository.create(&application).await?;
        info!(
            acronym = %application.acronym(),
            actor = %actor,
            "application created"
        );
        Ok(application)
    }

    /// Returns the application registered under `acronym`.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationRepositoryError::NotFound`] (wrapped) when no such
    /// application exists.
    pub async fn get_application(&self, acronym: &str) -> ApplicationRegistryResult<Application> {
        let parsed = AppAcronym::new(acronym)?;
        debug!(acronym = %parsed, "loading application");
        self.repository
            .find_by_acronym(&parsed)
            .await?
            .ok_or_else(|| ApplicationRepositoryError::NotFound(parsed).into())
    }

    /// Returns every application ordered by acronym.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationRegistryError::Repository`] when persistence
    /// lookup fails.
    pub async fn list_applications(&self) -> ApplicationRegistryResult<Vec<Application>> {
        Ok(self.repository.list_all().await?)
    }

    /// Replaces the description and planned dates of an application.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationRegistryError::NotAdministrator`] for
    /// non-administrators, [`ApplicationRegistryError::Domain`] for an
    /// inverted date range, or a repository error when the application is
    /// missing.
    pub async fn update_details(
        &self,
        actor: &Principal,
        acronym: &str,
        description: Option<String>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ApplicationRegistryResult<Application> {
        let parsed = AppAcronym::new(acronym)?;
        let details = ApplicationDetails::new(description, start_date, end_date)?;
        self.require_administrator(actor).await?;

        let application = self
            .repository
            .update_details(&parsed, &details, self.clock.utc())
            .await?;
        info!(acronym = %parsed, actor = %actor, "application details updated");
        Ok(application)
    }

    /// Applies a partial stage-to-group permission change.
    ///
    /// Only the supplied stages change. A `None` or blank group clears the
    /// stage, blocking it until reconfigured. Tasks already in flight keep
    /// their audit history.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationRegistryError::UnknownStage`] for unknown stage
    /// keys, [`ApplicationRegistryError::EmptyPermissionUpdate`] when no stage
    /// is supplied, [`ApplicationRegistryError::NotAdministrator`] for
    /// non-administrators, or a repository error when the application is
    /// missing.
    pub async fn set_permissions<I, K>(
        &self,
        actor: &Principal,
        acronym: &str,
        changes: I,
    ) -> ApplicationRegistryResult<Application>
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: Into<String>,
    {
        let parsed = AppAcronym::new(acronym)?;
        let update = parse_permission_update(
            changes
                .into_iter()
                .map(|(stage, group)| (stage.into(), group)),
        )?;
        if update.is_empty() {
            return Err(ApplicationRegistryError::EmptyPermissionUpdate);
        }
        self.require_administrator(actor).await?;

        let application = self
            .repository
            .update_permissions(&parsed, &update, self.clock.utc())
            .await?;
        info!(acronym = %parsed, actor = %actor, "application permissions updated");
        Ok(application)
    }

    async fn require_administrator(&self, actor: &Principal) -> ApplicationRegistryResult<()> {
        if self.membership.is_administrator(actor).await? {
            return Ok(());
        }
        warn!(actor = %actor, "administration denied");
        Err(ApplicationRegistryError::NotAdministrator(actor.clone()))
    }
}

fn parse_permission_update(
    changes: impl IntoIterator<Item = (String, Option<String>)>,
) -> ApplicationRegistryResult<PermissionUpdate> {
    let mut update = PermissionUpdate::new();
    for (stage_key, group) in changes {
        let stage = Stage::try_from(stage_key.as_str())?;
        update = match group.filter(|name| !name.trim().is_empty()) {
            Some(name) => update.permit(stage, GroupName::new(name)?),
            None => update.clear(stage),
        };
    }
    Ok(update)
}
