//! Service layer for plan creation, lookup and rescheduling.

use crate::application::{
    domain::{AppAcronym, ApplicationDomainError},
    ports::{ApplicationRepository, ApplicationRepositoryError},
};
use crate::error::ErrorKind;
use crate::plan::{
    domain::{Plan, PlanDomainError, PlanName, PlanSchedule},
    ports::{PlanRepository, PlanRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for plan operations.
#[derive(Debug, Error)]
pub enum PlanRegistryError {
    /// The acronym failed validation.
    #[error(transparent)]
    Acronym(#[from] ApplicationDomainError),
    /// Plan field validation failed.
    #[error(transparent)]
    Domain(#[from] PlanDomainError),
    /// Application lookup failed.
    #[error(transparent)]
    Application(#[from] ApplicationRepositoryError),
    /// Plan repository operation failed.
    #[error(transparent)]
    Repository(#[from] PlanRepositoryError),
}

impl PlanRegistryError {
    /// Classifies the failure for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Acronym(_) | Self::Domain(_) => ErrorKind::InvalidArgument,
            Self::Application(err) => err.kind(),
            Self::Repository(err) => err.kind(),
        }
    }
}

/// Result type for plan service operations.
pub type PlanRegistryResult<T> = Result<T, PlanRegistryError>;

/// Plan management service.
#[derive(Clone)]
pub struct PlanRegistryService<P, A, C>
where
    P: PlanRepository,
    A: ApplicationRepository,
    C: Clock + Send + Sync,
{
    plans: Arc<P>,
    applications: Arc<A>,
    clock: Arc<C>,
}

impl<P, A, C> PlanRegistryService<P, A, C>
where
    P: PlanRepository,
    A: ApplicationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new plan service.
    #[must_use]
    pub const fn new(plans: Arc<P>, applications: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            plans,
            applications,
            clock,
        }
    }

    /// Creates a plan in an existing application.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound`-kind error when the application does not exist,
    /// a `Conflict`-kind error when the name is already used in the
    /// application, or [`PlanRegistryError::Domain`] for invalid fields.
    pub async fn create_plan(
        &self,
        acronym: &str,
        name: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        color: Option<String>,
    ) -> PlanRegistryResult<Plan> {
        let application = self.existing_application(acronym).await?;
        let plan_name = PlanName::new(name)?;
        let schedule = PlanSchedule::new(start_date, end_date, color)?;

        let plan = Plan::new(application, plan_name, schedule, &*self.clock);
        self.plans.create(&plan).await?;
        info!(
            acronym = %plan.application(),
            plan = %plan.name(),
            "plan created"
        );
        Ok(plan)
    }

    /// Returns the plans of an application ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound`-kind error when the application does not exist.
    pub async fn list_plans(&self, acronym: &str) -> PlanRegistryResult<Vec<Plan>> {
        let application = self.existing_application(acronym).await?;
        Ok(self.plans.list_by_application(&application).await?)
    }

    /// Returns a single plan.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound`-kind error when the plan does not exist.
    pub async fn get_plan(&self, acronym: &str, name: &str) -> PlanRegistryResult<Plan> {
        let application = AppAcronym::new(acronym)?;
        let plan_name = PlanName::new(name)?;
        debug!(acronym = %application, plan = %plan_name, "loading plan");
        self.plans
            .find(&application, &plan_name)
            .await?
            .ok_or_else(|| {
                PlanRepositoryError::NotFound {
                    application,
                    name: plan_name,
                }
                .into()
            })
    }

    /// Replaces the dates and colour of a plan. The name stays fixed.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound`-kind error when the plan does not exist or
    /// [`PlanRegistryError::Domain`] for invalid fields.
    pub async fn update_plan(
        &self,
        acronym: &str,
        name: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        color: Option<String>,
    ) -> PlanRegistryResult<Plan> {
        let application = AppAcronym::new(acronym)?;
        let plan_name = PlanName::new(name)?;
        let schedule = PlanSchedule::new(start_date, end_date, color)?;

        let plan = self
            .plans
            .update(&application, &plan_name, &schedule, self.clock.utc())
            .await?;
        info!(acronym = %application, plan = %plan_name, "plan updated");
        Ok(plan)
    }

    async fn existing_application(&self, acronym: &str) -> PlanRegistryResult<AppAcronym> {
        let application = AppAcronym::new(acronym)?;
        if self.applications.find_by_acronym(&application).await?.is_none() {
            return Err(ApplicationRepositoryError::NotFound(application).into());
        }
        Ok(application)
    }
}
