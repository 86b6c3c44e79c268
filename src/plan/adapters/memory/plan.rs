//! In-memory plan repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::application::domain::AppAcronym;
use crate::plan::{
    domain::{Plan, PlanName, PlanSchedule},
    ports::{PlanRepository, PlanRepositoryError, PlanRepositoryResult},
};

type PlanKey = (AppAcronym, PlanName);

/// Thread-safe in-memory plan repository keyed by `(application, name)`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlanRepository {
    plans: Arc<RwLock<BTreeMap<PlanKey, Plan>>>,
}

impl InMemoryPlanRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> PlanRepositoryError {
    PlanRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn create(&self, plan: &Plan) -> PlanRepositoryResult<()> {
        let mut plans = self.plans.write().map_err(lock_error)?;
        let key = (plan.application().clone(), plan.name().clone());
        if plans.contains_key(&key) {
            return Err(PlanRepositoryError::DuplicatePlan {
                application: key.0,
                name: key.1,
            });
        }
        plans.insert(key, plan.clone());
        Ok(())
    }

    async fn find(
        &self,
        application: &AppAcronym,
        name: &PlanName,
    ) -> PlanRepositoryResult<Option<Plan>> {
        let plans = self.plans.read().map_err(lock_error)?;
        Ok(plans.get(&(application.clone(), name.clone())).cloned())
    }

    async fn list_by_application(
        &self,
        application: &AppAcronym,
    ) -> PlanRepositoryResult<Vec<Plan>> {
        let plans = self.plans.read().map_err(lock_error)?;
        Ok(plans
            .iter()
            .filter(|((owner, _), _)| owner == application)
            .map(|(_, plan)| plan.clone())
            .collect())
    }

    async fn update(
        &self,
        application: &AppAcronym,
        name: &PlanName,
        schedule: &PlanSchedule,
        updated_at: DateTime<Utc>,
    ) -> PlanRepositoryResult<Plan> {
        let mut plans = self.plans.write().map_err(lock_error)?;
        let plan = plans
            .get_mut(&(application.clone(), name.clone()))
            .ok_or_else(|| PlanRepositoryError::NotFound {
                application: application.clone(),
                name: name.clone(),
            })?;
        plan.reschedule(schedule.clone(), updated_at);
        Ok(plan.clone())
    }
}
