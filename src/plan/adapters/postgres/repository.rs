//! `PostgreSQL` repository implementation for plans.

use super::{models::PlanRow, schema::plans};
use crate::application::domain::AppAcronym;
use crate::database::PgPool;
use crate::plan::{
    domain::{PersistedPlanData, Plan, PlanName, PlanSchedule},
    ports::{PlanRepository, PlanRepositoryError, PlanRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed plan repository.
#[derive(Debug, Clone)]
pub struct PostgresPlanRepository {
    pool: PgPool,
}

impl PostgresPlanRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> PlanRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> PlanRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(PlanRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(PlanRepositoryError::persistence)?
    }
}

#[async_trait]
impl PlanRepository for PostgresPlanRepository {
    async fn create(&self, plan: &Plan) -> PlanRepositoryResult<()> {
        let row = to_row(plan);
        let application = plan.application().clone();
        let name = plan.name().clone();

        self.run_blocking(move |connection| {
            diesel::insert_into(plans::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        PlanRepositoryError::DuplicatePlan {
                            application: application.clone(),
                            name: name.clone(),
                        }
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        PlanRepositoryError::ApplicationNotFound(application.clone())
                    }
                    _ => PlanRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find(
        &self,
        application: &AppAcronym,
        name: &PlanName,
    ) -> PlanRepositoryResult<Option<Plan>> {
        let acronym = application.as_str().to_owned();
        let plan_name = name.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = plans::table
                .filter(plans::application_acronym.eq(&acronym))
                .filter(plans::name.eq(&plan_name))
                .select(PlanRow::as_select())
                .get_result::<PlanRow>(connection)
                .optional()
                .map_err(PlanRepositoryError::persistence)?;
            row.map(row_to_plan).transpose()
        })
        .await
    }

    async fn list_by_application(
        &self,
        application: &AppAcronym,
    ) -> PlanRepositoryResult<Vec<Plan>> {
        let acronym = application.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = plans::table
                .filter(plans::application_acronym.eq(&acronym))
                .order(plans::name.asc())
                .select(PlanRow::as_select())
                .load::<PlanRow>(connection)
                .map_err(PlanRepositoryError::persistence)?;
            rows.into_iter().map(row_to_plan).collect()
        })
        .await
    }

    async fn update(
        &self,
        application: &AppAcronym,
        name: &PlanName,
        schedule: &PlanSchedule,
        updated_at: DateTime<Utc>,
    ) -> PlanRepositoryResult<Plan> {
        let acronym = application.clone();
        let plan_name = name.clone();
        let new_schedule = schedule.clone();
        self.run_blocking(move |connection| {
            let row = diesel::update(
                plans::table
                    .filter(plans::application_acronym.eq(acronym.as_str()))
                    .filter(plans::name.eq(plan_name.as_str())),
            )
            .set((
                plans::start_date.eq(new_schedule.start_date()),
                plans::end_date.eq(new_schedule.end_date()),
                plans::color.eq(new_schedule.color().map(str::to_owned)),
                plans::updated_at.eq(updated_at),
            ))
            .returning(PlanRow::as_returning())
            .get_result::<PlanRow>(connection)
            .optional()
            .map_err(PlanRepositoryError::persistence)?
            .ok_or_else(|| PlanRepositoryError::NotFound {
                application: acronym.clone(),
                name: plan_name.clone(),
            })?;
            row_to_plan(row)
        })
        .await
    }
}

fn to_row(plan: &Plan) -> PlanRow {
    let schedule = plan.schedule();
    PlanRow {
        application_acronym: plan.application().as_str().to_owned(),
        name: plan.name().as_str().to_owned(),
        start_date: schedule.start_date(),
        end_date: schedule.end_date(),
        color: schedule.color().map(str::to_owned),
        created_at: plan.created_at(),
        updated_at: plan.updated_at(),
    }
}

fn row_to_plan(row: PlanRow) -> PlanRepositoryResult<Plan> {
    let application = AppAcronym::new(row.application_acronym)
        .map_err(PlanRepositoryError::invalid_persisted_data)?;
    let name = PlanName::new(row.name).map_err(PlanRepositoryError::invalid_persisted_data)?;
    let schedule = PlanSchedule::new(row.start_date, row.end_date, row.color)
        .map_err(PlanRepositoryError::invalid_persisted_data)?;

    Ok(Plan::from_persisted(PersistedPlanData {
        application,
        name,
        schedule,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
