//! `PostgreSQL` repository implementation for the application registry.

use super::{
    models::{ApplicationRow, NewApplicationRow},
    schema::applications,
};
use crate::application::{
    domain::{
        AppAcronym, Application, ApplicationDetails, PermissionUpdate, PersistedApplicationData,
        Stage, StagePermissions,
    },
    ports::{ApplicationRepository, ApplicationRepositoryError, ApplicationRepositoryResult},
};
use crate::database::PgPool;
use crate::membership::domain::GroupName;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed application repository.
#[derive(Debug, Clone)]
pub struct PostgresApplicationRepository {
    pool: PgPool,
}

impl PostgresApplicationRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ApplicationRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ApplicationRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ApplicationRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ApplicationRepositoryError::persistence)?
    }
}

impl From<DieselError> for ApplicationRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl ApplicationRepository for PostgresApplicationRepository {
    async fn create(&self, application: &Application) -> ApplicationRepositoryResult<()> {
        let acronym = application.acronym().clone();
        let new_row = to_new_row(application)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(applications::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ApplicationRepositoryError::DuplicateApplication(acronym.clone())
                    }
                    _ => ApplicationRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_acronym(
        &self,
        acronym: &AppAcronym,
    ) -> ApplicationRepositoryResult<Option<Application>> {
        let key = acronym.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = applications::table
                .filter(applications::acronym.eq(&key))
                .select(ApplicationRow::as_select())
                .get_result::<ApplicationRow>(connection)
                .optional()?;
            row.map(row_to_application).transpose()
        })
        .await
    }

    async fn list_all(&self) -> ApplicationRepositoryResult<Vec<Application>> {
        self.run_blocking(move |connection| {
            let rows = applications::table
                .order(applications::acronym.asc())
                .select(ApplicationRow::as_select())
                .load::<ApplicationRow>(connection)?;
            rows.into_iter().map(row_to_application).collect()
        })
        .await
    }

    async fn update_details(
        &self,
        acronym: &AppAcronym,
        details: &ApplicationDetails,
        updated_at: DateTime<Utc>,
    ) -> ApplicationRepositoryResult<Application> {
        let key = acronym.clone();
        let details_val = details.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<_, ApplicationRepositoryError, _>(|tx| {
                let mut application = lock_application(tx, &key)?;
                application.update_details(details_val, updated_at);
                diesel::update(applications::table.filter(applications::acronym.eq(key.as_str())))
                    .set((
                        applications::description
                            .eq(application.details().description().map(str::to_owned)),
                        applications::start_date.eq(application.details().start_date()),
                        applications::end_date.eq(application.details().end_date()),
                        applications::updated_at.eq(application.updated_at()),
                    ))
                    .execute(tx)?;
                Ok(application)
            })
        })
        .await
    }

    async fn update_permissions(
        &self,
        acronym: &AppAcronym,
        update: &PermissionUpdate,
        updated_at: DateTime<Utc>,
    ) -> ApplicationRepositoryResult<Application> {
        let key = acronym.clone();
        let update_val = update.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<_, ApplicationRepositoryError, _>(|tx| {
                let mut application = lock_application(tx, &key)?;
                application.apply_permissions(&update_val, updated_at);
                let permissions = application.permissions();
                diesel::update(applications::table.filter(applications::acronym.eq(key.as_str())))
                    .set((
                        applications::permit_open.eq(group_column(permissions, Stage::Open)),
                        applications::permit_todo.eq(group_column(permissions, Stage::ToDo)),
                        applications::permit_doing.eq(group_column(permissions, Stage::Doing)),
                        applications::permit_done.eq(group_column(permissions, Stage::Done)),
                        applications::updated_at.eq(application.updated_at()),
                    ))
                    .execute(tx)?;
                Ok(application)
            })
        })
        .await
    }

    async fn reserve_next_task_number(
        &self,
        acronym: &AppAcronym,
    ) -> ApplicationRepositoryResult<u64> {
        let key = acronym.clone();
        self.run_blocking(move |connection| {
            // Single-statement increment: the row lock taken by UPDATE
            // serializes concurrent reservations for the same acronym.
            let reserved = diesel::update(
                applications::table
                    .filter(applications::acronym.eq(key.as_str()))
                    .filter(applications::running_number.lt(i64::MAX)),
            )
            .set(applications::running_number.eq(applications::running_number + 1))
            .returning(applications::running_number)
            .get_result::<i64>(connection)
            .optional()?;

            match reserved {
                Some(value) => {
                    u64::try_from(value).map_err(ApplicationRepositoryError::invalid_persisted_data)
                }
                None if application_exists(connection, &key)? => {
                    Err(ApplicationRepositoryError::CounterExhausted(key.clone()))
                }
                None => Err(ApplicationRepositoryError::NotFound(key.clone())),
            }
        })
        .await
    }
}

fn lock_application(
    connection: &mut PgConnection,
    acronym: &AppAcronym,
) -> ApplicationRepositoryResult<Application> {
    let row = applications::table
        .filter(applications::acronym.eq(acronym.as_str()))
        .select(ApplicationRow::as_select())
        .for_update()
        .get_result::<ApplicationRow>(connection)
        .optional()?
        .ok_or_else(|| ApplicationRepositoryError::NotFound(acronym.clone()))?;
    row_to_application(row)
}

fn application_exists(
    connection: &mut PgConnection,
    acronym: &AppAcronym,
) -> ApplicationRepositoryResult<bool> {
    let exists = diesel::select(diesel::dsl::exists(
        applications::table.filter(applications::acronym.eq(acronym.as_str())),
    ))
    .get_result::<bool>(connection)?;
    Ok(exists)
}

fn group_column(permissions: &StagePermissions, stage: Stage) -> Option<String> {
    permissions
        .group_for(stage)
        .map(|group| group.as_str().to_owned())
}

fn to_new_row(application: &Application) -> ApplicationRepositoryResult<NewApplicationRow> {
    let running_number = i64::try_from(application.running_number())
        .map_err(ApplicationRepositoryError::invalid_persisted_data)?;
    let details = application.details();
    let permissions = application.permissions();

    Ok(NewApplicationRow {
        acronym: application.acronym().as_str().to_owned(),
        description: details.description().map(str::to_owned),
        start_date: details.start_date(),
        end_date: details.end_date(),
        running_number,
        permit_open: group_column(permissions, Stage::Open),
        permit_todo: group_column(permissions, Stage::ToDo),
        permit_doing: group_column(permissions, Stage::Doing),
        permit_done: group_column(permissions, Stage::Done),
        created_at: application.created_at(),
        updated_at: application.updated_at(),
    })
}

fn parse_group(value: Option<String>) -> ApplicationRepositoryResult<Option<GroupName>> {
    value
        .map(GroupName::new)
        .transpose()
        .map_err(ApplicationRepositoryError::invalid_persisted_data)
}

fn row_to_application(row: ApplicationRow) -> ApplicationRepositoryResult<Application> {
    let ApplicationRow {
        acronym,
        description,
        start_date,
        end_date,
        running_number,
        permit_open,
        permit_todo,
        permit_doing,
        permit_done,
        created_at,
        updated_at,
    } = row;

    let parsed_acronym =
        AppAcronym::new(acronym).map_err(ApplicationRepositoryError::invalid_persisted_data)?;
    let details = ApplicationDetails::new(description, start_date, end_date)
        .map_err(ApplicationRepositoryError::invalid_persisted_data)?;
    let parsed_running_number = u64::try_from(running_number)
        .map_err(ApplicationRepositoryError::invalid_persisted_data)?;

    let mut permissions = StagePermissions::none();
    permissions.set(Stage::Open, parse_group(permit_open)?);
    permissions.set(Stage::ToDo, parse_group(permit_todo)?);
    permissions.set(Stage::Doing, parse_group(permit_doing)?);
    permissions.set(Stage::Done, parse_group(permit_done)?);

    Ok(Application::from_persisted(PersistedApplicationData {
        acronym: parsed_acronym,
        details,
        running_number: parsed_running_number,
        permissions,
        created_at,
        updated_at,
    }))
}
