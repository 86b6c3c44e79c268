//! Shared wiring for `PostgreSQL` integration tests.

pub use super::cluster::BoxError;
use super::cluster::{TestDatabase, shared_cluster};
use chrono::{DateTime, Local, Utc};
use diesel::{Connection, PgConnection};
use mockable::{Clock, DefaultClock};
use rstest::fixture;
use std::sync::Arc;
use taskboard::{
    application::{
        adapters::postgres::PostgresApplicationRepository,
        domain::AppAcronym,
        services::{ApplicationRegistryService, CreateApplicationRequest},
    },
    config::DatabaseConfig,
    database::{PgPool, apply_schema, build_pool},
    membership::{
        adapters::postgres::PostgresGroupDirectory,
        domain::{GroupName, Principal},
        services::{AdminOverride, PolicyMembership},
    },
    plan::adapters::postgres::PostgresPlanRepository,
    task::{
        adapters::postgres::PostgresTaskLedger,
        domain::{Task, TaskDraft, TaskId, TaskName, TaskNumber},
        services::TaskWorkflowService,
    },
};

/// Template database holding the migrated schema.
pub const TEMPLATE_DB: &str = "taskboard_test_template";

/// Registry service over the `PostgreSQL` adapters.
pub type Registry =
    ApplicationRegistryService<PostgresApplicationRepository, PostgresGroupDirectory, DefaultClock>;

/// Workflow engine over the `PostgreSQL` adapters.
pub type Workflow = TaskWorkflowService<
    PostgresApplicationRepository,
    PostgresTaskLedger,
    PolicyMembership<PostgresGroupDirectory>,
    DefaultClock,
>;

/// Every `PostgreSQL` adapter and service sharing one test database.
pub struct PgStore {
    /// Application repository.
    pub applications: Arc<PostgresApplicationRepository>,
    /// Plan repository.
    pub plans: Arc<PostgresPlanRepository>,
    /// Task ledger.
    pub ledger: Arc<PostgresTaskLedger>,
    /// Group directory.
    pub directory: Arc<PostgresGroupDirectory>,
    /// Application registry.
    pub registry: Registry,
    /// Workflow engine.
    pub workflow: Workflow,
    _database: TestDatabase,
}

impl PgStore {
    /// Copies the schema template into a new database and wires every
    /// adapter to a pool over it.
    ///
    /// # Errors
    ///
    /// Returns an error when the cluster, template, or pool cannot be set up.
    pub async fn open() -> Result<Self, BoxError> {
        let (database, pool) = tokio::task::spawn_blocking(provision).await??;

        let applications = Arc::new(PostgresApplicationRepository::new(pool.clone()));
        let directory = Arc::new(PostgresGroupDirectory::new(pool.clone()));
        let clock = Arc::new(DefaultClock);
        let membership = PolicyMembership::new(Arc::clone(&directory), AdminOverride::disabled());
        let ledger = Arc::new(PostgresTaskLedger::new(pool.clone()));

        Ok(Self {
            registry: ApplicationRegistryService::new(
                Arc::clone(&applications),
                membership.clone(),
                Arc::clone(&clock),
            ),
            workflow: TaskWorkflowService::new(
                Arc::clone(&applications),
                Arc::clone(&ledger),
                Arc::new(membership),
                clock,
            ),
            plans: Arc::new(PostgresPlanRepository::new(pool)),
            applications,
            ledger,
            directory,
            _database: database,
        })
    }

    /// Adds `principal` to `group`.
    ///
    /// # Errors
    ///
    /// Returns an error when a name is invalid or the insert fails.
    pub async fn join(&self, principal: &str, group: &str) -> eyre::Result<()> {
        self.directory
            .add_member(&Principal::new(principal)?, &GroupName::new(group)?)
            .await?;
        Ok(())
    }

    /// Seeds application `DEMO` configured as
    /// `Open=dev, ToDo=pm, Doing=dev, Done=lead`, with members `alice` (dev),
    /// `bob` and `dana` (pm), `carol` (lead) and `ada` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error when seeding fails.
    pub async fn seed_demo(&self) -> eyre::Result<()> {
        for (name, group) in [
            ("alice", "dev"),
            ("bob", "pm"),
            ("dana", "pm"),
            ("carol", "lead"),
            ("ada", "admin"),
        ] {
            self.join(name, group).await?;
        }
        self.registry
            .create_application(
                &principal("ada")?,
                CreateApplicationRequest::new("DEMO")
                    .with_permission("Open", "dev")
                    .with_permission("ToDo", "pm")
                    .with_permission("Doing", "dev")
                    .with_permission("Done", "lead"),
            )
            .await?;
        Ok(())
    }
}

fn provision() -> Result<(TestDatabase, PgPool), BoxError> {
    let cluster = shared_cluster();
    cluster.ensure_template(TEMPLATE_DB, migrate)?;
    let database = cluster.database_from_template(TEMPLATE_DB)?;
    let pool = build_pool(&DatabaseConfig {
        url: Some(database.url().to_owned()),
        max_connections: 8,
        connect_timeout_secs: 10,
    })?;
    Ok((database, pool))
}

fn migrate(url: &str) -> Result<(), BoxError> {
    let mut connection = PgConnection::establish(url)?;
    apply_schema(&mut connection)?;
    Ok(())
}

/// Fixture yielding a fresh database with `DEMO` seeded.
#[fixture]
pub async fn store() -> PgStore {
    let store = PgStore::open().await.expect("provision test database");
    store.seed_demo().await.expect("seed demo application");
    store
}

/// Parses a principal name.
///
/// # Errors
///
/// Returns an error when the name is invalid.
pub fn principal(name: &str) -> eyre::Result<Principal> {
    Ok(Principal::new(name)?)
}

/// Clock frozen at one instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Builds task `number` of `DEMO`, created by `alice` at the clock's time.
///
/// # Errors
///
/// Returns an error when a field is invalid.
pub fn demo_task(number: u64, clock: &impl Clock) -> eyre::Result<Task> {
    Ok(Task::new(
        TaskDraft {
            id: TaskId::compose(AppAcronym::new("DEMO")?, TaskNumber::new(number)?),
            name: TaskName::new(format!("Task {number}"))?,
            description: Some("stored as a row".to_owned()),
            plan: None,
            creator: principal("alice")?,
        },
        "Task created",
        clock,
    )?)
}
