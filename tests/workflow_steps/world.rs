//! Shared world state for task workflow BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::{
    application::{
        adapters::memory::InMemoryApplicationRepository, services::ApplicationRegistryService,
    },
    membership::{
        adapters::memory::InMemoryGroupDirectory,
        domain::Principal,
        services::{AdminOverride, PolicyMembership},
    },
    task::{
        adapters::memory::InMemoryTaskLedger,
        domain::Task,
        services::{TaskSummary, TaskWorkflowError, TaskWorkflowService},
    },
};

/// Workflow engine type used by the BDD world.
pub type TestWorkflow = TaskWorkflowService<
    InMemoryApplicationRepository,
    InMemoryTaskLedger,
    PolicyMembership<InMemoryGroupDirectory>,
    DefaultClock,
>;

/// Registry type used by the BDD world.
pub type TestRegistry =
    ApplicationRegistryService<InMemoryApplicationRepository, InMemoryGroupDirectory, DefaultClock>;

/// Scenario world for task workflow behaviour tests.
pub struct WorkflowWorld {
    pub registry: TestRegistry,
    pub workflow: Arc<TestWorkflow>,
    pub directory: Arc<InMemoryGroupDirectory>,
    pub administrator: Principal,
    pub current_task: Option<Task>,
    pub last_move: Option<Result<TaskSummary, TaskWorkflowError>>,
    pub concurrent_ids: Vec<String>,
}

impl WorkflowWorld {
    /// Creates a world with empty stores and `root` as override
    /// administrator.
    #[must_use]
    pub fn new() -> Self {
        let administrator = Principal::new("root").expect("valid principal");
        let applications = Arc::new(InMemoryApplicationRepository::new());
        let directory = Arc::new(InMemoryGroupDirectory::new());
        let clock = Arc::new(DefaultClock);
        let membership = PolicyMembership::new(
            Arc::clone(&directory),
            AdminOverride::new(
                administrator.clone(),
                taskboard::membership::services::AdminOverrideScope::Administration,
            ),
        );

        Self {
            registry: ApplicationRegistryService::new(
                Arc::clone(&applications),
                membership.clone(),
                Arc::clone(&clock),
            ),
            workflow: Arc::new(TaskWorkflowService::new(
                applications,
                Arc::new(InMemoryTaskLedger::new()),
                Arc::new(membership),
                clock,
            )),
            directory,
            administrator,
            current_task: None,
            last_move: None,
            concurrent_ids: Vec::new(),
        }
    }

    /// Returns the identifier of the task under test.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn current_task_id(&self) -> Result<String, eyre::Report> {
        self.current_task
            .as_ref()
            .map(|task| task.id().to_string())
            .ok_or_else(|| eyre::eyre!("missing created task in scenario world"))
    }

    /// Reloads the task under test from the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error when no task exists or the lookup fails.
    pub fn refresh(&mut self) -> Result<(), eyre::Report> {
        let id = self.current_task_id()?;
        let task = run_async(self.workflow.get_task("DEMO", &id))?;
        self.current_task = Some(task);
        Ok(())
    }
}

impl Default for WorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> WorkflowWorld {
    WorkflowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
