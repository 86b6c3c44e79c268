//! Shared wiring for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::{
    application::{
        adapters::memory::InMemoryApplicationRepository,
        services::{ApplicationRegistryService, CreateApplicationRequest},
    },
    membership::{
        adapters::memory::InMemoryGroupDirectory,
        domain::{GroupName, Principal},
        services::{AdminOverride, PolicyMembership},
    },
    plan::{adapters::memory::InMemoryPlanRepository, services::PlanRegistryService},
    task::{adapters::memory::InMemoryTaskLedger, services::TaskWorkflowService},
};

/// Registry service over in-memory adapters.
pub type Registry =
    ApplicationRegistryService<InMemoryApplicationRepository, InMemoryGroupDirectory, DefaultClock>;

/// Plan service over in-memory adapters.
pub type Plans =
    PlanRegistryService<InMemoryPlanRepository, InMemoryApplicationRepository, DefaultClock>;

/// Workflow engine over in-memory adapters.
pub type Workflow = TaskWorkflowService<
    InMemoryApplicationRepository,
    InMemoryTaskLedger,
    PolicyMembership<InMemoryGroupDirectory>,
    DefaultClock,
>;

/// All services sharing one set of in-memory stores.
pub struct Board {
    /// Application registry.
    pub registry: Registry,
    /// Plan registry.
    pub plans: Plans,
    /// Workflow engine.
    pub workflow: Workflow,
    /// Group directory backing the membership oracle.
    pub directory: Arc<InMemoryGroupDirectory>,
}

impl Board {
    /// Wires every service with the given override policy.
    #[must_use]
    pub fn new(policy: AdminOverride) -> Self {
        let applications = Arc::new(InMemoryApplicationRepository::new());
        let directory = Arc::new(InMemoryGroupDirectory::new());
        let clock = Arc::new(DefaultClock);
        let membership = PolicyMembership::new(Arc::clone(&directory), policy);

        Self {
            registry: ApplicationRegistryService::new(
                Arc::clone(&applications),
                membership.clone(),
                Arc::clone(&clock),
            ),
            plans: PlanRegistryService::new(
                Arc::new(InMemoryPlanRepository::new()),
                Arc::clone(&applications),
                Arc::clone(&clock),
            ),
            workflow: TaskWorkflowService::new(
                applications,
                Arc::new(InMemoryTaskLedger::new()),
                Arc::new(membership),
                clock,
            ),
            directory,
        }
    }

    /// Adds `principal` to `group`.
    ///
    /// # Errors
    ///
    /// Returns an error when a name is invalid or the directory fails.
    pub fn join(&self, principal: &str, group: &str) -> eyre::Result<()> {
        self.directory
            .add_member(Principal::new(principal)?, GroupName::new(group)?)?;
        Ok(())
    }
}

/// Parses a principal name.
///
/// # Errors
///
/// Returns an error when the name is invalid.
pub fn principal(name: &str) -> eyre::Result<Principal> {
    Ok(Principal::new(name)?)
}

/// Board with application `DEMO` configured as
/// `Open=dev, ToDo=pm, Doing=dev, Done=qa`, and members `alice` (dev),
/// `bob` (pm), `quinn` (qa) and `ada` (admin).
///
/// # Errors
///
/// Returns an error when seeding fails.
pub async fn demo_board() -> eyre::Result<Board> {
    let board = Board::new(AdminOverride::disabled());
    for (name, group) in [
        ("alice", "dev"),
        ("bob", "pm"),
        ("quinn", "qa"),
        ("ada", "admin"),
    ] {
        board.join(name, group)?;
    }
    board
        .registry
        .create_application(
            &principal("ada")?,
            CreateApplicationRequest::new("DEMO")
                .with_permission("Open", "dev")
                .with_permission("ToDo", "pm")
                .with_permission("Doing", "dev")
                .with_permission("Done", "qa"),
        )
        .await?;
    Ok(board)
}

/// Fixture yielding a seeded [`demo_board`].
#[fixture]
pub async fn board() -> Board {
    demo_board().await.expect("seed demo board")
}
