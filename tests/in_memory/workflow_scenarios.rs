//! End-to-end workflow scenarios against the in-memory stores.

use std::collections::HashSet;
use std::sync::Arc;

use super::helpers::{Board, board, principal};
use eyre::{bail, ensure};
use rstest::rstest;
use taskboard::{
    error::ErrorKind,
    membership::services::{AdminOverride, AdminOverrideScope},
    task::{
        domain::TaskState,
        services::{CreateTaskRequest, EditTaskRequest},
    },
};

async fn create_fix_bug(board: &Board) -> eyre::Result<String> {
    let task = board
        .workflow
        .create_task(&principal("alice")?, CreateTaskRequest::new("DEMO", "Fix bug"))
        .await?;
    Ok(task.id().to_string())
}

async fn expect_kind(
    board: &Board,
    actor: &str,
    task_id: &str,
    target: &str,
    expected: ErrorKind,
) -> eyre::Result<()> {
    match board
        .workflow
        .transition_task(&principal(actor)?, "DEMO", task_id, target, None)
        .await
    {
        Err(err) => ensure!(
            err.kind() == expected,
            "{actor} -> {target}: expected {expected}, got {err}"
        ),
        Ok(summary) => bail!("{actor} -> {target} unexpectedly reached {}", summary.state()),
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creation_mints_first_identifier(#[future] board: Board) -> eyre::Result<()> {
    let fixture = board.await;
    let id = create_fix_bug(&fixture).await?;

    let task = fixture.workflow.get_task("DEMO", &id).await?;
    ensure!(id == "DEMO_1");
    ensure!(task.state() == TaskState::Open);
    ensure!(task.owner().as_str() == "alice");
    ensure!(task.notes().len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn permitted_group_moves_task(#[future] board: Board) -> eyre::Result<()> {
    let fixture = board.await;
    let id = create_fix_bug(&fixture).await?;

    let summary = fixture
        .workflow
        .transition_task(&principal("bob")?, "DEMO", &id, "ToDo", None)
        .await?;

    ensure!(summary.state() == TaskState::ToDo);
    ensure!(summary.owner().as_str() == "bob");
    ensure!(fixture.workflow.get_task("DEMO", &id).await?.notes().len() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn wrong_group_cannot_start_work(#[future] board: Board) -> eyre::Result<()> {
    let fixture = board.await;
    let id = create_fix_bug(&fixture).await?;
    fixture
        .workflow
        .transition_task(&principal("bob")?, "DEMO", &id, "ToDo", None)
        .await?;
    let before = fixture.workflow.get_task("DEMO", &id).await?;

    expect_kind(&fixture, "bob", &id, "Doing", ErrorKind::Forbidden).await?;
    ensure!(fixture.workflow.get_task("DEMO", &id).await? == before);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backwards_move_outside_table_is_invalid(#[future] board: Board) -> eyre::Result<()> {
    let fixture = board.await;
    let id = create_fix_bug(&fixture).await?;
    fixture
        .workflow
        .transition_task(&principal("bob")?, "DEMO", &id, "ToDo", None)
        .await?;

    expect_kind(&fixture, "alice", &id, "Open", ErrorKind::InvalidTransition).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closed_task_rejects_every_target(#[future] board: Board) -> eyre::Result<()> {
    let fixture = board.await;
    let id = create_fix_bug(&fixture).await?;
    for (actor, target) in [
        ("bob", "ToDo"),
        ("alice", "Doing"),
        ("alice", "Done"),
        ("quinn", "Closed"),
    ] {
        fixture
            .workflow
            .transition_task(&principal(actor)?, "DEMO", &id, target, None)
            .await?;
    }
    let closed = fixture.workflow.get_task("DEMO", &id).await?;
    ensure!(closed.state().is_terminal());

    for target in TaskState::ALL {
        expect_kind(
            &fixture,
            "quinn",
            &id,
            target.as_str(),
            ErrorKind::InvalidTransition,
        )
        .await?;
    }
    ensure!(fixture.workflow.get_task("DEMO", &id).await? == closed);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creations_get_disjoint_sequential_ids(
    #[future] board: Board,
) -> eyre::Result<()> {
    let fixture = Arc::new(board.await);
    create_fix_bug(&fixture).await?;

    let handles: Vec<_> = (0..2)
        .map(|n| {
            let shared = Arc::clone(&fixture);
            tokio::spawn(async move {
                let alice = principal("alice")?;
                let task = shared
                    .workflow
                    .create_task(&alice, CreateTaskRequest::new("DEMO", format!("Racer {n}")))
                    .await?;
                eyre::Ok(task.id().to_string())
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await??);
    }
    let expected: HashSet<String> = ["DEMO_2", "DEMO_3"].map(str::to_owned).into();
    ensure!(ids == expected, "unexpected ids {ids:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn many_concurrent_creations_leave_no_gaps(#[future] board: Board) -> eyre::Result<()> {
    let fixture = Arc::new(board.await);

    let handles: Vec<_> = (0..24)
        .map(|n| {
            let shared = Arc::clone(&fixture);
            tokio::spawn(async move {
                let alice = principal("alice")?;
                let task = shared
                    .workflow
                    .create_task(&alice, CreateTaskRequest::new("DEMO", format!("Task {n}")))
                    .await?;
                eyre::Ok(task.id().number().value())
            })
        })
        .collect();

    let mut numbers = HashSet::new();
    for handle in handles {
        ensure!(numbers.insert(handle.await??), "number issued twice");
    }
    ensure!(numbers == (1..=24).collect::<HashSet<u64>>());
    ensure!(fixture.workflow.list_tasks("DEMO").await?.len() == 24);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_edits_append_distinct_notes(#[future] board: Board) -> eyre::Result<()> {
    let fixture = board.await;
    let id = create_fix_bug(&fixture).await?;

    for round in 1..=3 {
        fixture
            .workflow
            .edit_task(
                &principal("bob")?,
                "DEMO",
                &id,
                EditTaskRequest::new().with_note(format!("review round {round}")),
            )
            .await?;
    }

    let task = fixture.workflow.get_task("DEMO", &id).await?;
    let texts: Vec<&str> = task.notes().iter().map(|note| note.text()).collect();
    ensure!(
        texts
            == [
                "review round 3",
                "review round 2",
                "review round 1",
                "Task created"
            ]
    );
    ensure!(task.state() == TaskState::Open);
    ensure!(task.owner().as_str() == "bob");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unconfigured_stage_blocks_until_reconfigured(#[future] board: Board) -> eyre::Result<()> {
    let fixture = board.await;
    let admin = principal("ada")?;
    let id = create_fix_bug(&fixture).await?;
    fixture
        .registry
        .set_permissions(&admin, "DEMO", [("ToDo", None::<String>)])
        .await?;

    expect_kind(&fixture, "bob", &id, "ToDo", ErrorKind::Forbidden).await?;
    ensure!(fixture.workflow.get_task("DEMO", &id).await?.notes().len() == 1);

    fixture
        .registry
        .set_permissions(&admin, "DEMO", [("ToDo", Some("pm".to_owned()))])
        .await?;
    fixture
        .workflow
        .transition_task(&principal("bob")?, "DEMO", &id, "ToDo", None)
        .await?;
    Ok(())
}

#[rstest]
#[case::administration(AdminOverrideScope::Administration, false)]
#[case::workflow(AdminOverrideScope::Workflow, true)]
#[tokio::test(flavor = "multi_thread")]
async fn override_scope_controls_workflow_bypass(
    #[case] scope: AdminOverrideScope,
    #[case] may_create_task: bool,
) -> eyre::Result<()> {
    let fixture = Board::new(AdminOverride::new(principal("root")?, scope));
    let root = principal("root")?;
    fixture
        .registry
        .create_application(
            &root,
            taskboard::application::services::CreateApplicationRequest::new("OPS")
                .with_permission("Open", "ops"),
        )
        .await?;

    let result = fixture
        .workflow
        .create_task(&root, CreateTaskRequest::new("OPS", "Rotate keys"))
        .await;
    ensure!(result.is_ok() == may_create_task, "unexpected outcome {result:?}");
    Ok(())
}
