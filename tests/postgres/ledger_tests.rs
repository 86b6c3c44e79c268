//! Task rows, JSONB audit notes, and row-locked state changes.

use std::sync::Arc;

use super::helpers::{FixedClock, PgStore, demo_task, principal, store};
use chrono::{Duration, Utc};
use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::rstest;
use taskboard::{
    application::domain::AppAcronym,
    task::{
        domain::TaskState,
        ports::{TaskLedger, TaskLedgerError},
    },
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn notes_round_trip_through_jsonb(#[future] store: PgStore) -> eyre::Result<()> {
    let fixture = store.await;
    let created = demo_task(1, &DefaultClock)?;
    fixture.ledger.create_with_id(&created).await?;

    let stored = fixture
        .ledger
        .find_by_id(created.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task missing"))?;
    ensure!(stored.notes() == created.notes());
    ensure!(stored.name() == created.name());
    ensure!(stored.description() == Some("stored as a row"));
    ensure!(stored.owner().as_str() == "alice");

    let change = stored.prepare_transition(
        TaskState::ToDo,
        principal("bob")?,
        "ready for the sprint",
        Utc::now(),
    )?;
    let moved = fixture
        .ledger
        .append_note_and_set_state(stored.id(), &change)
        .await?;

    let reloaded = fixture
        .ledger
        .find_by_id(created.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task missing"))?;
    ensure!(reloaded.notes() == moved.notes());
    ensure!(reloaded.state() == TaskState::ToDo);
    ensure!(reloaded.owner().as_str() == "bob");
    let head = reloaded
        .notes()
        .first()
        .ok_or_else(|| eyre::eyre!("no notes"))?;
    ensure!(head.text() == "ready for the sprint");
    ensure!(head.state() == TaskState::ToDo);
    ensure!(head.principal().as_str() == "bob");
    ensure!(reloaded.notes().len() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_task_id_is_rejected(#[future] store: PgStore) -> eyre::Result<()> {
    let fixture = store.await;
    fixture
        .ledger
        .create_with_id(&demo_task(1, &DefaultClock)?)
        .await?;

    match fixture
        .ledger
        .create_with_id(&demo_task(1, &DefaultClock)?)
        .await
    {
        Err(TaskLedgerError::DuplicateTask(id)) => ensure!(id.to_string() == "DEMO_1"),
        other => bail!("expected duplicate error, got {other:?}"),
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn racing_transitions_commit_exactly_once(#[future] store: PgStore) -> eyre::Result<()> {
    let fixture = Arc::new(store.await);
    let created = demo_task(1, &DefaultClock)?;
    fixture.ledger.create_with_id(&created).await?;

    let mut handles = Vec::new();
    for n in 0..6 {
        let change = created.prepare_transition(
            TaskState::ToDo,
            principal(&format!("user{n}"))?,
            "go",
            Utc::now(),
        )?;
        let shared = Arc::clone(&fixture);
        let id = created.id().clone();
        handles.push(tokio::spawn(async move {
            shared.ledger.append_note_and_set_state(&id, &change).await
        }));
    }

    let mut committed = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => committed += 1,
            Err(err) => ensure!(err.is_stale(), "unexpected error {err}"),
        }
    }
    ensure!(committed == 1);
    let stored = fixture
        .ledger
        .find_by_id(created.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task missing"))?;
    ensure!(stored.notes().len() == 2);
    ensure!(stored.state() == TaskState::ToDo);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_orders_by_number_not_timestamp(#[future] store: PgStore) -> eyre::Result<()> {
    let fixture = store.await;
    let now = Utc::now();
    fixture
        .ledger
        .create_with_id(&demo_task(1, &FixedClock(now))?)
        .await?;
    fixture
        .ledger
        .create_with_id(&demo_task(2, &FixedClock(now - Duration::minutes(5)))?)
        .await?;

    let listed: Vec<String> = fixture
        .ledger
        .list_by_application(&AppAcronym::new("DEMO")?)
        .await?
        .iter()
        .map(|task| task.id().to_string())
        .collect();
    ensure!(listed == ["DEMO_2", "DEMO_1"]);
    Ok(())
}
