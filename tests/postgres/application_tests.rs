//! Application registry persistence and task number reservation.

use std::collections::HashSet;
use std::sync::Arc;

use super::helpers::{PgStore, principal, store};
use eyre::{bail, ensure};
use rstest::rstest;
use taskboard::{
    application::{
        domain::{AppAcronym, Stage},
        ports::{ApplicationRepository, ApplicationRepositoryError},
        services::CreateApplicationRequest,
    },
    error::ErrorKind,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_acronym_conflicts(#[future] store: PgStore) -> eyre::Result<()> {
    let fixture = store.await;

    let err = fixture
        .registry
        .create_application(&principal("ada")?, CreateApplicationRequest::new("DEMO"))
        .await
        .expect_err("acronym already taken");
    ensure!(err.kind() == ErrorKind::Conflict, "got {err}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_reservations_are_disjoint_and_gapless(
    #[future] store: PgStore,
) -> eyre::Result<()> {
    let fixture = Arc::new(store.await);
    let acronym = AppAcronym::new("DEMO")?;

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let shared = Arc::clone(&fixture);
            let key = acronym.clone();
            tokio::spawn(async move { shared.applications.reserve_next_task_number(&key).await })
        })
        .collect();

    let mut numbers = HashSet::new();
    for handle in handles {
        ensure!(numbers.insert(handle.await??), "number reserved twice");
    }
    ensure!(numbers == (1..=16).collect::<HashSet<u64>>());

    let stored = fixture
        .applications
        .find_by_acronym(&acronym)
        .await?
        .ok_or_else(|| eyre::eyre!("application missing"))?;
    ensure!(stored.running_number() == 16);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reservation_for_missing_application_is_not_found(
    #[future] store: PgStore,
) -> eyre::Result<()> {
    let fixture = store.await;

    match fixture
        .applications
        .reserve_next_task_number(&AppAcronym::new("NOPE")?)
        .await
    {
        Err(ApplicationRepositoryError::NotFound(acronym)) => ensure!(acronym.as_str() == "NOPE"),
        other => bail!("expected not found, got {other:?}"),
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn permission_changes_survive_reload(#[future] store: PgStore) -> eyre::Result<()> {
    let fixture = store.await;
    fixture
        .registry
        .set_permissions(
            &principal("ada")?,
            "DEMO",
            [("ToDo", None), ("Done", Some("pm".to_owned()))],
        )
        .await?;

    let stored = fixture
        .applications
        .find_by_acronym(&AppAcronym::new("DEMO")?)
        .await?
        .ok_or_else(|| eyre::eyre!("application missing"))?;
    ensure!(stored.permitted_group(Stage::ToDo).is_none());
    ensure!(stored.permitted_group(Stage::Done).map(|group| group.as_str()) == Some("pm"));
    ensure!(stored.permitted_group(Stage::Open).map(|group| group.as_str()) == Some("dev"));
    ensure!(stored.running_number() == 0);
    Ok(())
}
