//! Plan uniqueness and the application foreign key.

use super::helpers::{PgStore, store};
use chrono::NaiveDate;
use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::rstest;
use taskboard::{
    application::domain::AppAcronym,
    error::ErrorKind,
    plan::{
        domain::{Plan, PlanName, PlanSchedule},
        ports::{PlanRepository, PlanRepositoryError},
    },
};

fn plan(acronym: &str, name: &str) -> eyre::Result<Plan> {
    Ok(Plan::new(
        AppAcronym::new(acronym)?,
        PlanName::new(name)?,
        PlanSchedule::new(
            NaiveDate::from_ymd_opt(2026, 11, 2),
            NaiveDate::from_ymd_opt(2026, 11, 13),
            Some("#00aa55".to_owned()),
        )?,
        &DefaultClock,
    ))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_plan_name_conflicts(#[future] store: PgStore) -> eyre::Result<()> {
    let fixture = store.await;
    fixture.plans.create(&plan("DEMO", "Sprint 1")?).await?;

    let err = fixture
        .plans
        .create(&plan("DEMO", "Sprint 1")?)
        .await
        .expect_err("name already used");
    ensure!(
        matches!(err, PlanRepositoryError::DuplicatePlan { .. }),
        "got {err}"
    );
    ensure!(err.kind() == ErrorKind::Conflict);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn plan_for_missing_application_is_not_found(#[future] store: PgStore) -> eyre::Result<()> {
    let fixture = store.await;

    match fixture.plans.create(&plan("NOPE", "Sprint 1")?).await {
        Err(err @ PlanRepositoryError::ApplicationNotFound(_)) => {
            ensure!(err.kind() == ErrorKind::NotFound);
        }
        other => bail!("expected missing application, got {other:?}"),
    }
    ensure!(
        fixture
            .plans
            .list_by_application(&AppAcronym::new("NOPE")?)
            .await?
            .is_empty()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn plans_list_by_name_with_schedule(#[future] store: PgStore) -> eyre::Result<()> {
    let fixture = store.await;
    fixture.plans.create(&plan("DEMO", "Sprint 2")?).await?;
    fixture.plans.create(&plan("DEMO", "Sprint 1")?).await?;

    let listed = fixture
        .plans
        .list_by_application(&AppAcronym::new("DEMO")?)
        .await?;
    let names: Vec<&str> = listed.iter().map(|stored| stored.name().as_str()).collect();
    ensure!(names == ["Sprint 1", "Sprint 2"]);
    let first = listed.first().ok_or_else(|| eyre::eyre!("no plans"))?;
    ensure!(first.schedule().start_date() == NaiveDate::from_ymd_opt(2026, 11, 2));
    ensure!(first.schedule().color() == Some("#00aa55"));
    Ok(())
}
