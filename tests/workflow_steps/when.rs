//! When steps for task workflow BDD scenarios.

use std::sync::Arc;

use super::world::{WorkflowWorld, run_async};
use rstest_bdd_macros::when;
use taskboard::{membership::domain::Principal, task::services::CreateTaskRequest};

#[when(r#""{principal}" creates the task "{name}""#)]
fn create_task(
    world: &mut WorkflowWorld,
    principal: String,
    name: String,
) -> Result<(), eyre::Report> {
    let creator = Principal::new(principal)?;
    let task = run_async(
        world
            .workflow
            .create_task(&creator, CreateTaskRequest::new("DEMO", name)),
    )?;
    world.current_task = Some(task);
    Ok(())
}

#[when(r#""{principal}" moves the task to "{target}""#)]
fn move_task(
    world: &mut WorkflowWorld,
    principal: String,
    target: String,
) -> Result<(), eyre::Report> {
    let actor = Principal::new(principal)?;
    let id = world.current_task_id()?;
    let result = run_async(
        world
            .workflow
            .transition_task(&actor, "DEMO", &id, &target, None),
    );
    world.last_move = Some(result);
    world.refresh()
}

#[when(r#""{principal}" creates {count:usize} tasks concurrently"#)]
fn create_concurrently(
    world: &mut WorkflowWorld,
    principal: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let creator = Principal::new(principal)?;
    let handles: Vec<_> = (0..count)
        .map(|n| {
            let workflow = Arc::clone(&world.workflow);
            let actor = creator.clone();
            tokio::spawn(async move {
                workflow
                    .create_task(&actor, CreateTaskRequest::new("DEMO", format!("Racer {n}")))
                    .await
            })
        })
        .collect();

    let mut ids = Vec::with_capacity(count);
    for handle in handles {
        let task = run_async(handle)??;
        ids.push(task.id().to_string());
    }
    ids.sort();
    world.concurrent_ids = ids;
    Ok(())
}
