//! Given steps for task workflow BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::{
    application::services::CreateApplicationRequest,
    membership::domain::{GroupName, Principal},
    task::services::CreateTaskRequest,
};

#[given(
    r#"an application "{acronym}" permitting "{open}" to open, "{todo}" to plan, "{doing}" to work and "{done}" to finish"#
)]
fn application_with_permissions(
    world: &mut WorkflowWorld,
    acronym: String,
    open: String,
    todo: String,
    doing: String,
    done: String,
) -> Result<(), eyre::Report> {
    let request = CreateApplicationRequest::new(acronym)
        .with_permission("Open", open)
        .with_permission("ToDo", todo)
        .with_permission("Doing", doing)
        .with_permission("Done", done);
    run_async(
        world
            .registry
            .create_application(&world.administrator, request),
    )
    .wrap_err("create application for scenario")?;
    Ok(())
}

#[given(r#""{principal}" belongs to group "{group}""#)]
fn principal_in_group(
    world: &mut WorkflowWorld,
    principal: String,
    group: String,
) -> Result<(), eyre::Report> {
    world
        .directory
        .add_member(Principal::new(principal)?, GroupName::new(group)?)?;
    Ok(())
}

#[given(r#""{principal}" created the task "{name}""#)]
fn task_created(
    world: &mut WorkflowWorld,
    principal: String,
    name: String,
) -> Result<(), eyre::Report> {
    let creator = Principal::new(principal)?;
    let task = run_async(
        world
            .workflow
            .create_task(&creator, CreateTaskRequest::new("DEMO", name)),
    )
    .wrap_err("create task in scenario setup")?;
    world.current_task = Some(task);
    Ok(())
}

#[given(r#""{principal}" moved the task to "{target}""#)]
fn task_moved(
    world: &mut WorkflowWorld,
    principal: String,
    target: String,
) -> Result<(), eyre::Report> {
    let actor = Principal::new(principal)?;
    let id = world.current_task_id()?;
    run_async(
        world
            .workflow
            .transition_task(&actor, "DEMO", &id, &target, None),
    )
    .wrap_err("transition task in scenario setup")?;
    world.refresh()
}
