//! Task workflow engine.
//!
//! Every operation follows the same path: load the application, resolve
//! the group configured for the relevant stage, ask the membership oracle,
//! then commit through the ledger so that field changes and the audit note
//! land together.

use super::NoteTemplates;
use crate::application::{
    domain::{AppAcronym, Application, ApplicationDomainError, Stage},
    ports::{ApplicationRepository, ApplicationRepositoryError},
};
use crate::error::ErrorKind;
use crate::membership::{
    domain::{GroupName, Principal},
    ports::{GroupMembership, MembershipError},
};
use crate::plan::domain::{PlanDomainError, PlanName};
use crate::task::{
    domain::{
        FieldChange, ParseTaskStateError, Task, TaskDomainError, TaskDraft, TaskEdit, TaskId,
        TaskName, TaskNumber, TaskState,
    },
    ports::{TaskLedger, TaskLedgerError},
};
use mockable::Clock;
use std::num::NonZeroU32;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Engine tuning and note texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
    /// How often a transition is re-validated after losing a race.
    pub max_transition_attempts: NonZeroU32,
    /// Texts of engine-written notes.
    pub note_templates: NoteTemplates,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            max_transition_attempts: NonZeroU32::MIN.saturating_add(2),
            note_templates: NoteTemplates::default(),
        }
    }
}

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    acronym: String,
    name: String,
    description: Option<String>,
    plan: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request for a task called `name` in application `acronym`.
    #[must_use]
    pub fn new(acronym: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            acronym: acronym.into(),
            name: name.into(),
            description: None,
            plan: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the plan reference. The plan is not required to exist.
    #[must_use]
    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = Some(plan.into());
        self
    }
}

/// Request payload for editing a task's content.
///
/// Blank description or plan values clear the field; a blank note counts
/// as no note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditTaskRequest {
    description: Option<String>,
    plan: Option<String>,
    note: Option<String>,
}

impl EditTaskRequest {
    /// Creates an empty edit request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the plan reference.
    #[must_use]
    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = Some(plan.into());
        self
    }

    /// Adds a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Result of a committed transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    id: TaskId,
    state: TaskState,
    owner: Principal,
}

impl TaskSummary {
    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the new state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the new owner.
    #[must_use]
    pub const fn owner(&self) -> &Principal {
        &self.owner
    }
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().clone(),
            state: task.state(),
            owner: task.owner().clone(),
        }
    }
}

/// Service-level errors for workflow operations.
#[derive(Debug, Error)]
pub enum TaskWorkflowError {
    /// Task validation or state machine rejection.
    #[error(transparent)]
    Task(#[from] TaskDomainError),
    /// The acronym failed validation.
    #[error(transparent)]
    Acronym(#[from] ApplicationDomainError),
    /// The plan reference failed validation.
    #[error(transparent)]
    Plan(#[from] PlanDomainError),
    /// The requested target state is unknown.
    #[error(transparent)]
    UnknownState(#[from] ParseTaskStateError),
    /// The task does not exist in the application.
    #[error("task {task_id} not found in application {acronym}")]
    TaskNotFound {
        /// Application the caller addressed.
        acronym: AppAcronym,
        /// Requested task identifier.
        task_id: String,
    },
    /// No group is configured for the stage, so nobody may perform it.
    #[error("stage {stage} is not configured for application {acronym}")]
    StageNotConfigured {
        /// Application whose permissions were consulted.
        acronym: AppAcronym,
        /// Unconfigured stage.
        stage: Stage,
    },
    /// The principal is not in the group configured for the stage.
    #[error("principal {principal} is not in group {group} required for stage {stage}")]
    NotPermitted {
        /// Acting principal.
        principal: Principal,
        /// Required group.
        group: GroupName,
        /// Stage being performed.
        stage: Stage,
    },
    /// Racing transitions kept invalidating the change.
    #[error("task {task_id} kept changing; gave up after {attempts} attempts")]
    Contention {
        /// Contended task.
        task_id: TaskId,
        /// Attempts made.
        attempts: u32,
    },
    /// A note template failed to render.
    #[error("failed to render note template: {0}")]
    NoteTemplate(#[from] minijinja::Error),
    /// The membership oracle failed.
    #[error(transparent)]
    Membership(#[from] MembershipError),
    /// Application registry operation failed.
    #[error(transparent)]
    Application(#[from] ApplicationRepositoryError),
    /// Task ledger operation failed.
    #[error(transparent)]
    Ledger(#[from] TaskLedgerError),
}

impl TaskWorkflowError {
    /// Classifies the failure for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Task(err) => err.kind(),
            Self::Acronym(_) | Self::Plan(_) | Self::UnknownState(_) => {
                ErrorKind::InvalidArgument
            }
            Self::TaskNotFound { .. } => ErrorKind::NotFound,
            Self::StageNotConfigured { .. } | Self::NotPermitted { .. } => ErrorKind::Forbidden,
            Self::Contention { .. } | Self::NoteTemplate(_) | Self::Membership(_) => {
                ErrorKind::Unavailable
            }
            Self::Application(err) => err.kind(),
            Self::Ledger(err) => err.kind(),
        }
    }
}

/// Result type for workflow service operations.
pub type TaskWorkflowResult<T> = Result<T, TaskWorkflowError>;

/// Task workflow engine.
#[derive(Clone)]
pub struct TaskWorkflowService<A, T, M, C>
where
    A: ApplicationRepository,
    T: TaskLedger,
    M: GroupMembership,
    C: Clock + Send + Sync,
{
    applications: Arc<A>,
    ledger: Arc<T>,
    membership: Arc<M>,
    clock: Arc<C>,
    settings: WorkflowSettings,
}

impl<A, T, M, C> TaskWorkflowService<A, T, M, C>
where
    A: ApplicationRepository,
    T: TaskLedger,
    M: GroupMembership,
    C: Clock + Send + Sync,
{
    /// Creates a workflow engine with default settings.
    #[must_use]
    pub fn new(applications: Arc<A>, ledger: Arc<T>, membership: Arc<M>, clock: Arc<C>) -> Self {
        Self {
            applications,
            ledger,
            membership,
            clock,
            settings: WorkflowSettings::default(),
        }
    }

    /// Replaces the engine settings.
    #[must_use]
    pub fn with_settings(mut self, settings: WorkflowSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Creates an `Open` task owned by `principal`.
    ///
    /// The identifier is minted from the application's running number, so a
    /// number is consumed even if the final insert fails; identifiers are
    /// never issued twice.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound`-kind error for an unknown application, a
    /// `Forbidden`-kind error when the `Open` stage is unconfigured or
    /// `principal` is not in its group, and an `InvalidArgument`-kind error
    /// for malformed fields.
    pub async fn create_task(
        &self,
        principal: &Principal,
        request: CreateTaskRequest,
    ) -> TaskWorkflowResult<Task> {
        let CreateTaskRequest {
            acronym,
            name,
            description,
            plan,
        } = request;
        let parsed_acronym = AppAcronym::new(acronym)?;
        let task_name = TaskName::new(name)?;
        let plan_name = parse_plan(plan)?.and_then(|change| change.as_option().cloned());

        let application = self.load_application(&parsed_acronym).await?;
        self.authorize(principal, &application, Stage::Open).await?;
        let note = self
            .settings
            .note_templates
            .render_creation(principal, &task_name)?;

        let number = self
            .applications
            .reserve_next_task_number(&parsed_acronym)
            .await?;
        let task_id = TaskId::compose(parsed_acronym, TaskNumber::new(number)?);
        let task = Task::new(
            TaskDraft {
                id: task_id,
                name: task_name,
                description,
                plan: plan_name,
                creator: principal.clone(),
            },
            note,
            &*self.clock,
        )?;
        self.ledger.create_with_id(&task).await?;

        info!(task_id = %task.id(), principal = %principal, "task created");
        Ok(task)
    }

    /// Moves a task to `target`, recording `note` or the default
    /// transition text, and makes `principal` the owner.
    ///
    /// If another transition commits first, the task is re-read and the
    /// request re-validated from its new state, up to the configured number
    /// of attempts.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound`-kind error for an unknown application or task,
    /// an `InvalidArgument`-kind error for an unknown target, an
    /// `InvalidTransition`-kind error when the table forbids the move, and a
    /// `Forbidden`-kind error when the stage is unconfigured or `principal`
    /// lacks the group. The task is unchanged on every error.
    pub async fn transition_task(
        &self,
        principal: &Principal,
        acronym: &str,
        task_id: &str,
        target: &str,
        note: Option<String>,
    ) -> TaskWorkflowResult<TaskSummary> {
        let parsed_acronym = AppAcronym::new(acronym)?;
        let application = self.load_application(&parsed_acronym).await?;
        let id = parse_task_id(&parsed_acronym, task_id)?;
        let mut task = self.load_task(&parsed_acronym, &id).await?;
        let target_state = TaskState::try_from(target)?;
        let custom_note = normalize_note(note);

        let max_attempts = self.settings.max_transition_attempts.get();
        for attempt in 1..=max_attempts {
            let text = match &custom_note {
                Some(text) => text.clone(),
                None => self.settings.note_templates.render_transition(
                    principal,
                    task_id,
                    task.state(),
                    target_state,
                )?,
            };
            let change =
                task.prepare_transition(target_state, principal.clone(), text, self.clock.utc())?;
            self.authorize(principal, &application, target_state.required_stage())
                .await?;

            match self.ledger.append_note_and_set_state(&id, &change).await {
                Ok(updated) => {
                    info!(
                        task_id = %id,
                        from = %change.expected(),
                        to = %target_state,
                        principal = %principal,
                        "task transitioned"
                    );
                    return Ok(TaskSummary::from(&updated));
                }
                Err(err) if err.is_stale() && attempt < max_attempts => {
                    warn!(task_id = %id, attempt, "transition raced, re-validating");
                    task = self.load_task(&parsed_acronym, &id).await?;
                }
                Err(err) if err.is_stale() => break,
                Err(err) => return Err(err.into()),
            }
        }

        warn!(task_id = %id, attempts = max_attempts, "transition abandoned under contention");
        Err(TaskWorkflowError::Contention {
            task_id: id,
            attempts: max_attempts,
        })
    }

    /// Edits a task's description and plan and optionally adds a note.
    ///
    /// No workflow permission is required; `principal` becomes the owner.
    /// The note, if any, is recorded with the task's current state.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound`-kind error for an unknown task and an
    /// `InvalidArgument`-kind error when the request supplies nothing.
    pub async fn edit_task(
        &self,
        principal: &Principal,
        acronym: &str,
        task_id: &str,
        request: EditTaskRequest,
    ) -> TaskWorkflowResult<Task> {
        let parsed_acronym = AppAcronym::new(acronym)?;
        let id = parse_task_id(&parsed_acronym, task_id)?;

        let EditTaskRequest {
            description,
            plan,
            note,
        } = request;
        let mut edit = TaskEdit::new(principal.clone(), self.clock.utc());
        if let Some(text) = description {
            edit = edit.with_description(FieldChange::from_text(text));
        }
        if let Some(change) = parse_plan(plan)? {
            edit = edit.with_plan(change);
        }
        if let Some(text) = normalize_note(note) {
            edit = edit.with_note(text);
        }
        if edit.is_empty() {
            return Err(TaskDomainError::EmptyEdit(id).into());
        }

        let task = self
            .ledger
            .update_fields(&id, &edit)
            .await
            .map_err(|err| match err {
                TaskLedgerError::NotFound(_) => TaskWorkflowError::TaskNotFound {
                    acronym: parsed_acronym.clone(),
                    task_id: task_id.to_owned(),
                },
                other => other.into(),
            })?;
        info!(task_id = %id, principal = %principal, "task edited");
        Ok(task)
    }

    /// Returns the tasks of an application, newest first, with their notes.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound`-kind error for an unknown application.
    pub async fn list_tasks(&self, acronym: &str) -> TaskWorkflowResult<Vec<Task>> {
        let parsed_acronym = AppAcronym::new(acronym)?;
        self.load_application(&parsed_acronym).await?;
        Ok(self.ledger.list_by_application(&parsed_acronym).await?)
    }

    /// Returns a single task of an application.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound`-kind error when the task does not exist or
    /// belongs to another application.
    pub async fn get_task(&self, acronym: &str, task_id: &str) -> TaskWorkflowResult<Task> {
        let parsed_acronym = AppAcronym::new(acronym)?;
        let id = parse_task_id(&parsed_acronym, task_id)?;
        self.load_task(&parsed_acronym, &id).await
    }

    async fn load_application(&self, acronym: &AppAcronym) -> TaskWorkflowResult<Application> {
        debug!(acronym = %acronym, "loading application");
        self.applications
            .find_by_acronym(acronym)
            .await?
            .ok_or_else(|| ApplicationRepositoryError::NotFound(acronym.clone()).into())
    }

    async fn load_task(&self, acronym: &AppAcronym, id: &TaskId) -> TaskWorkflowResult<Task> {
        self.ledger
            .find_by_id(id)
            .await?
            .ok_or_else(|| TaskWorkflowError::TaskNotFound {
                acronym: acronym.clone(),
                task_id: id.to_string(),
            })
    }

    async fn authorize(
        &self,
        principal: &Principal,
        application: &Application,
        stage: Stage,
    ) -> TaskWorkflowResult<()> {
        let Some(group) = application.permitted_group(stage) else {
            warn!(acronym = %application.acronym(), stage = %stage, "stage not configured");
            return Err(TaskWorkflowError::StageNotConfigured {
                acronym: application.acronym().clone(),
                stage,
            });
        };
        if self.membership.is_member(principal, group).await? {
            return Ok(());
        }
        warn!(
            principal = %principal,
            group = %group,
            stage = %stage,
            "workflow action denied"
        );
        Err(TaskWorkflowError::NotPermitted {
            principal: principal.clone(),
            group: group.clone(),
            stage,
        })
    }
}

/// Parses `task_id` and checks it belongs to `acronym`. Identifiers of
/// other applications are reported as not found.
fn parse_task_id(acronym: &AppAcronym, task_id: &str) -> TaskWorkflowResult<TaskId> {
    let not_found = || TaskWorkflowError::TaskNotFound {
        acronym: acronym.clone(),
        task_id: task_id.to_owned(),
    };
    let id = TaskId::parse(task_id).map_err(|_| not_found())?;
    if id.application() != acronym {
        return Err(not_found());
    }
    Ok(id)
}

fn parse_plan(plan: Option<String>) -> TaskWorkflowResult<Option<FieldChange<PlanName>>> {
    let Some(name) = plan else {
        return Ok(None);
    };
    if name.trim().is_empty() {
        return Ok(Some(FieldChange::Clear));
    }
    Ok(Some(FieldChange::Set(PlanName::new(name)?)))
}

fn normalize_note(note: Option<String>) -> Option<String> {
    note.filter(|text| !text.trim().is_empty())
}
