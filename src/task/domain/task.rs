//! Task aggregate root.

use super::{
    AuditNote, FieldChange, StateChange, TaskDomainError, TaskEdit, TaskId, TaskName, TaskState,
};
use crate::membership::domain::Principal;
use crate::plan::domain::PlanName;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Fields supplied when a task is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Identifier minted from the application's running number.
    pub id: TaskId,
    /// Task title.
    pub name: TaskName,
    /// Optional description.
    pub description: Option<String>,
    /// Optional soft reference to a plan of the same application.
    pub plan: Option<PlanName>,
    /// Creating principal, who also becomes the first owner.
    pub creator: Principal,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    name: TaskName,
    description: Option<String>,
    plan: Option<PlanName>,
    state: TaskState,
    creator: Principal,
    owner: Principal,
    notes: Vec<AuditNote>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted identifier.
    pub id: TaskId,
    /// Persisted name.
    pub name: TaskName,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted plan reference.
    pub plan: Option<PlanName>,
    /// Persisted state.
    pub state: TaskState,
    /// Persisted creator.
    pub creator: Principal,
    /// Persisted owner.
    pub owner: Principal,
    /// Persisted audit trail, newest first.
    pub notes: Vec<AuditNote>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates an `Open` task whose trail holds a single creation note.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyNote`] when `creation_note` is blank.
    pub fn new(
        draft: TaskDraft,
        creation_note: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let timestamp = clock.utc();
        let TaskDraft {
            id,
            name,
            description,
            plan,
            creator,
        } = draft;
        let note = AuditNote::new(creator.clone(), TaskState::Open, creation_note, timestamp)?;

        Ok(Self {
            id,
            name,
            description: description.filter(|text| !text.trim().is_empty()),
            plan,
            state: TaskState::Open,
            owner: creator.clone(),
            creator,
            notes: vec![note],
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyAuditTrail`] when `data.notes` is
    /// empty.
    pub fn from_persisted(data: PersistedTaskData) -> Result<Self, TaskDomainError> {
        if data.notes.is_empty() {
            return Err(TaskDomainError::EmptyAuditTrail(data.id));
        }
        Ok(Self {
            id: data.id,
            name: data.name,
            description: data.description,
            plan: data.plan,
            state: data.state,
            creator: data.creator,
            owner: data.owner,
            notes: data.notes,
            created_at: data.created_at,
            updated_at: data.updated_at,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the task name.
    #[must_use]
    pub const fn name(&self) -> &TaskName {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the plan reference, if any. The plan may no longer exist.
    #[must_use]
    pub const fn plan(&self) -> Option<&PlanName> {
        self.plan.as_ref()
    }

    /// Returns the workflow state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the creating principal.
    #[must_use]
    pub const fn creator(&self) -> &Principal {
        &self.creator
    }

    /// Returns the principal who last acted on the task.
    #[must_use]
    pub const fn owner(&self) -> &Principal {
        &self.owner
    }

    /// Returns the audit trail, newest first. Never empty.
    #[must_use]
    pub fn notes(&self) -> &[AuditNote] {
        &self.notes
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Validates a transition to `target` against the current state and
    /// prepares the change for an atomic ledger commit.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when the table
    /// forbids the move, or [`TaskDomainError::EmptyNote`] for a blank note.
    pub fn prepare_transition(
        &self,
        target: TaskState,
        principal: Principal,
        note: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<StateChange, TaskDomainError> {
        self.ensure_transition(self.state, target)?;
        let audit_note = AuditNote::new(principal, target, note, timestamp)?;
        Ok(StateChange::new(self.state, target, audit_note))
    }

    /// Applies a prepared transition: sets state and owner and prepends the
    /// note. The task is unchanged on error.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::StaleState`] when the task left the state
    /// the change was prepared against, or
    /// [`TaskDomainError::InvalidStateTransition`] when the change itself is
    /// not in the table.
    pub fn apply_state_change(&mut self, change: &StateChange) -> Result<(), TaskDomainError> {
        if self.state != change.expected() {
            return Err(TaskDomainError::StaleState {
                task_id: self.id.clone(),
                expected: change.expected(),
                actual: self.state,
            });
        }
        self.ensure_transition(change.expected(), change.target())?;

        self.state = change.target();
        self.owner = change.owner().clone();
        self.updated_at = change.note().timestamp();
        self.notes.insert(0, change.note().clone());
        Ok(())
    }

    /// Applies a content edit. The editor becomes owner; a note, if
    /// supplied, is recorded with the current state. The task is unchanged
    /// on error.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyEdit`] when nothing is supplied, or
    /// [`TaskDomainError::EmptyNote`] for a blank note.
    pub fn apply_edit(&mut self, edit: &TaskEdit) -> Result<(), TaskDomainError> {
        if edit.is_empty() {
            return Err(TaskDomainError::EmptyEdit(self.id.clone()));
        }
        let note = edit
            .note()
            .map(|text| AuditNote::new(edit.editor().clone(), self.state, text, edit.timestamp()))
            .transpose()?;

        if let Some(change) = edit.description() {
            self.description = change
                .as_option()
                .filter(|text| !text.trim().is_empty())
                .cloned();
        }
        if let Some(change) = edit.plan() {
            self.plan = change.as_option().cloned();
        }
        self.owner = edit.editor().clone();
        self.updated_at = edit.timestamp();
        if let Some(entry) = note {
            self.notes.insert(0, entry);
        }
        Ok(())
    }

    fn ensure_transition(&self, from: TaskState, to: TaskState) -> Result<(), TaskDomainError> {
        if from.can_transition_to(to) {
            return Ok(());
        }
        Err(TaskDomainError::InvalidStateTransition {
            task_id: self.id.clone(),
            from,
            to,
        })
    }
}

impl FieldChange<String> {
    /// Builds a description change from caller input: blank text clears.
    #[must_use]
    pub fn from_text(value: String) -> Self {
        if value.trim().is_empty() {
            Self::Clear
        } else {
            Self::Set(value)
        }
    }
}
