//! Mutations applied to a task inside a ledger's atomic section.

use super::{AuditNote, TaskState};
use crate::membership::domain::Principal;
use crate::plan::domain::PlanName;
use chrono::{DateTime, Utc};

/// A validated state transition, checked again at commit time.
///
/// The ledger applies the change only while the task is still in
/// [`StateChange::expected`]; otherwise it reports a stale state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    expected: TaskState,
    target: TaskState,
    note: AuditNote,
}

impl StateChange {
    pub(super) const fn new(expected: TaskState, target: TaskState, note: AuditNote) -> Self {
        Self {
            expected,
            target,
            note,
        }
    }

    /// Returns the state the change was validated against.
    #[must_use]
    pub const fn expected(&self) -> TaskState {
        self.expected
    }

    /// Returns the state to enter.
    #[must_use]
    pub const fn target(&self) -> TaskState {
        self.target
    }

    /// Returns the principal who becomes owner.
    #[must_use]
    pub const fn owner(&self) -> &Principal {
        self.note.principal()
    }

    /// Returns the note recorded with the change.
    #[must_use]
    pub const fn note(&self) -> &AuditNote {
        &self.note
    }
}

/// Change to an optional task field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange<T> {
    /// Replace the value.
    Set(T),
    /// Remove the value.
    Clear,
}

impl<T> FieldChange<T> {
    /// Returns the new value, or `None` when clearing.
    #[must_use]
    pub const fn as_option(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Clear => None,
        }
    }
}

/// Content edit of a task: description, plan, and an optional note.
///
/// Fields left unset are untouched. The editor always becomes the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEdit {
    editor: Principal,
    timestamp: DateTime<Utc>,
    description: Option<FieldChange<String>>,
    plan: Option<FieldChange<PlanName>>,
    note: Option<String>,
}

impl TaskEdit {
    /// Starts an edit by `editor`.
    #[must_use]
    pub const fn new(editor: Principal, timestamp: DateTime<Utc>) -> Self {
        Self {
            editor,
            timestamp,
            description: None,
            plan: None,
            note: None,
        }
    }

    /// Sets or clears the description.
    #[must_use]
    pub fn with_description(mut self, change: FieldChange<String>) -> Self {
        self.description = Some(change);
        self
    }

    /// Sets or clears the plan reference.
    #[must_use]
    pub fn with_plan(mut self, change: FieldChange<PlanName>) -> Self {
        self.plan = Some(change);
        self
    }

    /// Adds a note, recorded with the task's state at commit time.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Returns the editing principal.
    #[must_use]
    pub const fn editor(&self) -> &Principal {
        &self.editor
    }

    /// Returns the edit timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the description change, if any.
    #[must_use]
    pub const fn description(&self) -> Option<&FieldChange<String>> {
        self.description.as_ref()
    }

    /// Returns the plan change, if any.
    #[must_use]
    pub const fn plan(&self) -> Option<&FieldChange<PlanName>> {
        self.plan.as_ref()
    }

    /// Returns the note text, if any.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Returns `true` when the edit supplies no field and no note.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.description.is_none() && self.plan.is_none() && self.note.is_none()
    }
}
