//! Configurable audit-note texts rendered with `minijinja`.

use crate::membership::domain::Principal;
use crate::task::domain::{TaskName, TaskState};
use minijinja::{Environment, ErrorKind, Value, context};

/// Templates for the notes the engine writes on its own behalf.
///
/// The creation template sees `principal` and `name`; the transition
/// template sees `principal`, `task_id`, `from` and `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTemplates {
    creation: String,
    transition: String,
}

impl NoteTemplates {
    /// Default creation note.
    pub const DEFAULT_CREATION: &'static str = "Task created";
    /// Default transition note.
    pub const DEFAULT_TRANSITION: &'static str = "Task transitioned from {{ from }} to {{ to }}";

    /// Creates templates after checking that both parse and render to
    /// non-blank text for a sample task.
    ///
    /// # Errors
    ///
    /// Returns the `minijinja` error of the first template that fails to
    /// parse or renders blank.
    pub fn new(
        creation: impl Into<String>,
        transition: impl Into<String>,
    ) -> Result<Self, minijinja::Error> {
        let templates = Self {
            creation: creation.into(),
            transition: transition.into(),
        };
        render_note(
            "creation",
            &templates.creation,
            context! { principal => "alice", name => "Sample task" },
        )?;
        render_note(
            "transition",
            &templates.transition,
            context! {
                principal => "alice",
                task_id => "DEMO_1",
                from => TaskState::Open.as_str(),
                to => TaskState::ToDo.as_str(),
            },
        )?;
        Ok(templates)
    }

    /// Renders the creation note.
    ///
    /// # Errors
    ///
    /// Returns the `minijinja` error raised while rendering, including when
    /// the output is blank.
    pub fn render_creation(
        &self,
        principal: &Principal,
        name: &TaskName,
    ) -> Result<String, minijinja::Error> {
        render_note(
            "creation",
            &self.creation,
            context! {
                principal => principal.as_str(),
                name => name.as_str(),
            },
        )
    }

    /// Renders the note recorded with a transition.
    ///
    /// # Errors
    ///
    /// Returns the `minijinja` error raised while rendering, including when
    /// the output is blank.
    pub fn render_transition(
        &self,
        principal: &Principal,
        task_id: &str,
        from: TaskState,
        to: TaskState,
    ) -> Result<String, minijinja::Error> {
        render_note(
            "transition",
            &self.transition,
            context! {
                principal => principal.as_str(),
                task_id => task_id,
                from => from.as_str(),
                to => to.as_str(),
            },
        )
    }
}

impl Default for NoteTemplates {
    fn default() -> Self {
        Self {
            creation: Self::DEFAULT_CREATION.to_owned(),
            transition: Self::DEFAULT_TRANSITION.to_owned(),
        }
    }
}

fn render_note(which: &str, source: &str, ctx: Value) -> Result<String, minijinja::Error> {
    let text = Environment::new().render_str(source, ctx)?;
    if text.trim().is_empty() {
        return Err(minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("{which} note template rendered blank text"),
        ));
    }
    Ok(text)
}
