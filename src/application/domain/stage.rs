//! Permission-checked workflow stages.

use super::ParseStageError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage whose entry is gated by a configured user-group.
///
/// `Open` gates task creation. `ToDo` gates release into the to-do column,
/// `Doing` gates both starting work and marking it done, and `Done` gates
/// closing a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    /// Task creation.
    Open,
    /// Release into the to-do list.
    ToDo,
    /// Work in progress and completion.
    Doing,
    /// Approval and closing.
    Done,
}

impl Stage {
    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::ToDo => "ToDo",
            Self::Doing => "Doing",
            Self::Done => "Done",
        }
    }
}

impl TryFrom<&str> for Stage {
    type Error = ParseStageError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "todo" | "to_do" | "todolist" => Ok(Self::ToDo),
            "doing" => Ok(Self::Doing),
            "done" => Ok(Self::Done),
            _ => Err(ParseStageError(value.to_owned())),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
