//! Five-state task workflow.

use super::ParseTaskStateError;
use crate::application::domain::Stage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task workflow state.
///
/// | From   | To            |
/// |--------|---------------|
/// | Open   | ToDo          |
/// | ToDo   | Doing         |
/// | Doing  | Done, ToDo    |
/// | Done   | Closed, Doing |
/// | Closed | (none)        |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskState {
    /// Created, awaiting release.
    Open,
    /// Released to the to-do list.
    ToDo,
    /// Work in progress.
    Doing,
    /// Work finished, awaiting approval.
    Done,
    /// Approved and closed. Terminal.
    Closed,
}

impl TaskState {
    /// Every state, in workflow order.
    pub const ALL: [Self; 5] = [
        Self::Open,
        Self::ToDo,
        Self::Doing,
        Self::Done,
        Self::Closed,
    ];

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::ToDo => "ToDo",
            Self::Doing => "Doing",
            Self::Done => "Done",
            Self::Closed => "Closed",
        }
    }

    /// Returns `true` when the transition table allows `self -> target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open | Self::Doing, Self::ToDo)
                | (Self::ToDo | Self::Done, Self::Doing)
                | (Self::Doing, Self::Done)
                | (Self::Done, Self::Closed)
        )
    }

    /// Returns `true` for states with no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns the stage whose group authorizes entering this state.
    ///
    /// Completing work (`Done`) is gated by the `Doing` group. `Open` is
    /// only ever entered by creation, which is gated by the `Open` stage.
    #[must_use]
    pub const fn required_stage(self) -> Stage {
        match self {
            Self::Open => Stage::Open,
            Self::ToDo => Stage::ToDo,
            Self::Doing | Self::Done => Stage::Doing,
            Self::Closed => Stage::Done,
        }
    }
}

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "todo" | "to_do" | "todolist" => Ok(Self::ToDo),
            "doing" => Ok(Self::Doing),
            "done" => Ok(Self::Done),
            "closed" | "close" => Ok(Self::Closed),
            _ => Err(ParseTaskStateError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
