//! Task identifiers derived from the owning application's running number.

use super::TaskDomainError;
use crate::application::domain::AppAcronym;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

/// Positive, per-application task number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskNumber(NonZeroU64);

impl TaskNumber {
    /// Creates a task number.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTaskNumber`] for zero.
    pub fn new(value: u64) -> Result<Self, TaskDomainError> {
        NonZeroU64::new(value)
            .map(Self)
            .ok_or(TaskDomainError::InvalidTaskNumber)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for TaskNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-readable task identifier, rendered as `{acronym}_{number}`.
///
/// Acronyms may themselves contain `_`, so parsing splits on the last one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId {
    application: AppAcronym,
    number: TaskNumber,
}

impl TaskId {
    /// Composes an identifier from its parts.
    #[must_use]
    pub const fn compose(application: AppAcronym, number: TaskNumber) -> Self {
        Self {
            application,
            number,
        }
    }

    /// Parses a rendered identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTaskId`] when the value has no `_`
    /// separator, an invalid acronym, or a number that is not positive.
    pub fn parse(value: &str) -> Result<Self, TaskDomainError> {
        let invalid = || TaskDomainError::InvalidTaskId(value.to_owned());
        let (acronym, number) = value.trim().rsplit_once('_').ok_or_else(invalid)?;
        if acronym.trim() != acronym {
            return Err(invalid());
        }
        let application = AppAcronym::new(acronym).map_err(|_| invalid())?;
        let parsed_number = number
            .parse::<u64>()
            .ok()
            .and_then(|n| TaskNumber::new(n).ok())
            .ok_or_else(invalid)?;
        Ok(Self::compose(application, parsed_number))
    }

    /// Returns the owning application.
    #[must_use]
    pub const fn application(&self) -> &AppAcronym {
        &self.application
    }

    /// Returns the per-application number.
    #[must_use]
    pub const fn number(&self) -> TaskNumber {
        self.number
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.application, self.number)
    }
}

impl TryFrom<String> for TaskId {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TaskId> for String {
    fn from(value: TaskId) -> Self {
        value.to_string()
    }
}
