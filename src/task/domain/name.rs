//! Validated task name.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_TASK_NAME_LENGTH: usize = 255;

/// Required task title, fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskName(String);

impl TaskName {
    /// Creates a validated task name. The input is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskName`] for blank input or
    /// [`TaskDomainError::TaskNameTooLong`] beyond 255 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TaskDomainError::EmptyTaskName);
        }
        if normalized.chars().count() > MAX_TASK_NAME_LENGTH {
            return Err(TaskDomainError::TaskNameTooLong);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
