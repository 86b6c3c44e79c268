//! Validated plan name.

use super::PlanDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_PLAN_NAME_LENGTH: usize = 100;

/// Plan name, unique within its application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanName(String);

impl PlanName {
    /// Creates a validated plan name. The input is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError::EmptyName`] for blank input or
    /// [`PlanDomainError::NameTooLong`] beyond 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, PlanDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(PlanDomainError::EmptyName);
        }
        if normalized.chars().count() > MAX_PLAN_NAME_LENGTH {
            return Err(PlanDomainError::NameTooLong(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PlanName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PlanName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
