//! Validated user-group name.

use super::MembershipDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a group name, matching the `VARCHAR(10)` column.
const MAX_GROUP_LENGTH: usize = 10;

/// Named collection of principals; membership is the unit of authorization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupName(String);

impl GroupName {
    /// Group whose members are treated as administrators.
    pub const ADMIN: &'static str = "admin";

    /// Creates a validated group name.
    ///
    /// The input is trimmed; case is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipDomainError::EmptyGroupName`] when the value is
    /// blank, [`MembershipDomainError::GroupNameTooLong`] when it exceeds 10
    /// characters, or [`MembershipDomainError::InvalidGroupName`] when it
    /// contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, MembershipDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(MembershipDomainError::EmptyGroupName);
        }

        if normalized.chars().count() > MAX_GROUP_LENGTH {
            return Err(MembershipDomainError::GroupNameTooLong(raw));
        }

        if normalized.chars().any(char::is_whitespace) {
            return Err(MembershipDomainError::InvalidGroupName(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the built-in administrator group.
    #[must_use]
    pub fn admin() -> Self {
        Self(Self::ADMIN.to_owned())
    }

    /// Returns the group name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GroupName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
