//! Authenticated principal identity.

use super::MembershipDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a principal name, matching the `VARCHAR(100)` column.
const MAX_PRINCIPAL_LENGTH: usize = 100;

/// Name of an already-authenticated acting user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Creates a validated principal from a trimmed user name.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipDomainError::EmptyPrincipal`] when the value is
    /// blank or [`MembershipDomainError::PrincipalTooLong`] when it exceeds
    /// 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, MembershipDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(MembershipDomainError::EmptyPrincipal);
        }

        if normalized.chars().count() > MAX_PRINCIPAL_LENGTH {
            return Err(MembershipDomainError::PrincipalTooLong(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the principal name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Principal {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
