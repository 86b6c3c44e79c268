//! Validated application acronym.

use super::ApplicationDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for an acronym, matching the `VARCHAR(50)` column.
const MAX_ACRONYM_LENGTH: usize = 50;

/// Unique, immutable application identifier (for example `DEMO`).
///
/// Acronyms prefix task identifiers, so they are restricted to ASCII
/// alphanumerics, `-` and `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppAcronym(String);

impl AppAcronym {
    /// Creates a validated acronym. The input is trimmed; case is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationDomainError::EmptyAcronym`],
    /// [`ApplicationDomainError::AcronymTooLong`], or
    /// [`ApplicationDomainError::InvalidAcronym`] when validation fails.
    pub fn new(value: impl Into<String>) -> Result<Self, ApplicationDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(ApplicationDomainError::EmptyAcronym);
        }

        if normalized.len() > MAX_ACRONYM_LENGTH {
            return Err(ApplicationDomainError::AcronymTooLong(raw));
        }

        let is_valid = normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !is_valid {
            return Err(ApplicationDomainError::InvalidAcronym(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the acronym as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AppAcronym {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AppAcronym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
