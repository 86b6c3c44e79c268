//! Error types for identity value validation.

use thiserror::Error;

/// Errors returned while constructing principal and group values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MembershipDomainError {
    /// The principal name is empty after trimming.
    #[error("principal name must not be empty")]
    EmptyPrincipal,

    /// The principal name exceeds the storage limit.
    #[error("principal name exceeds 100 character limit: {0}")]
    PrincipalTooLong(String),

    /// The group name is empty after trimming.
    #[error("group name must not be empty")]
    EmptyGroupName,

    /// The group name exceeds the storage limit.
    #[error("group name exceeds 10 character limit: {0}")]
    GroupNameTooLong(String),

    /// The group name contains whitespace.
    #[error("group name '{0}' must not contain whitespace")]
    InvalidGroupName(String),
}
