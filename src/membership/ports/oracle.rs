//! Group membership oracle port.

use crate::membership::domain::{GroupName, Principal};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for membership lookups.
pub type MembershipResult<T> = Result<T, MembershipError>;

/// Answers whether a principal belongs to a group.
///
/// Implementations must not special-case identities; overrides are applied
/// by [`crate::membership::services::PolicyMembership`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupMembership: Send + Sync {
    /// Returns `true` when `principal` is a member of `group`.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Persistence`] when the membership source
    /// cannot be queried.
    async fn is_member(&self, principal: &Principal, group: &GroupName)
    -> MembershipResult<bool>;
}

/// Errors returned by membership oracle implementations.
#[derive(Debug, Clone, Error)]
pub enum MembershipError {
    /// Membership source failure.
    #[error("membership lookup failed: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MembershipError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
