//! Configurable administrator override.
//!
//! One configured principal may bypass group checks, either for
//! administration only or for workflow transitions as well. The bypass is
//! applied by a decorator, so the workflow engine only ever sees a
//! membership answer.

use crate::membership::{
    domain::{GroupName, Principal},
    ports::{GroupMembership, MembershipResult},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// How far the configured override principal bypasses group checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminOverrideScope {
    /// No bypass.
    #[default]
    None,
    /// Bypass for administration checks only.
    Administration,
    /// Bypass for administration checks and every workflow membership check.
    Workflow,
}

/// Administrator override policy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdminOverride {
    principal: Option<Principal>,
    scope: AdminOverrideScope,
}

impl AdminOverride {
    /// Returns a policy that never bypasses group checks.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            principal: None,
            scope: AdminOverrideScope::None,
        }
    }

    /// Creates a policy granting `principal` a bypass within `scope`.
    #[must_use]
    pub const fn new(principal: Principal, scope: AdminOverrideScope) -> Self {
        Self {
            principal: Some(principal),
            scope,
        }
    }

    /// Returns the override principal, if any.
    #[must_use]
    pub const fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Returns the override scope.
    #[must_use]
    pub const fn scope(&self) -> AdminOverrideScope {
        self.scope
    }

    /// Returns `true` when `principal` bypasses administration checks.
    #[must_use]
    pub fn covers_administration(&self, principal: &Principal) -> bool {
        self.scope != AdminOverrideScope::None && self.matches(principal)
    }

    /// Returns `true` when `principal` bypasses workflow membership checks.
    #[must_use]
    pub fn covers_workflow(&self, principal: &Principal) -> bool {
        self.scope == AdminOverrideScope::Workflow && self.matches(principal)
    }

    fn matches(&self, principal: &Principal) -> bool {
        self.principal.as_ref() == Some(principal)
    }
}

/// Membership oracle decorator applying an [`AdminOverride`].
#[derive(Debug)]
pub struct PolicyMembership<M> {
    inner: Arc<M>,
    policy: AdminOverride,
}

impl<M> Clone for PolicyMembership<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            policy: self.policy.clone(),
        }
    }
}

impl<M> PolicyMembership<M>
where
    M: GroupMembership,
{
    /// Wraps `inner` with `policy`.
    #[must_use]
    pub const fn new(inner: Arc<M>, policy: AdminOverride) -> Self {
        Self { inner, policy }
    }

    /// Returns the applied policy.
    #[must_use]
    pub const fn policy(&self) -> &AdminOverride {
        &self.policy
    }

    /// Returns `true` when `principal` may perform administration, either
    /// through the override or membership of the `admin` group.
    ///
    /// # Errors
    ///
    /// Propagates failures from the wrapped oracle.
    pub async fn is_administrator(&self, principal: &Principal) -> MembershipResult<bool> {
        if self.policy.covers_administration(principal) {
            debug!(principal = %principal, "administration granted by override");
            return Ok(true);
        }
        self.inner.is_member(principal, &GroupName::admin()).await
    }
}

#[async_trait]
impl<M> GroupMembership for PolicyMembership<M>
where
    M: GroupMembership,
{
    async fn is_member(
        &self,
        principal: &Principal,
        group: &GroupName,
    ) -> MembershipResult<bool> {
        if self.policy.covers_workflow(principal) {
            debug!(principal = %principal, group = %group, "membership granted by override");
            return Ok(true);
        }
        self.inner.is_member(principal, group).await
    }
}
