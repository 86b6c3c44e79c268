//! In-memory group directory for tests and embedding.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use crate::membership::{
    domain::{GroupName, Principal},
    ports::{GroupMembership, MembershipError, MembershipResult},
};

/// Thread-safe in-memory mapping from principals to their groups.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGroupDirectory {
    state: Arc<RwLock<HashMap<Principal, BTreeSet<GroupName>>>>,
}

impl InMemoryGroupDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `principal` to `group`. Adding an existing membership is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Persistence`] when the lock is poisoned.
    pub fn add_member(&self, principal: Principal, group: GroupName) -> MembershipResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| MembershipError::persistence(std::io::Error::other(err.to_string())))?;
        state.entry(principal).or_default().insert(group);
        Ok(())
    }

    /// Removes `principal` from `group`.
    ///
    /// Returns `true` when a membership was removed.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Persistence`] when the lock is poisoned.
    pub fn remove_member(&self, principal: &Principal, group: &GroupName) -> MembershipResult<bool> {
        let mut state = self
            .state
            .write()
            .map_err(|err| MembershipError::persistence(std::io::Error::other(err.to_string())))?;
        let Some(groups) = state.get_mut(principal) else {
            return Ok(false);
        };
        let removed = groups.remove(group);
        if groups.is_empty() {
            state.remove(principal);
        }
        Ok(removed)
    }

    /// Returns the groups `principal` belongs to, in name order.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Persistence`] when the lock is poisoned.
    pub fn groups_of(&self, principal: &Principal) -> MembershipResult<Vec<GroupName>> {
        let state = self
            .state
            .read()
            .map_err(|err| MembershipError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state
            .get(principal)
            .map(|groups| groups.iter().cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl GroupMembership for InMemoryGroupDirectory {
    async fn is_member(
        &self,
        principal: &Principal,
        group: &GroupName,
    ) -> MembershipResult<bool> {
        let state = self
            .state
            .read()
            .map_err(|err| MembershipError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state
            .get(principal)
            .is_some_and(|groups| groups.contains(group)))
    }
}
