//! Stage-to-group permission mapping.

use super::Stage;
use crate::membership::domain::GroupName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Group permitted to perform each stage. `None` blocks the stage entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagePermissions {
    open: Option<GroupName>,
    to_do: Option<GroupName>,
    doing: Option<GroupName>,
    done: Option<GroupName>,
}

impl StagePermissions {
    /// Creates a mapping with every stage unconfigured.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            open: None,
            to_do: None,
            doing: None,
            done: None,
        }
    }

    /// Returns the group configured for `stage`.
    #[must_use]
    pub const fn group_for(&self, stage: Stage) -> Option<&GroupName> {
        match stage {
            Stage::Open => self.open.as_ref(),
            Stage::ToDo => self.to_do.as_ref(),
            Stage::Doing => self.doing.as_ref(),
            Stage::Done => self.done.as_ref(),
        }
    }

    /// Sets or clears the group for `stage`.
    pub fn set(&mut self, stage: Stage, group: Option<GroupName>) {
        let slot = match stage {
            Stage::Open => &mut self.open,
            Stage::ToDo => &mut self.to_do,
            Stage::Doing => &mut self.doing,
            Stage::Done => &mut self.done,
        };
        *slot = group;
    }

    /// Applies every entry of `update`, leaving other stages untouched.
    pub fn apply(&mut self, update: &PermissionUpdate) {
        for (stage, group) in update.entries() {
            self.set(stage, group.cloned());
        }
    }
}

/// Partial permission change. Only the stages present are modified; a stage
/// mapped to `None` is cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionUpdate {
    entries: BTreeMap<Stage, Option<GroupName>>,
}

impl PermissionUpdate {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Permits `group` to perform `stage`.
    #[must_use]
    pub fn permit(mut self, stage: Stage, group: GroupName) -> Self {
        self.entries.insert(stage, Some(group));
        self
    }

    /// Clears the group for `stage`, blocking it.
    #[must_use]
    pub fn clear(mut self, stage: Stage) -> Self {
        self.entries.insert(stage, None);
        self
    }

    /// Returns `true` when no stage is touched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the touched stages in workflow order.
    pub fn entries(&self) -> impl Iterator<Item = (Stage, Option<&GroupName>)> {
        self.entries
            .iter()
            .map(|(stage, group)| (*stage, group.as_ref()))
    }
}
