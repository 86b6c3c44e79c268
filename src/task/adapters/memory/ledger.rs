//! In-memory task ledger.
//!
//! All mutations run under the state write lock, so a transition's expected
//! state check and its write cannot interleave with another transition.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::application::domain::AppAcronym;
use crate::task::{
    domain::{StateChange, Task, TaskEdit, TaskId},
    ports::{TaskLedger, TaskLedgerError, TaskLedgerResult},
};

/// Thread-safe in-memory task ledger.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskLedger {
    state: Arc<RwLock<InMemoryLedgerState>>,
}

#[derive(Debug, Default)]
struct InMemoryLedgerState {
    tasks: HashMap<TaskId, Task>,
    application_index: HashMap<AppAcronym, Vec<TaskId>>,
}

impl InMemoryTaskLedger {
    /// Creates an empty in-memory ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn mutate(
        &self,
        id: &TaskId,
        f: impl FnOnce(&mut Task) -> TaskLedgerResult<()>,
    ) -> TaskLedgerResult<Task> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .tasks
            .get_mut(id)
            .ok_or_else(|| TaskLedgerError::NotFound(id.clone()))?;
        // Work on a copy so a rejected change leaves the stored task intact.
        let mut candidate = stored.clone();
        f(&mut candidate)?;
        *stored = candidate.clone();
        Ok(candidate)
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskLedgerError {
    TaskLedgerError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskLedger for InMemoryTaskLedger {
    async fn create_with_id(&self, task: &Task) -> TaskLedgerResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(task.id()) {
            return Err(TaskLedgerError::DuplicateTask(task.id().clone()));
        }
        state
            .application_index
            .entry(task.id().application().clone())
            .or_default()
            .push(task.id().clone());
        state.tasks.insert(task.id().clone(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &TaskId) -> TaskLedgerResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(id).cloned())
    }

    async fn list_by_application(&self, application: &AppAcronym) -> TaskLedgerResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut tasks: Vec<Task> = state
            .application_index
            .get(application)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.tasks.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        tasks.sort_by(|left, right| right.id().number().cmp(&left.id().number()));
        Ok(tasks)
    }

    async fn append_note_and_set_state(
        &self,
        id: &TaskId,
        change: &StateChange,
    ) -> TaskLedgerResult<Task> {
        self.mutate(id, |task| Ok(task.apply_state_change(change)?))
    }

    async fn update_fields(&self, id: &TaskId, edit: &TaskEdit) -> TaskLedgerResult<Task> {
        self.mutate(id, |task| Ok(task.apply_edit(edit)?))
    }
}
