//! Domain model for tasks and their audit trail.
//!
//! Tasks move through a fixed five-state workflow. Every state change and
//! every noted edit prepends an [`AuditNote`], so the trail is newest first
//! and its last entry is always the creation note.

mod change;
mod error;
mod ids;
mod name;
mod note;
mod state;
mod task;

pub use change::{FieldChange, StateChange, TaskEdit};
pub use error::{ParseTaskStateError, TaskDomainError};
pub use ids::{TaskId, TaskNumber};
pub use name::TaskName;
pub use note::AuditNote;
pub use state::TaskState;
pub use task::{PersistedTaskData, Task, TaskDraft};
