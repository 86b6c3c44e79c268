//! Workflow engine services for tasks.

mod notes;
mod workflow;

pub use notes::NoteTemplates;
pub use workflow::{
    CreateTaskRequest, EditTaskRequest, TaskSummary, TaskWorkflowError, TaskWorkflowResult,
    TaskWorkflowService, WorkflowSettings,
};
