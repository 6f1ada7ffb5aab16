//! Typed failures raised by the task store.
//!
//! Not-found conditions are deliberately absent: operating on an id the owner
//! does not have is a silent no-op (`None` or a zero count), and the caller
//! maps absence to its own response.

use thiserror::Error;

pub type TodoResult<T> = std::result::Result<T, TodoError>;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("owner is required (got {0})")]
    OwnerRequired(i64),

    #[error("task {0} cannot be its own parent")]
    SelfParent(i64),

    #[error("setting parent {parent_id} on task {task_id} would create a cycle")]
    ParentCycle { task_id: i64, parent_id: i64 },

    #[error("parent task {0} does not exist")]
    ParentNotFound(i64),

    #[error("parent task {0} is already completed")]
    ParentCompleted(i64),

    #[error("a due date is required when recurrence is enabled")]
    RecurrenceWithoutDueDate,

    #[error("task {0} still has active child tasks")]
    ActiveChildren(i64),

    #[error("title is required and cannot exceed {max} characters")]
    InvalidTitle { max: usize },

    #[error("project cannot exceed {max} characters")]
    InvalidProject { max: usize },

    #[error("'{0}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("'{0}' is not a valid date-time (expected YYYY-MM-DDTHH:mm)")]
    InvalidDateTime(String),

    #[error("at least one field must be set for a batch update")]
    EmptyBatch,

    #[error("batch cannot target more than {max} tasks (got {got})")]
    BatchTooLarge { max: usize, got: usize },

    #[error("items[{index}]: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("no undo available")]
    NoUndoAvailable,

    #[error(transparent)]
    Storage(#[from] rusqlite::Error),

    #[error("undo snapshot could not be encoded: {0}")]
    Snapshot(#[from] serde_json::Error),
}
