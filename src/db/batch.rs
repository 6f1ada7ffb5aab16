//! Multi-field updates across a set of tasks.

use super::todos::{now_timestamp, select_by_id, spawn_next_occurrence, update_todo, Todos};
use super::tree::{completion_eligible, ParentIndex};
use crate::libs::error::{TodoError, TodoResult};
use crate::libs::normalize::{normalize_project, normalize_tags, require_owner};
use crate::libs::todo::{Priority, Recurrence, Status, Todo};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::HashSet;

pub const MAX_BATCH_SIZE: usize = 500;

/// Fields a batch may set. `None` leaves a field alone; `Some(None)` clears
/// a nullable one.
#[derive(Debug, Clone, Default)]
pub struct BatchUpdate {
    pub completed: Option<bool>,
    pub project: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
    pub reminder_at: Option<Option<NaiveDateTime>>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub recurrence: Option<Recurrence>,
    pub tags: Option<Vec<String>>,
}

impl BatchUpdate {
    pub fn is_empty(&self) -> bool {
        self.completed.is_none() && !self.has_field_changes()
    }

    fn has_field_changes(&self) -> bool {
        self.project.is_some()
            || self.due_date.is_some()
            || self.reminder_at.is_some()
            || self.priority.is_some()
            || self.status.is_some()
            || self.recurrence.is_some()
            || self.tags.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub count: usize,
    pub ids: Vec<i64>,
    pub skipped: Vec<i64>,
}

/// Positive ids in first-seen order with duplicates removed.
fn dedupe_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| *id > 0 && seen.insert(*id)).collect()
}

impl Todos {
    /// Applies `update` to every listed task of the owner.
    ///
    /// Completion is limited to the ids [`completion_eligible`] keeps, but
    /// every other requested field still applies to the excluded ids. Tasks
    /// that newly become complete spawn their next occurrence once all rows
    /// are written. Unknown ids and ids left without any applied change are
    /// reported as skipped.
    pub fn batch_update(&self, owner_id: i64, ids: &[i64], update: &BatchUpdate) -> TodoResult<BatchOutcome> {
        let owner_id = require_owner(owner_id)?;
        if update.is_empty() {
            return Err(TodoError::EmptyBatch);
        }

        let requested = dedupe_ids(ids);
        if requested.len() > MAX_BATCH_SIZE {
            return Err(TodoError::BatchTooLarge {
                max: MAX_BATCH_SIZE,
                got: requested.len(),
            });
        }
        if update.recurrence.is_some_and(|r| r.is_enabled()) && !matches!(update.due_date, Some(Some(_))) {
            return Err(TodoError::RecurrenceWithoutDueDate);
        }
        let project = update.project.as_deref().map(|p| normalize_project(Some(p))).transpose()?;
        let tags = update.tags.as_ref().map(normalize_tags);

        self.write(|tx| {
            let index = ParentIndex::load(tx, owner_id)?;
            let targets: Vec<i64> = requested.iter().copied().filter(|id| index.contains(*id)).collect();
            if targets.is_empty() {
                return Ok(BatchOutcome {
                    count: 0,
                    ids: Vec::new(),
                    skipped: requested.clone(),
                });
            }

            let eligible = match update.completed {
                Some(true) => completion_eligible(&index, &targets),
                _ => Default::default(),
            };
            if !update.has_field_changes() && update.completed == Some(true) && eligible.is_empty() {
                return Ok(BatchOutcome {
                    count: 0,
                    ids: Vec::new(),
                    skipped: requested.clone(),
                });
            }

            self.snapshot(tx, owner_id)?;

            let mut changed = Vec::new();
            let mut newly_completed: Vec<Todo> = Vec::new();
            for id in &targets {
                let Some(mut todo) = select_by_id(tx, owner_id, *id)? else {
                    continue;
                };
                let was_completed = todo.completed;
                let mut applied = update.has_field_changes();

                if let Some(project) = &project {
                    todo.project = project.clone();
                }
                if let Some(due_date) = update.due_date {
                    todo.due_date = due_date;
                }
                if let Some(reminder_at) = update.reminder_at {
                    todo.reminder_at = reminder_at;
                }
                if let Some(priority) = update.priority {
                    todo.priority = priority;
                }
                if let Some(status) = update.status {
                    todo.status = status;
                }
                if let Some(recurrence) = update.recurrence {
                    todo.recurrence = recurrence;
                }
                if let Some(tags) = &tags {
                    todo.tags = tags.clone();
                }
                // Clearing the due date of a recurring task ends the recurrence.
                if todo.recurrence.is_enabled() && todo.due_date.is_none() {
                    todo.recurrence = Recurrence::None;
                }

                match update.completed {
                    Some(true) if eligible.contains(id) => {
                        applied = true;
                        if !was_completed {
                            todo.completed = true;
                            todo.completed_at = Some(now_timestamp());
                        }
                    }
                    Some(false) => {
                        applied = true;
                        todo.completed = false;
                        todo.completed_at = None;
                    }
                    _ => {}
                }

                if !applied {
                    continue;
                }
                update_todo(tx, owner_id, &todo)?;
                changed.push(*id);
                if todo.completed && !was_completed {
                    newly_completed.push(todo);
                }
            }

            for todo in &newly_completed {
                spawn_next_occurrence(tx, owner_id, todo)?;
            }

            let changed_set: HashSet<i64> = changed.iter().copied().collect();
            let skipped = requested.iter().copied().filter(|id| !changed_set.contains(id)).collect();

            Ok(BatchOutcome {
                count: changed.len(),
                ids: changed,
                skipped,
            })
        })
    }
}
