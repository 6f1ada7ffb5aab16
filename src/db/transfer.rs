//! Import and export of an owner's whole task set.

use super::todos::{insert_todo, now_timestamp, select_all, Todos};
use super::tree;
use crate::libs::error::{TodoError, TodoResult};
use crate::libs::messages::Message;
use crate::libs::normalize::{normalize_project, normalize_tags, normalize_title, parse_optional_date, parse_optional_date_time, require_owner};
use crate::libs::todo::{Priority, Recurrence, Status, Todo, TodoRecord};
use crate::msg_debug;
use rusqlite::params;
use std::collections::HashMap;

const DELETE_OWNER_TODOS: &str = "DELETE FROM todos WHERE owner_id = ?1";

const UPDATE_PARENT: &str = "UPDATE todos SET parent_id = ?3 WHERE owner_id = ?1 AND id = ?2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ImportMode {
    #[default]
    Merge,
    Replace,
}

impl ImportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::Merge => "merge",
            ImportMode::Replace => "replace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    pub imported: usize,
    pub mode: ImportMode,
}

/// Same-batch identity of an imported record: its exported id when present,
/// else its position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SourceKey {
    Id(i64),
    Index(usize),
}

struct Prepared {
    key: SourceKey,
    parent: Option<i64>,
    todo: Todo,
}

fn invalid(index: usize, error: impl ToString) -> TodoError {
    TodoError::InvalidRecord {
        index,
        reason: error.to_string(),
    }
}

/// Validates one record into an unsaved task (id 0, no parent yet).
fn prepare_record(index: usize, record: &TodoRecord, imported_at: &str) -> TodoResult<Prepared> {
    let title = normalize_title(&record.title).map_err(|e| invalid(index, e))?;
    let project = normalize_project(record.project.as_deref()).map_err(|e| invalid(index, e))?;
    let due_date = parse_optional_date(record.due_date.as_deref()).map_err(|e| invalid(index, e))?;
    let reminder_at = parse_optional_date_time(record.reminder_at.as_deref()).map_err(|e| invalid(index, e))?;
    let recurrence = record.recurrence.as_deref().map(Recurrence::normalize).unwrap_or_default();
    if recurrence.is_enabled() && due_date.is_none() {
        return Err(invalid(index, TodoError::RecurrenceWithoutDueDate));
    }

    let created_at = record
        .created_at
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(imported_at)
        .to_string();
    let completed_at = if record.completed {
        Some(
            record
                .completed_at
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or(imported_at)
                .to_string(),
        )
    } else {
        None
    };

    Ok(Prepared {
        key: record.id.filter(|id| *id > 0).map(SourceKey::Id).unwrap_or(SourceKey::Index(index)),
        parent: record.parent_id.filter(|id| *id > 0),
        todo: Todo {
            id: 0,
            title,
            project,
            due_date,
            reminder_at,
            parent_id: None,
            priority: record.priority.as_deref().map(Priority::normalize).unwrap_or_default(),
            status: record.status.as_deref().map(Status::normalize).unwrap_or_default(),
            recurrence,
            tags: normalize_tags(&record.tags),
            completed: record.completed,
            created_at,
            completed_at,
        },
    })
}

/// True when pointing `child` at `parent` would loop through the parent
/// links assigned so far in this import.
fn closes_cycle(assigned: &HashMap<i64, i64>, child: i64, parent: i64) -> bool {
    let mut cursor = Some(parent);
    let mut steps = 0usize;
    while let Some(current) = cursor {
        if current == child || steps > assigned.len() {
            return true;
        }
        steps += 1;
        cursor = assigned.get(&current).copied();
    }
    false
}

impl Todos {
    /// Every task of the owner as storage-independent records, oldest first.
    pub fn export(&self, owner_id: i64) -> TodoResult<Vec<TodoRecord>> {
        let owner_id = require_owner(owner_id)?;
        self.read(|conn| Ok(select_all(conn, owner_id)?.iter().map(TodoRecord::from).collect()))
    }

    /// Imports `records` for the owner as one undo step.
    ///
    /// All records are validated before anything is written. Each record gets
    /// a fresh id; its exported id (or position) only serves to remap parent
    /// references within this import. Unresolved, self-referencing and cyclic
    /// parent references are dropped. Completed records are stored as-is and
    /// never spawn recurring occurrences.
    pub fn import(&self, owner_id: i64, records: &[TodoRecord], mode: ImportMode) -> TodoResult<ImportOutcome> {
        let owner_id = require_owner(owner_id)?;
        let imported_at = now_timestamp();
        let prepared = records
            .iter()
            .enumerate()
            .map(|(index, record)| prepare_record(index, record, &imported_at))
            .collect::<TodoResult<Vec<_>>>()?;

        if prepared.is_empty() && mode == ImportMode::Merge {
            return Ok(ImportOutcome { imported: 0, mode });
        }

        self.write(|tx| {
            self.snapshot(tx, owner_id)?;
            if mode == ImportMode::Replace {
                tx.execute(DELETE_OWNER_TODOS, params![owner_id])?;
            }

            let mut new_ids: HashMap<SourceKey, i64> = HashMap::new();
            let mut inserted = Vec::with_capacity(prepared.len());
            for item in &prepared {
                let id = insert_todo(tx, owner_id, &item.todo)?;
                new_ids.entry(item.key).or_insert(id);
                inserted.push(id);
            }

            let mut assigned: HashMap<i64, i64> = HashMap::new();
            for (index, (item, id)) in prepared.iter().zip(&inserted).enumerate() {
                let Some(source_parent) = item.parent else {
                    continue;
                };
                match new_ids.get(&SourceKey::Id(source_parent)).copied() {
                    Some(parent) if parent != *id && !closes_cycle(&assigned, *id, parent) => {
                        tx.execute(UPDATE_PARENT, params![owner_id, id, parent])?;
                        assigned.insert(*id, parent);
                    }
                    _ => {
                        msg_debug!(Message::ImportParentDropped(index));
                    }
                }
            }

            tree::clear_orphan_parents(tx, owner_id)?;
            Ok(ImportOutcome {
                imported: inserted.len(),
                mode,
            })
        })
    }
}
