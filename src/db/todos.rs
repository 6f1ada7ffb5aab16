//! The per-owner task store.
//!
//! [`Todos`] is a cheap-to-clone handle over one SQLite connection. Every
//! operation takes the owner id explicitly and never reads or writes rows of
//! another owner. Mutations run inside one `IMMEDIATE` transaction that
//! first records an undo snapshot and then applies the change, so a failure
//! at any point leaves both the tasks and the undo history untouched.
//!
//! ```rust
//! use todo_harbor::db::{db::Db, todos::Todos};
//! use todo_harbor::libs::todo::TodoDraft;
//!
//! let todos = Todos::open(Db::open_in_memory()?, 20);
//! let parent = todos.create(1, &TodoDraft::new("Plan release"))?;
//! let child = todos.create(1, &TodoDraft { parent_id: Some(parent.id), ..TodoDraft::new("Write notes") })?;
//! assert_eq!(child.parent_id, Some(parent.id));
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::db::Db;
use super::tree::{self, ParentIndex};
use super::undo;
use crate::libs::config::Config;
use crate::libs::error::{TodoError, TodoResult};
use crate::libs::messages::Message;
use crate::libs::normalize::{
    format_date, format_date_time, normalize_project, normalize_tags, normalize_title, parse_tag_list, require_owner, tags_to_json,
    DATE_FORMAT, DATE_TIME_FORMAT,
};
use crate::libs::recurrence::next_occurrence;
use crate::libs::todo::{Priority, ProjectCount, Recurrence, Status, Todo, TodoDraft, TodoPatch, TodoStats};
use crate::msg_debug;
use chrono::{NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::sync::Arc;

pub(crate) const TODO_COLUMNS: &str =
    "id, title, project, due_date, reminder_at, parent_id, priority, status, recurrence, tags, completed, created_at, completed_at";

const SELECT_BY_ID: &str = "SELECT id, title, project, due_date, reminder_at, parent_id, priority, status, recurrence, tags, completed, created_at, completed_at
    FROM todos WHERE owner_id = ?1 AND id = ?2";

const SELECT_ALL_BY_OWNER: &str = "SELECT id, title, project, due_date, reminder_at, parent_id, priority, status, recurrence, tags, completed, created_at, completed_at
    FROM todos WHERE owner_id = ?1 ORDER BY id ASC";

const SELECT_PARENT_CANDIDATES: &str = "SELECT id, title, project, due_date, reminder_at, parent_id, priority, status, recurrence, tags, completed, created_at, completed_at
    FROM todos WHERE owner_id = ?1 AND completed = 0 ORDER BY id DESC";

const INSERT_TODO: &str = "INSERT INTO todos
    (owner_id, title, project, due_date, reminder_at, parent_id, priority, status, recurrence, tags, completed, created_at, completed_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)";

const INSERT_TODO_WITH_ID: &str = "INSERT INTO todos
    (id, owner_id, title, project, due_date, reminder_at, parent_id, priority, status, recurrence, tags, completed, created_at, completed_at)
    VALUES (?14, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)";

const UPDATE_TODO: &str = "UPDATE todos SET
    title = ?3, project = ?4, due_date = ?5, reminder_at = ?6, parent_id = ?7, priority = ?8,
    status = ?9, recurrence = ?10, tags = ?11, completed = ?12, completed_at = ?13
    WHERE owner_id = ?1 AND id = ?2";

const UPDATE_COMPLETION: &str = "UPDATE todos SET completed = ?3, completed_at = ?4 WHERE owner_id = ?1 AND id = ?2";

const DELETE_BY_ID: &str = "DELETE FROM todos WHERE owner_id = ?1 AND id = ?2";

const DELETE_COMPLETED: &str = "DELETE FROM todos WHERE owner_id = ?1 AND completed = 1";

const COUNT_COMPLETED: &str = "SELECT COUNT(*) FROM todos WHERE owner_id = ?1 AND completed = 1";

const SELECT_STATS: &str = "SELECT COUNT(*), COALESCE(SUM(CASE WHEN completed = 1 THEN 1 ELSE 0 END), 0)
    FROM todos WHERE owner_id = ?1";

const SELECT_PROJECTS: &str = "SELECT project, COUNT(*) FROM todos WHERE owner_id = ?1
    GROUP BY project ORDER BY project COLLATE NOCASE ASC";

const CLAIM_UNOWNED: &str = "UPDATE todos SET owner_id = ?1 WHERE owner_id IS NULL";

/// Shared handle to the task store.
#[derive(Clone)]
pub struct Todos {
    conn: Arc<Mutex<Connection>>,
    undo_limit: usize,
}

impl Todos {
    /// Opens the configured database with the configured undo limit.
    pub fn new() -> anyhow::Result<Self> {
        let config = Config::read()?;
        let db = Db::open(config.db_path()?)?;
        Ok(Self::open(db, config.undo_history_limit))
    }

    /// Wraps an already migrated database. `undo_limit` is raised to at least 1.
    pub fn open(db: Db, undo_limit: usize) -> Self {
        Todos {
            conn: Arc::new(Mutex::new(db.conn)),
            undo_limit: undo_limit.max(1),
        }
    }

    pub fn undo_limit(&self) -> usize {
        self.undo_limit
    }

    pub(crate) fn read<T>(&self, f: impl FnOnce(&Connection) -> TodoResult<T>) -> TodoResult<T> {
        let conn = self.conn.lock();
        f(&conn)
    }

    /// Runs `f` in one immediate transaction, committed only when `f` succeeds.
    pub(crate) fn write<T>(&self, f: impl FnOnce(&Transaction) -> TodoResult<T>) -> TodoResult<T> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Records the owner's current state as the newest undo step.
    pub(crate) fn snapshot(&self, conn: &Connection, owner_id: i64) -> TodoResult<()> {
        undo::push_snapshot(conn, owner_id, self.undo_limit)
    }

    pub fn get(&self, owner_id: i64, id: i64) -> TodoResult<Option<Todo>> {
        let owner_id = require_owner(owner_id)?;
        self.read(|conn| Ok(select_by_id(conn, owner_id, id)?))
    }

    pub fn create(&self, owner_id: i64, draft: &TodoDraft) -> TodoResult<Todo> {
        let owner_id = require_owner(owner_id)?;
        let todo = prepare_draft(&draft.title, draft)?;

        self.write(|tx| {
            if let Some(parent_id) = todo.parent_id {
                tree::validate_parent(tx, owner_id, None, parent_id)?;
            }
            self.snapshot(tx, owner_id)?;
            let id = insert_todo(tx, owner_id, &todo)?;
            Ok(Todo { id, ..todo.clone() })
        })
    }

    /// Creates one task per non-blank title, all sharing `template`'s
    /// metadata. One undo step covers the whole call; nothing happens when
    /// every title is blank.
    pub fn create_bulk<S: AsRef<str>>(&self, owner_id: i64, titles: &[S], template: &TodoDraft) -> TodoResult<Vec<Todo>> {
        let owner_id = require_owner(owner_id)?;
        let prepared = titles
            .iter()
            .map(AsRef::<str>::as_ref)
            .filter(|title| !title.trim().is_empty())
            .map(|title| prepare_draft(title, template))
            .collect::<TodoResult<Vec<_>>>()?;

        if prepared.is_empty() {
            return Ok(Vec::new());
        }

        self.write(|tx| {
            if let Some(parent_id) = template.parent_id {
                tree::validate_parent(tx, owner_id, None, parent_id)?;
            }
            self.snapshot(tx, owner_id)?;

            let mut created = Vec::with_capacity(prepared.len());
            for todo in &prepared {
                let id = insert_todo(tx, owner_id, todo)?;
                created.push(Todo { id, ..todo.clone() });
            }
            Ok(created)
        })
    }

    /// Applies `patch` to one task. `Ok(None)` when the owner has no such task.
    ///
    /// The parent is validated only when the patch actually moves the task.
    pub fn update(&self, owner_id: i64, id: i64, patch: &TodoPatch) -> TodoResult<Option<Todo>> {
        let owner_id = require_owner(owner_id)?;

        self.write(|tx| {
            let Some(existing) = select_by_id(tx, owner_id, id)? else {
                return Ok(None);
            };
            if patch.is_empty() {
                return Ok(Some(existing));
            }

            let mut todo = existing.clone();
            if let Some(title) = &patch.title {
                todo.title = normalize_title(title)?;
            }
            if let Some(project) = &patch.project {
                todo.project = normalize_project(Some(project))?;
            }
            if let Some(due_date) = patch.due_date {
                todo.due_date = due_date;
            }
            if let Some(reminder_at) = patch.reminder_at {
                todo.reminder_at = reminder_at;
            }
            if let Some(priority) = patch.priority {
                todo.priority = priority;
            }
            if let Some(status) = patch.status {
                todo.status = status;
            }
            if let Some(recurrence) = patch.recurrence {
                todo.recurrence = recurrence;
            }
            if let Some(tags) = &patch.tags {
                todo.tags = normalize_tags(tags);
            }
            if let Some(parent_id) = patch.parent_id {
                if parent_id != existing.parent_id {
                    if let Some(parent_id) = parent_id {
                        tree::validate_parent(tx, owner_id, Some(id), parent_id)?;
                    }
                }
                todo.parent_id = parent_id;
            }
            if todo.recurrence.is_enabled() && todo.due_date.is_none() {
                return Err(TodoError::RecurrenceWithoutDueDate);
            }

            self.snapshot(tx, owner_id)?;
            update_todo(tx, owner_id, &todo)?;
            Ok(Some(todo))
        })
    }

    /// Flips completion of one task. `Ok(None)` when the owner has no such task.
    ///
    /// Completing is refused while the task has active children. Completing
    /// a recurring task spawns its next occurrence in the same transaction.
    pub fn toggle(&self, owner_id: i64, id: i64) -> TodoResult<Option<Todo>> {
        let owner_id = require_owner(owner_id)?;

        self.write(|tx| {
            let Some(mut todo) = select_by_id(tx, owner_id, id)? else {
                return Ok(None);
            };

            if todo.completed {
                self.snapshot(tx, owner_id)?;
                todo.completed = false;
                todo.completed_at = None;
                set_completion(tx, owner_id, &todo)?;
                return Ok(Some(todo));
            }

            if tree::has_active_children(tx, owner_id, id)? {
                return Err(TodoError::ActiveChildren(id));
            }

            self.snapshot(tx, owner_id)?;
            todo.completed = true;
            todo.completed_at = Some(now_timestamp());
            set_completion(tx, owner_id, &todo)?;
            spawn_next_occurrence(tx, owner_id, &todo)?;
            Ok(Some(todo))
        })
    }

    pub fn has_active_children(&self, owner_id: i64, id: i64) -> TodoResult<bool> {
        let owner_id = require_owner(owner_id)?;
        self.read(|conn| Ok(tree::has_active_children(conn, owner_id, id)?))
    }

    /// Deletes `root_id` and every descendant. Returns the number removed,
    /// 0 when the root does not exist.
    pub fn delete_tree(&self, owner_id: i64, root_id: i64) -> TodoResult<usize> {
        let owner_id = require_owner(owner_id)?;

        self.write(|tx| {
            let ids = ParentIndex::load(tx, owner_id)?.subtree(root_id);
            if ids.is_empty() {
                return Ok(0);
            }

            self.snapshot(tx, owner_id)?;
            let mut stmt = tx.prepare(DELETE_BY_ID)?;
            for id in &ids {
                stmt.execute(params![owner_id, id])?;
            }
            tree::clear_orphan_parents(tx, owner_id)?;
            Ok(ids.len())
        })
    }

    /// Deletes every completed task of the owner. Children of removed tasks
    /// become roots.
    pub fn clear_completed(&self, owner_id: i64) -> TodoResult<usize> {
        let owner_id = require_owner(owner_id)?;

        self.write(|tx| {
            let completed: i64 = tx.query_row(COUNT_COMPLETED, params![owner_id], |row| row.get(0))?;
            if completed == 0 {
                return Ok(0);
            }

            self.snapshot(tx, owner_id)?;
            let removed = tx.execute(DELETE_COMPLETED, params![owner_id])?;
            tree::clear_orphan_parents(tx, owner_id)?;
            Ok(removed)
        })
    }

    pub fn stats(&self, owner_id: i64) -> TodoResult<TodoStats> {
        let owner_id = require_owner(owner_id)?;
        self.read(|conn| {
            let (total, completed): (i64, i64) = conn.query_row(SELECT_STATS, params![owner_id], |row| Ok((row.get(0)?, row.get(1)?)))?;
            let total = total.max(0) as usize;
            let completed = completed.max(0) as usize;
            Ok(TodoStats {
                total,
                completed,
                active: total - completed,
            })
        })
    }

    pub fn projects(&self, owner_id: i64) -> TodoResult<Vec<ProjectCount>> {
        let owner_id = require_owner(owner_id)?;
        self.read(|conn| {
            let mut stmt = conn.prepare(SELECT_PROJECTS)?;
            let projects = stmt
                .query_map(params![owner_id], |row| {
                    Ok(ProjectCount {
                        name: row.get(0)?,
                        count: row.get::<_, i64>(1)?.max(0) as usize,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(projects)
        })
    }

    /// Active tasks that can be offered as parents, newest first.
    pub fn parent_candidates(&self, owner_id: i64) -> TodoResult<Vec<Todo>> {
        let owner_id = require_owner(owner_id)?;
        self.read(|conn| {
            let mut stmt = conn.prepare(SELECT_PARENT_CANDIDATES)?;
            let todos = stmt.query_map(params![owner_id], row_to_todo)?.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(todos)
        })
    }

    /// Assigns rows written before tasks had owners to `owner_id`.
    pub fn claim_unowned(&self, owner_id: i64) -> TodoResult<usize> {
        let owner_id = require_owner(owner_id)?;
        self.write(|tx| {
            let claimed = tx.execute(CLAIM_UNOWNED, params![owner_id])?;
            if claimed > 0 {
                msg_debug!(Message::UnownedTodosClaimed(owner_id, claimed));
            }
            Ok(claimed)
        })
    }
}

/// Current instant in the `created_at` / `completed_at` format.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Validates a draft and turns it into an unsaved task (id 0).
fn prepare_draft(title: &str, draft: &TodoDraft) -> TodoResult<Todo> {
    if draft.recurrence.is_enabled() && draft.due_date.is_none() {
        return Err(TodoError::RecurrenceWithoutDueDate);
    }

    Ok(Todo {
        id: 0,
        title: normalize_title(title)?,
        project: normalize_project(draft.project.as_deref())?,
        due_date: draft.due_date,
        reminder_at: draft.reminder_at,
        parent_id: draft.parent_id,
        priority: draft.priority,
        status: draft.status,
        recurrence: draft.recurrence,
        tags: normalize_tags(&draft.tags),
        completed: false,
        created_at: now_timestamp(),
        completed_at: None,
    })
}

pub(crate) fn row_to_todo(row: &Row) -> rusqlite::Result<Todo> {
    let due_date: Option<String> = row.get(3)?;
    let reminder_at: Option<String> = row.get(4)?;
    let priority: Option<String> = row.get(6)?;
    let status: Option<String> = row.get(7)?;
    let recurrence: Option<String> = row.get(8)?;
    let tags: Option<String> = row.get(9)?;
    let completed: bool = row.get(10)?;
    let completed_at: Option<String> = row.get(12)?;

    Ok(Todo {
        id: row.get(0)?,
        title: row.get(1)?,
        project: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        due_date: due_date.and_then(|d| NaiveDate::parse_from_str(&d, DATE_FORMAT).ok()),
        reminder_at: reminder_at.and_then(|r| NaiveDateTime::parse_from_str(&r, DATE_TIME_FORMAT).ok()),
        parent_id: row.get(5)?,
        priority: priority.as_deref().map(Priority::normalize).unwrap_or_default(),
        status: status.as_deref().map(Status::normalize).unwrap_or_default(),
        recurrence: recurrence.as_deref().map(Recurrence::normalize).unwrap_or_default(),
        tags: tags.as_deref().map(parse_tag_list).unwrap_or_default(),
        completed,
        created_at: row.get::<_, Option<String>>(11)?.unwrap_or_default(),
        completed_at: if completed { completed_at } else { None },
    })
}

pub(crate) fn select_by_id(conn: &Connection, owner_id: i64, id: i64) -> rusqlite::Result<Option<Todo>> {
    conn.query_row(SELECT_BY_ID, params![owner_id, id], row_to_todo).optional()
}

pub(crate) fn select_all(conn: &Connection, owner_id: i64) -> rusqlite::Result<Vec<Todo>> {
    let mut stmt = conn.prepare(SELECT_ALL_BY_OWNER)?;
    let todos = stmt.query_map(params![owner_id], row_to_todo)?.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(todos)
}

/// Inserts `todo` with a fresh id and returns it.
pub(crate) fn insert_todo(conn: &Connection, owner_id: i64, todo: &Todo) -> rusqlite::Result<i64> {
    conn.execute(
        INSERT_TODO,
        params![
            owner_id,
            todo.title,
            todo.project,
            todo.due_date.map(format_date),
            todo.reminder_at.map(format_date_time),
            todo.parent_id,
            todo.priority.as_str(),
            todo.status.as_str(),
            todo.recurrence.as_str(),
            tags_to_json(&todo.tags),
            todo.completed,
            todo.created_at,
            todo.completed_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Inserts `todo` verbatim, keeping its id.
pub(crate) fn insert_todo_with_id(conn: &Connection, owner_id: i64, todo: &Todo) -> rusqlite::Result<()> {
    conn.execute(
        INSERT_TODO_WITH_ID,
        params![
            owner_id,
            todo.title,
            todo.project,
            todo.due_date.map(format_date),
            todo.reminder_at.map(format_date_time),
            todo.parent_id,
            todo.priority.as_str(),
            todo.status.as_str(),
            todo.recurrence.as_str(),
            tags_to_json(&todo.tags),
            todo.completed,
            todo.created_at,
            todo.completed_at,
            todo.id,
        ],
    )?;
    Ok(())
}

pub(crate) fn update_todo(conn: &Connection, owner_id: i64, todo: &Todo) -> rusqlite::Result<usize> {
    conn.execute(
        UPDATE_TODO,
        params![
            owner_id,
            todo.id,
            todo.title,
            todo.project,
            todo.due_date.map(format_date),
            todo.reminder_at.map(format_date_time),
            todo.parent_id,
            todo.priority.as_str(),
            todo.status.as_str(),
            todo.recurrence.as_str(),
            tags_to_json(&todo.tags),
            todo.completed,
            todo.completed_at,
        ],
    )
}

fn set_completion(conn: &Connection, owner_id: i64, todo: &Todo) -> rusqlite::Result<usize> {
    conn.execute(UPDATE_COMPLETION, params![owner_id, todo.id, todo.completed, todo.completed_at])
}

/// Inserts the occurrence that follows a task that was just completed.
///
/// The new task keeps the parent only while that parent exists and is
/// still active. Returns the new id, or `None` when the task does not recur
/// or its next date cannot be computed.
pub(crate) fn spawn_next_occurrence(conn: &Connection, owner_id: i64, completed: &Todo) -> TodoResult<Option<i64>> {
    let Some(next) = next_occurrence(completed) else {
        return Ok(None);
    };

    let parent_id = match completed.parent_id {
        Some(parent_id) => match select_by_id(conn, owner_id, parent_id)? {
            Some(parent) if !parent.completed => Some(parent_id),
            _ => None,
        },
        None => None,
    };

    let spawned = Todo {
        id: 0,
        title: completed.title.clone(),
        project: completed.project.clone(),
        due_date: Some(next.due_date),
        reminder_at: next.reminder_at,
        parent_id,
        priority: completed.priority,
        status: Status::Todo,
        recurrence: completed.recurrence,
        tags: completed.tags.clone(),
        completed: false,
        created_at: now_timestamp(),
        completed_at: None,
    };
    let id = insert_todo(conn, owner_id, &spawned)?;
    msg_debug!(Message::RecurringTodoSpawned(completed.id, id, format_date(next.due_date)));

    Ok(Some(id))
}
