//! Durable, bounded undo history.
//!
//! Each mutating call stores the owner's full task set as JSON in
//! `undo_snapshots` before it changes anything. Undo pops the newest
//! snapshot and rewrites the owner's rows from it, ids included.

use super::todos::{insert_todo_with_id, select_all, Todos};
use super::tree;
use crate::libs::error::{TodoError, TodoResult};
use crate::libs::messages::Message;
use crate::libs::normalize::require_owner;
use crate::libs::todo::Todo;
use crate::msg_debug;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

const INSERT_SNAPSHOT: &str = "INSERT INTO undo_snapshots (owner_id, payload, created_at) VALUES (?1, ?2, ?3)";

const PRUNE_SNAPSHOTS: &str = "DELETE FROM undo_snapshots
    WHERE owner_id = ?1
      AND id NOT IN (SELECT id FROM undo_snapshots WHERE owner_id = ?1 ORDER BY id DESC LIMIT ?2)";

const SELECT_LATEST_SNAPSHOT: &str = "SELECT id, payload FROM undo_snapshots WHERE owner_id = ?1 ORDER BY id DESC LIMIT 1";

const COUNT_SNAPSHOTS: &str = "SELECT COUNT(*) FROM undo_snapshots WHERE owner_id = ?1";

const DELETE_SNAPSHOT: &str = "DELETE FROM undo_snapshots WHERE id = ?1";

const DELETE_OWNER_TODOS: &str = "DELETE FROM todos WHERE owner_id = ?1";

/// Stores the owner's current tasks as the newest snapshot and prunes the
/// history down to `limit` entries.
pub(crate) fn push_snapshot(conn: &Connection, owner_id: i64, limit: usize) -> TodoResult<()> {
    let rows = select_all(conn, owner_id)?;
    let payload = serde_json::to_string(&rows)?;
    conn.execute(
        INSERT_SNAPSHOT,
        params![owner_id, payload, Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)],
    )?;
    conn.execute(PRUNE_SNAPSHOTS, params![owner_id, limit.max(1) as i64])?;
    msg_debug!(Message::UndoSnapshotSaved(owner_id, rows.len()));

    Ok(())
}

/// Replaces the owner's tasks with `rows`, keeping their ids.
pub(crate) fn restore_rows(conn: &Connection, owner_id: i64, rows: &[Todo]) -> TodoResult<usize> {
    conn.execute(DELETE_OWNER_TODOS, params![owner_id])?;
    for todo in rows {
        insert_todo_with_id(conn, owner_id, todo)?;
    }
    tree::clear_orphan_parents(conn, owner_id)?;
    Ok(rows.len())
}

impl Todos {
    /// Steps the owner back by one mutation and returns the number of tasks
    /// restored.
    ///
    /// Fails with [`TodoError::NoUndoAvailable`] when the history is empty.
    /// Restored rows are written as they were; completing rows here never
    /// spawns recurring occurrences.
    pub fn undo(&self, owner_id: i64) -> TodoResult<usize> {
        let owner_id = require_owner(owner_id)?;

        self.write(|tx| {
            let latest: Option<(i64, String)> = tx
                .query_row(SELECT_LATEST_SNAPSHOT, params![owner_id], |row| Ok((row.get(0)?, row.get(1)?)))
                .optional()?;
            let Some((snapshot_id, payload)) = latest else {
                return Err(TodoError::NoUndoAvailable);
            };

            let rows: Vec<Todo> = serde_json::from_str(&payload)?;
            let restored = restore_rows(tx, owner_id, &rows)?;
            tx.execute(DELETE_SNAPSHOT, params![snapshot_id])?;
            msg_debug!(Message::UndoSnapshotRestored(owner_id, restored));

            Ok(restored)
        })
    }

    pub fn has_undo(&self, owner_id: i64) -> TodoResult<bool> {
        Ok(self.undo_depth(owner_id)? > 0)
    }

    /// Number of undo steps currently stored for the owner.
    pub fn undo_depth(&self, owner_id: i64) -> TodoResult<usize> {
        let owner_id = require_owner(owner_id)?;
        self.read(|conn| {
            let count: i64 = conn.query_row(COUNT_SNAPSHOTS, params![owner_id], |row| row.get(0))?;
            Ok(count.max(0) as usize)
        })
    }
}
