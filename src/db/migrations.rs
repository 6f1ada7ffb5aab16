//! Schema versioning for the task store.
//!
//! Two layers keep a database current:
//!
//! 1. Versioned migrations, recorded in the `migrations` table and applied
//!    in one transaction.
//! 2. An idempotent column pass over `todos` that adds any column missing
//!    from databases created by earlier revisions, followed by index
//!    creation. This pass runs on every open.
//!
//! ```rust
//! use todo_harbor::db::migrations::{get_db_version, init_with_migrations};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open_in_memory()?;
//! init_with_migrations(&mut conn)?;
//! assert!(get_db_version(&conn)? > 0);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::messages::Message;
use crate::msg_debug;
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};
use std::collections::HashSet;

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

const SCHEMA_TODOS: &str = "
CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id INTEGER,
    title TEXT NOT NULL,
    project TEXT NOT NULL DEFAULT 'Default Project',
    due_date TEXT,
    reminder_at TEXT,
    parent_id INTEGER,
    priority TEXT NOT NULL DEFAULT 'medium',
    status TEXT NOT NULL DEFAULT 'todo',
    recurrence TEXT NOT NULL DEFAULT 'none',
    tags TEXT NOT NULL DEFAULT '[]',
    completed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    completed_at TEXT
)";

const SCHEMA_UNDO_SNAPSHOTS: &str = "
CREATE TABLE IF NOT EXISTS undo_snapshots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id INTEGER NOT NULL,
    payload TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

/// Columns every `todos` table must carry, with the definition used when
/// one has to be added to an older table.
const TODO_COLUMNS: &[(&str, &str)] = &[
    ("owner_id", "INTEGER"),
    ("project", "TEXT NOT NULL DEFAULT 'Default Project'"),
    ("due_date", "TEXT"),
    ("reminder_at", "TEXT"),
    ("parent_id", "INTEGER"),
    ("priority", "TEXT NOT NULL DEFAULT 'medium'"),
    ("status", "TEXT NOT NULL DEFAULT 'todo'"),
    ("recurrence", "TEXT NOT NULL DEFAULT 'none'"),
    ("tags", "TEXT NOT NULL DEFAULT '[]'"),
    ("completed", "INTEGER NOT NULL DEFAULT 0"),
    ("created_at", "TEXT"),
    ("completed_at", "TEXT"),
];

const INDEXES: &[(&str, &str, &str)] = &[
    ("idx_todos_owner_id", "todos", "owner_id"),
    ("idx_todos_completed", "todos", "completed"),
    ("idx_todos_project", "todos", "project"),
    ("idx_todos_due_date", "todos", "due_date"),
    ("idx_todos_reminder_at", "todos", "reminder_at"),
    ("idx_todos_parent_id", "todos", "parent_id"),
    ("idx_todos_priority", "todos", "priority"),
    ("idx_todos_status", "todos", "status"),
    ("idx_todos_recurrence", "todos", "recurrence"),
    ("idx_undo_snapshots_owner_id", "undo_snapshots", "owner_id"),
];

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        self.add_migration(1, "create_todos", |tx| {
            tx.execute(SCHEMA_TODOS, [])?;
            Ok(())
        });

        self.add_migration(2, "create_undo_snapshots", |tx| {
            tx.execute(SCHEMA_UNDO_SNAPSHOTS, [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every pending migration inside a single transaction.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));
        let tx = conn.transaction()?;

        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            if let Err(e) = (migration.up)(&tx) {
                msg_debug!(Message::MigrationFailed(migration.version, e.to_string()));
                return Err(e);
            }
            tx.execute(
                "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                params![migration.version, migration.name],
            )?;
            msg_debug!(Message::MigrationCompleted(migration.version));
        }

        tx.commit()?;
        msg_debug!(Message::AllMigrationsCompleted);

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        // A missing migrations table reads as version 0.
        let version: Option<u32> = conn
            .query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))
            .unwrap_or(None);
        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// `(version, name, applied_at)` for every applied migration, in order.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;
        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }
}

/// Adds any missing `todos` column. Returns the names of the added columns.
pub fn ensure_columns(conn: &Connection) -> Result<Vec<String>> {
    let existing: HashSet<String> = {
        let mut stmt = conn.prepare("PRAGMA table_info(todos)")?;
        let names = stmt.query_map([], |row| row.get::<_, String>(1))?.collect::<Result<HashSet<_>, _>>()?;
        names
    };

    let mut added = Vec::new();
    for (column, definition) in TODO_COLUMNS {
        if existing.contains(*column) {
            continue;
        }
        conn.execute(&format!("ALTER TABLE todos ADD COLUMN {} {}", column, definition), [])?;
        msg_debug!(Message::ColumnAdded("todos".to_string(), column.to_string()));
        added.push(column.to_string());
    }

    Ok(added)
}

pub fn ensure_indexes(conn: &Connection) -> Result<()> {
    for (name, table, column) in INDEXES {
        conn.execute(&format!("CREATE INDEX IF NOT EXISTS {} ON {}({})", name, table, column), [])?;
    }
    Ok(())
}

/// Runs pending migrations, then the column and index pass.
pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)?;
    ensure_columns(conn)?;
    ensure_indexes(conn)?;
    Ok(())
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    let current = manager.get_current_version(conn)?;
    Ok(current < manager.latest_version())
}
