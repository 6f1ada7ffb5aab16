//! Persistence layer for todo-harbor.
//!
//! Everything lives in one SQLite database: the `todos` table, the durable
//! undo history in `undo_snapshots`, and the `migrations` bookkeeping table.
//!
//! ```rust
//! use todo_harbor::db::{db::Db, todos::Todos};
//! use todo_harbor::libs::query::ListOptions;
//! use todo_harbor::libs::todo::TodoDraft;
//!
//! let todos = Todos::open(Db::open_in_memory()?, 20);
//! todos.create(1, &TodoDraft::new("Water the plants"))?;
//! let page = todos.list(1, &ListOptions::default())?;
//! assert_eq!(page.pagination.total, 1);
//!
//! todos.undo(1)?;
//! assert_eq!(todos.stats(1)?.total, 0);
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Batch updates with transitive completion eligibility.
pub mod batch;

/// Connection setup.
pub mod db;

/// Versioned migrations plus the idempotent column and index pass.
pub mod migrations;

/// Filtered, sorted and paginated listing with the due snapshot.
pub mod query;

/// The task store: single-task operations and transaction handling.
pub mod todos;

/// Import and export of an owner's task set.
pub mod transfer;

/// Parent index, cycle checks, subtree closure and orphan cleanup.
pub mod tree;

/// Durable per-owner undo history.
pub mod undo;
