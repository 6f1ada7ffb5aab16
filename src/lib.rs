//! # todo-harbor
//!
//! Per-owner hierarchical task store on SQLite with filtered paging,
//! subtree operations, recurring tasks, batch updates, import/export and a
//! durable multi-step undo.
//!
//! ```rust
//! use todo_harbor::db::{db::Db, todos::Todos};
//! use todo_harbor::libs::todo::TodoDraft;
//!
//! let todos = Todos::open(Db::open_in_memory()?, 20);
//! let todo = todos.create(1, &TodoDraft::new("Book flights"))?;
//! todos.toggle(1, todo.id)?;
//! assert!(todos.get(1, todo.id)?.is_some_and(|t| t.completed));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod commands;
pub mod db;
pub mod libs;
