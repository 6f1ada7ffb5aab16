//! Parent/child bookkeeping over the flat `todos` table.
//!
//! The hierarchy is never materialized as nested values. [`ParentIndex`]
//! loads `id -> (parent, completed)` for one owner and every structural
//! check (cycle walk, subtree closure, batch completion eligibility) runs
//! against that arena.

use crate::libs::error::{TodoError, TodoResult};
use crate::libs::messages::Message;
use crate::msg_debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

const SELECT_PARENT_INDEX: &str = "SELECT id, parent_id, completed FROM todos WHERE owner_id = ?1";

const SELECT_ACTIVE_CHILD: &str = "SELECT 1 FROM todos WHERE owner_id = ?1 AND parent_id = ?2 AND completed = 0 LIMIT 1";

const SELECT_PARENT_STATE: &str = "SELECT completed FROM todos WHERE owner_id = ?1 AND id = ?2";

const CLEAR_ORPHAN_PARENTS: &str = "UPDATE todos SET parent_id = NULL
    WHERE owner_id = ?1
      AND parent_id IS NOT NULL
      AND parent_id NOT IN (SELECT id FROM todos WHERE owner_id = ?1)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    parent: Option<i64>,
    completed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ParentIndex {
    nodes: HashMap<i64, Node>,
    children: HashMap<i64, Vec<i64>>,
}

impl ParentIndex {
    pub fn load(conn: &Connection, owner_id: i64) -> rusqlite::Result<Self> {
        let mut stmt = conn.prepare(SELECT_PARENT_INDEX)?;
        let rows = stmt
            .query_map(params![owner_id], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, Option<i64>>(1)?, row.get::<_, bool>(2)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Self::from_rows(rows))
    }

    /// Builds an index from `(id, parent_id, completed)` triples.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (i64, Option<i64>, bool)>,
    {
        let mut index = ParentIndex::default();
        for (id, parent, completed) in rows {
            index.nodes.insert(id, Node { parent, completed });
            if let Some(parent) = parent {
                index.children.entry(parent).or_default().push(id);
            }
        }
        index
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn parent_of(&self, id: i64) -> Option<i64> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    pub fn is_completed(&self, id: i64) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.completed)
    }

    /// Direct children of `id` that are not completed.
    pub fn active_children(&self, id: i64) -> impl Iterator<Item = i64> + '_ {
        self.children
            .get(&id)
            .into_iter()
            .flatten()
            .copied()
            .filter(move |child| !self.is_completed(*child))
    }

    /// Rejects a reparent of `task_id` under `parent_id` that would make the
    /// task its own ancestor.
    ///
    /// The walk starts at the proposed parent and follows parent links. It
    /// is bounded by the number of tasks, so a chain that is already looping
    /// in stored data is also reported as a cycle.
    pub fn check_parent(&self, task_id: i64, parent_id: i64) -> TodoResult<()> {
        if task_id == parent_id {
            return Err(TodoError::SelfParent(task_id));
        }

        let mut cursor = Some(parent_id);
        let mut steps = 0usize;
        while let Some(current) = cursor {
            if current == task_id || steps > self.nodes.len() {
                return Err(TodoError::ParentCycle { task_id, parent_id });
            }
            steps += 1;
            cursor = self.parent_of(current);
        }

        Ok(())
    }

    /// The root plus all of its transitive descendants, root first.
    /// Empty when the root does not exist.
    pub fn subtree(&self, root: i64) -> Vec<i64> {
        if !self.contains(root) {
            return Vec::new();
        }

        let mut visited = HashSet::from([root]);
        let mut order = vec![root];
        let mut queue = VecDeque::from([root]);

        while let Some(id) = queue.pop_front() {
            for child in self.children.get(&id).into_iter().flatten() {
                if visited.insert(*child) {
                    order.push(*child);
                    queue.push_back(*child);
                }
            }
        }

        order
    }
}

/// Targets that may be marked complete together in one batch.
///
/// Starts from every existing target and repeatedly drops any id that has
/// an active direct child outside the current set, until nothing changes.
/// A parent and all of its children therefore complete together, while a
/// parent with an active child left out of the batch is excluded.
pub fn completion_eligible(index: &ParentIndex, targets: &[i64]) -> BTreeSet<i64> {
    let mut eligible: BTreeSet<i64> = targets.iter().copied().filter(|id| index.contains(*id)).collect();

    loop {
        let blocked: Vec<i64> = eligible
            .iter()
            .copied()
            .filter(|id| index.active_children(*id).any(|child| !eligible.contains(&child)))
            .collect();

        if blocked.is_empty() {
            break;
        }
        msg_debug!(Message::BatchCompletionExcluded(blocked.clone()));
        for id in blocked {
            eligible.remove(&id);
        }
    }

    eligible
}

pub fn has_active_children(conn: &Connection, owner_id: i64, id: i64) -> rusqlite::Result<bool> {
    let found: Option<i64> = conn
        .query_row(SELECT_ACTIVE_CHILD, params![owner_id, id], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

/// Checks that `parent_id` may become the parent of `task_id` (`None` for a
/// task that does not exist yet): it must exist for the owner, be active,
/// and not close a cycle.
pub fn validate_parent(conn: &Connection, owner_id: i64, task_id: Option<i64>, parent_id: i64) -> TodoResult<()> {
    if task_id == Some(parent_id) {
        return Err(TodoError::SelfParent(parent_id));
    }

    let completed: Option<bool> = conn
        .query_row(SELECT_PARENT_STATE, params![owner_id, parent_id], |row| row.get(0))
        .optional()?;
    match completed {
        None => return Err(TodoError::ParentNotFound(parent_id)),
        Some(true) => return Err(TodoError::ParentCompleted(parent_id)),
        Some(false) => {}
    }

    if let Some(task_id) = task_id {
        ParentIndex::load(conn, owner_id)?.check_parent(task_id, parent_id)?;
    }

    Ok(())
}

/// Nulls every parent reference that points at a task the owner no longer has.
pub fn clear_orphan_parents(conn: &Connection, owner_id: i64) -> rusqlite::Result<usize> {
    let cleared = conn.execute(CLEAR_ORPHAN_PARENTS, params![owner_id])?;
    if cleared > 0 {
        msg_debug!(Message::OrphanParentsCleared(cleared));
    }
    Ok(cleared)
}
