//! Filtered, sorted and paginated listing.
//!
//! The WHERE clause is assembled from [`ListOptions`] with positional
//! parameters. The due snapshot reuses the same conditions minus the due
//! scope, so its buckets always describe the set the user is looking at.

use super::todos::{row_to_todo, Todos, TODO_COLUMNS};
use crate::libs::error::TodoResult;
use crate::libs::normalize::{format_date, require_owner};
use crate::libs::query::{DueScope, DueSnapshot, ListOptions, Pagination, SortOrder, TodoFilter, TodoPage};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

#[derive(Debug, Default)]
struct Conditions {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl Conditions {
    fn push(&mut self, clause: &str, values: impl IntoIterator<Item = Value>) {
        self.clauses.push(clause.to_string());
        self.params.extend(values);
    }

    fn where_sql(&self) -> String {
        self.clauses.join(" AND ")
    }
}

fn text(value: impl Into<String>) -> Value {
    Value::Text(value.into())
}

/// `%keyword%` with LIKE wildcards in the keyword escaped.
fn like_pattern(keyword: &str) -> String {
    let escaped = keyword.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Every filter except the due scope.
fn base_conditions(owner_id: i64, options: &ListOptions) -> Conditions {
    let mut conditions = Conditions::default();
    conditions.push("owner_id = ?", [Value::Integer(owner_id)]);

    match options.filter {
        TodoFilter::All => {}
        TodoFilter::Active => conditions.push("completed = 0", []),
        TodoFilter::Completed => conditions.push("completed = 1", []),
    }

    if let Some(keyword) = options.keyword() {
        let pattern = like_pattern(keyword);
        conditions.push(
            "(title LIKE ? ESCAPE '\\' OR project LIKE ? ESCAPE '\\' OR EXISTS (
                SELECT 1 FROM json_each(CASE WHEN json_valid(todos.tags) THEN todos.tags ELSE '[]' END) AS tag
                WHERE tag.value LIKE ? ESCAPE '\\'))",
            [text(pattern.clone()), text(pattern.clone()), text(pattern)],
        );
    }
    if let Some(project) = options.project() {
        conditions.push("project = ?", [text(project)]);
    }
    if let Some(priority) = options.priority {
        conditions.push("priority = ?", [text(priority.as_str())]);
    }
    if let Some(status) = options.status {
        conditions.push("status = ?", [text(status.as_str())]);
    }
    if let Some(from) = options.due_from {
        conditions.push("due_date IS NOT NULL AND due_date >= ?", [text(format_date(from))]);
    }
    if let Some(to) = options.due_to {
        conditions.push("due_date IS NOT NULL AND due_date <= ?", [text(format_date(to))]);
    }

    conditions
}

fn apply_due_scope(conditions: &mut Conditions, options: &ListOptions) {
    let today = text(format_date(options.today()));
    match options.due_scope {
        DueScope::All => {}
        DueScope::Overdue => conditions.push("due_date IS NOT NULL AND due_date < ?", [today]),
        DueScope::Today => conditions.push("due_date = ?", [today]),
        DueScope::Week => conditions.push(
            "due_date IS NOT NULL AND due_date >= ? AND due_date <= ?",
            [today, text(format_date(options.week_end()))],
        ),
        DueScope::NoDue => conditions.push("due_date IS NULL", []),
    }
}

fn order_by(sort: SortOrder) -> &'static str {
    match sort {
        SortOrder::CreatedDesc => "id DESC",
        SortOrder::CreatedAsc => "id ASC",
        SortOrder::DueAsc => "CASE WHEN due_date IS NULL THEN 1 ELSE 0 END, due_date ASC, id DESC",
        SortOrder::DueDesc => "CASE WHEN due_date IS NULL THEN 1 ELSE 0 END, due_date DESC, id DESC",
    }
}

fn due_snapshot(conn: &Connection, conditions: &Conditions, options: &ListOptions) -> rusqlite::Result<DueSnapshot> {
    let sql = format!(
        "SELECT
            COALESCE(SUM(CASE WHEN due_date IS NOT NULL AND due_date < ? THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN due_date = ? THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN due_date > ? AND due_date <= ? THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN due_date IS NULL THEN 1 ELSE 0 END), 0)
         FROM todos WHERE {}",
        conditions.where_sql()
    );

    let today = format_date(options.today());
    let mut params = vec![text(today.clone()), text(today.clone()), text(today), text(format_date(options.week_end()))];
    params.extend(conditions.params.iter().cloned());

    conn.query_row(&sql, params_from_iter(params), |row| {
        Ok(DueSnapshot {
            overdue: row.get::<_, i64>(0)?.max(0) as u64,
            today: row.get::<_, i64>(1)?.max(0) as u64,
            upcoming: row.get::<_, i64>(2)?.max(0) as u64,
            no_due: row.get::<_, i64>(3)?.max(0) as u64,
        })
    })
}

impl Todos {
    /// Lists one page of the owner's tasks.
    ///
    /// Out-of-range paging values are clamped; a page past the end is empty.
    pub fn list(&self, owner_id: i64, options: &ListOptions) -> TodoResult<TodoPage> {
        let owner_id = require_owner(owner_id)?;
        let base = base_conditions(owner_id, options);
        let mut scoped = base_conditions(owner_id, options);
        apply_due_scope(&mut scoped, options);

        self.read(|conn| {
            let count_sql = format!("SELECT COUNT(*) FROM todos WHERE {}", scoped.where_sql());
            let total: i64 = conn.query_row(&count_sql, params_from_iter(scoped.params.iter()), |row| row.get(0))?;
            let total = total.max(0) as u64;

            let page_sql = format!(
                "SELECT {} FROM todos WHERE {} ORDER BY {} LIMIT ? OFFSET ?",
                TODO_COLUMNS,
                scoped.where_sql(),
                order_by(options.sort)
            );
            let mut params = scoped.params.clone();
            params.push(Value::Integer(i64::from(options.page_size())));
            params.push(Value::Integer(options.offset() as i64));

            let mut stmt = conn.prepare(&page_sql)?;
            let items = stmt.query_map(params_from_iter(params), row_to_todo)?.collect::<rusqlite::Result<Vec<_>>>()?;

            let pagination = Pagination::new(options.page(), options.page_size(), total, items.len());
            let due_snapshot = due_snapshot(conn, &base, options)?;

            Ok(TodoPage {
                items,
                pagination,
                due_snapshot,
            })
        })
    }
}
