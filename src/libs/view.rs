use super::normalize::{format_date, format_date_time};
use super::query::TodoPage;
use super::todo::{ProjectCount, Todo};
use anyhow::Result;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn todos(todos: &[Todo]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "", "TITLE", "PROJECT", "DUE", "PRIORITY", "STATUS", "REPEAT", "PARENT", "TAGS"]);
        for todo in todos {
            table.add_row(row![
                todo.id,
                if todo.completed { "✔" } else { " " },
                todo.title,
                todo.project,
                todo.due_date.map(format_date).unwrap_or_default(),
                todo.priority,
                todo.status,
                todo.recurrence,
                todo.parent_id.map(|id| id.to_string()).unwrap_or_default(),
                todo.tags.join(", ")
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn page(page: &TodoPage) -> Result<()> {
        Self::todos(&page.items)
    }

    /// Field-per-row view of a single task.
    pub fn todo(todo: &Todo) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", todo.id]);
        table.add_row(row!["TITLE", todo.title]);
        table.add_row(row!["PROJECT", todo.project]);
        table.add_row(row!["DUE", todo.due_date.map(format_date).unwrap_or_default()]);
        table.add_row(row!["REMINDER", todo.reminder_at.map(format_date_time).unwrap_or_default()]);
        table.add_row(row!["PARENT", todo.parent_id.map(|id| id.to_string()).unwrap_or_default()]);
        table.add_row(row!["PRIORITY", todo.priority]);
        table.add_row(row!["STATUS", todo.status]);
        table.add_row(row!["REPEAT", todo.recurrence]);
        table.add_row(row!["TAGS", todo.tags.join(", ")]);
        table.add_row(row!["COMPLETED", todo.completed]);
        table.add_row(row!["CREATED", todo.created_at]);
        table.add_row(row!["COMPLETED AT", todo.completed_at.clone().unwrap_or_default()]);
        table.printstd();

        Ok(())
    }

    pub fn projects(projects: &[ProjectCount]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["PROJECT", "TASKS"]);
        for project in projects {
            table.add_row(row![project.name, project.count]);
        }
        table.printstd();

        Ok(())
    }
}
