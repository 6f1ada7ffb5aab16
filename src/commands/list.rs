use super::{date_arg, Session};
use crate::{
    libs::{
        messages::Message,
        query::{DueScope, ListOptions, SortOrder, TodoFilter},
        todo::{Priority, Status},
        view::View,
    },
    msg_info, msg_print,
};
use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(short, long, value_enum, default_value = "all")]
    filter: TodoFilter,

    /// Substring matched against title, project and tags
    #[arg(short, long)]
    keyword: Option<String>,

    #[arg(short, long)]
    project: Option<String>,

    #[arg(long, value_enum)]
    priority: Option<Priority>,

    #[arg(long, value_enum)]
    status: Option<Status>,

    /// Earliest due date, YYYY-MM-DD
    #[arg(long, value_parser = date_arg)]
    from: Option<NaiveDate>,

    /// Latest due date, YYYY-MM-DD
    #[arg(long, value_parser = date_arg)]
    to: Option<NaiveDate>,

    #[arg(long, value_enum, default_value = "all")]
    scope: DueScope,

    #[arg(long, value_enum, default_value = "created_desc")]
    sort: SortOrder,

    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Defaults to the configured page size
    #[arg(long)]
    page_size: Option<u32>,

    /// Print the page as JSON
    #[arg(long)]
    json: bool,
}

pub fn cmd(session: &Session, args: ListArgs) -> Result<()> {
    let options = ListOptions {
        filter: args.filter,
        keyword: args.keyword,
        project: args.project,
        priority: args.priority,
        status: args.status,
        due_from: args.from,
        due_to: args.to,
        due_scope: args.scope,
        sort: args.sort,
        page: args.page,
        page_size: args.page_size.unwrap_or(session.config.page_size),
        today: None,
    };
    let page = session.todos.list(session.owner_id, &options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    if page.items.is_empty() {
        msg_info!(Message::NoTodosFound);
    } else {
        msg_print!(Message::TodosHeader, true);
        View::page(&page)?;
    }

    msg_print!(Message::PageFooter {
        page: page.pagination.page,
        total_pages: page.pagination.total_pages,
        total: page.pagination.total,
        has_next: page.pagination.has_next,
    });
    msg_print!(Message::DueSnapshotLine {
        overdue: page.due_snapshot.overdue,
        today: page.due_snapshot.today,
        upcoming: page.due_snapshot.upcoming,
        no_due: page.due_snapshot.no_due,
    });
    Ok(())
}
