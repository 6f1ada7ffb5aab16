//! Query options and result shapes for listing tasks.

use super::todo::{Priority, Status, Todo};
use chrono::{Local, NaiveDate};
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 60;
pub const MAX_PAGE_SIZE: u32 = 200;
/// Width of the "week" due scope and the "upcoming" snapshot bucket, in days.
pub const WEEK_SPAN_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TodoFilter {
    #[default]
    All,
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortOrder {
    #[default]
    #[value(name = "created_desc")]
    CreatedDesc,
    #[value(name = "created_asc")]
    CreatedAsc,
    #[value(name = "due_asc")]
    DueAsc,
    #[value(name = "due_desc")]
    DueDesc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DueScope {
    #[default]
    All,
    Overdue,
    Today,
    Week,
    #[value(name = "no_due")]
    NoDue,
}

/// Everything the query engine can filter, sort and paginate by.
///
/// `today` pins the reference date for due scopes and the due snapshot;
/// when unset the local calendar date is used.
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub filter: TodoFilter,
    pub keyword: Option<String>,
    pub project: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub due_from: Option<NaiveDate>,
    pub due_to: Option<NaiveDate>,
    pub due_scope: DueScope,
    pub sort: SortOrder,
    pub page: u32,
    pub page_size: u32,
    pub today: Option<NaiveDate>,
}

impl Default for ListOptions {
    fn default() -> Self {
        ListOptions {
            filter: TodoFilter::All,
            keyword: None,
            project: None,
            priority: None,
            status: None,
            due_from: None,
            due_to: None,
            due_scope: DueScope::All,
            sort: SortOrder::CreatedDesc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            today: None,
        }
    }
}

impl ListOptions {
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page() - 1) * u64::from(self.page_size())
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn week_end(&self) -> NaiveDate {
        self.today() + chrono::Duration::days(WEEK_SPAN_DAYS)
    }

    /// Trimmed keyword, or `None` when blank.
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32, total: u64, returned: usize) -> Self {
        let size = u64::from(page_size.max(1));
        let total_pages = if total > 0 { total.div_ceil(size) } else { 0 };
        let loaded = u64::from(page.saturating_sub(1)) * size + returned as u64;
        Pagination {
            page,
            page_size,
            total,
            total_pages,
            has_next: loaded < total,
        }
    }
}

/// Due-date buckets over the filtered set, ignoring the due scope facet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueSnapshot {
    pub overdue: u64,
    pub today: u64,
    pub upcoming: u64,
    pub no_due: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPage {
    pub items: Vec<Todo>,
    pub pagination: Pagination,
    pub due_snapshot: DueSnapshot,
}
