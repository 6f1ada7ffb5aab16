//! Task model shared by the store, the exporter and the command layer.

use super::normalize::{normalize_tags, parse_tag_list, serde_date, serde_date_time};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Strict parse: `None` for anything outside the domain.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    /// Lenient parse used on stored and imported values.
    pub fn normalize(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Todo,
    #[value(name = "in_progress")]
    InProgress,
    Blocked,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in_progress",
            Status::Blocked => "blocked",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "todo" => Some(Status::Todo),
            "in_progress" => Some(Status::InProgress),
            "blocked" => Some(Status::Blocked),
            _ => None,
        }
    }

    pub fn normalize(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "none" => Some(Recurrence::None),
            "daily" => Some(Recurrence::Daily),
            "weekly" => Some(Recurrence::Weekly),
            "monthly" => Some(Recurrence::Monthly),
            _ => None,
        }
    }

    pub fn normalize(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_default()
    }

    pub fn is_enabled(&self) -> bool {
        *self != Recurrence::None
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Priority, Status, Recurrence);

/// A stored task, exactly as one row of the `todos` table reads back.
///
/// This is also the unit of an undo snapshot, so every field round-trips
/// through serde without loss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub project: String,
    #[serde(default, with = "serde_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, with = "serde_date_time")]
    pub reminder_at: Option<NaiveDateTime>,
    pub parent_id: Option<i64>,
    pub priority: Priority,
    pub status: Status,
    pub recurrence: Recurrence,
    pub tags: Vec<String>,
    pub completed: bool,
    pub created_at: String,
    pub completed_at: Option<String>,
}

/// Input for creating a task.
#[derive(Debug, Clone, Default)]
pub struct TodoDraft {
    pub title: String,
    pub project: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub reminder_at: Option<NaiveDateTime>,
    pub parent_id: Option<i64>,
    pub priority: Priority,
    pub status: Status,
    pub recurrence: Recurrence,
    pub tags: Vec<String>,
}

impl TodoDraft {
    pub fn new(title: &str) -> Self {
        TodoDraft {
            title: title.to_string(),
            ..Default::default()
        }
    }
}

/// Partial update of a task. `None` leaves a field untouched; for the
/// nullable fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub project: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
    pub reminder_at: Option<Option<NaiveDateTime>>,
    pub parent_id: Option<Option<i64>>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub recurrence: Option<Recurrence>,
    pub tags: Option<Vec<String>>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.project.is_none()
            && self.due_date.is_none()
            && self.reminder_at.is_none()
            && self.parent_id.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.recurrence.is_none()
            && self.tags.is_none()
    }
}

/// Storage-independent record used by export and import.
///
/// Values stay textual so import can report which item is malformed.
/// Both snake_case and camelCase keys are accepted on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default, alias = "dueDate")]
    pub due_date: Option<String>,
    #[serde(default, alias = "reminderAt")]
    pub reminder_at: Option<String>,
    #[serde(default, alias = "parentId")]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub recurrence: Option<String>,
    #[serde(default, deserialize_with = "tags_from_any")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, alias = "completedAt")]
    pub completed_at: Option<String>,
}

impl From<&Todo> for TodoRecord {
    fn from(todo: &Todo) -> Self {
        TodoRecord {
            id: Some(todo.id),
            title: todo.title.clone(),
            project: Some(todo.project.clone()),
            due_date: todo.due_date.map(super::normalize::format_date),
            reminder_at: todo.reminder_at.map(super::normalize::format_date_time),
            parent_id: todo.parent_id,
            priority: Some(todo.priority.to_string()),
            status: Some(todo.status.to_string()),
            recurrence: Some(todo.recurrence.to_string()),
            tags: todo.tags.clone(),
            completed: todo.completed,
            created_at: Some(todo.created_at.clone()),
            completed_at: todo.completed_at.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagsInput {
    List(Vec<String>),
    Text(String),
}

fn tags_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw: Option<TagsInput> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(TagsInput::List(values)) => normalize_tags(values),
        Some(TagsInput::Text(text)) => parse_tag_list(&text),
        None => Vec::new(),
    })
}

/// Owner-wide counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
}

/// One project with the number of tasks filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectCount {
    pub name: String,
    pub count: usize,
}
