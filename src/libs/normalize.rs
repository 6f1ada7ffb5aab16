//! Pure normalizers and validators shared by every write path.
//!
//! Enum domains are handled by the enums themselves (see [`crate::libs::todo`]);
//! this module covers owners, titles, projects, tags and the two textual
//! date formats the store accepts.

use super::error::{TodoError, TodoResult};
use chrono::{NaiveDate, NaiveDateTime};

pub const DEFAULT_PROJECT: &str = "Default Project";
pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_PROJECT_LEN: usize = 80;
pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LEN: usize = 20;

/// Calendar date format, `YYYY-MM-DD`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Reminder format, `YYYY-MM-DDTHH:mm` in 24-hour time.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Rejects non-positive owner ids before anything touches storage.
pub fn require_owner(owner_id: i64) -> TodoResult<i64> {
    if owner_id <= 0 {
        return Err(TodoError::OwnerRequired(owner_id));
    }
    Ok(owner_id)
}

/// Trims the title and checks it is non-empty and at most 200 characters.
pub fn normalize_title(raw: &str) -> TodoResult<String> {
    let title = raw.trim();
    if title.is_empty() || title.chars().count() > MAX_TITLE_LEN {
        return Err(TodoError::InvalidTitle { max: MAX_TITLE_LEN });
    }
    Ok(title.to_string())
}

/// Trims the project, falling back to [`DEFAULT_PROJECT`] when blank.
pub fn normalize_project(raw: Option<&str>) -> TodoResult<String> {
    let project = raw.map(str::trim).unwrap_or_default();
    if project.is_empty() {
        return Ok(DEFAULT_PROJECT.to_string());
    }
    if project.chars().count() > MAX_PROJECT_LEN {
        return Err(TodoError::InvalidProject { max: MAX_PROJECT_LEN });
    }
    Ok(project.to_string())
}

/// Normalizes a tag list into an ordered set.
///
/// Each tag is trimmed, loses one leading `#`, and is cut to 20 characters.
/// Empty tags are dropped, duplicates are detected case-insensitively (the
/// first spelling wins), and at most 20 tags are kept.
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags: Vec<String> = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    for value in raw {
        let trimmed = value.as_ref().trim();
        let stripped = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let tag: String = stripped.chars().take(MAX_TAG_LEN).collect();
        let tag = tag.trim().to_string();
        if tag.is_empty() {
            continue;
        }

        let key = tag.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        tags.push(tag);

        if tags.len() >= MAX_TAGS {
            break;
        }
    }

    tags
}

/// Reads tags from their stored or typed text form.
///
/// A JSON array is taken as-is; anything else is split on commas.
pub fn parse_tag_list(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<String>>(text) {
        Ok(values) => normalize_tags(values),
        Err(_) => normalize_tags(text.split(',')),
    }
}

/// Serializes a normalized tag list for storage.
pub fn tags_to_json(tags: &[String]) -> String {
    serde_json::to_string(&normalize_tags(tags)).unwrap_or_else(|_| "[]".to_string())
}

fn has_shape(value: &str, template: &str) -> bool {
    value.len() == template.len()
        && value.bytes().zip(template.bytes()).all(|(c, t)| match t {
            b'9' => c.is_ascii_digit(),
            other => c == other,
        })
}

/// Parses a strict `YYYY-MM-DD` string into a real calendar date.
pub fn parse_date(value: &str) -> TodoResult<NaiveDate> {
    let value = value.trim();
    if !has_shape(value, "9999-99-99") {
        return Err(TodoError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| TodoError::InvalidDate(value.to_string()))
}

/// Parses a strict `YYYY-MM-DDTHH:mm` string with range-checked hours and minutes.
pub fn parse_date_time(value: &str) -> TodoResult<NaiveDateTime> {
    let value = value.trim();
    if !has_shape(value, "9999-99-99T99:99") {
        return Err(TodoError::InvalidDateTime(value.to_string()));
    }
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT).map_err(|_| TodoError::InvalidDateTime(value.to_string()))
}

/// Parses an optional date where blank text means "no date".
pub fn parse_optional_date(value: Option<&str>) -> TodoResult<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_date(text).map(Some),
    }
}

/// Parses an optional date-time where blank text means "no reminder".
pub fn parse_optional_date_time(value: Option<&str>) -> TodoResult<Option<NaiveDateTime>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_date_time(text).map(Some),
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_date_time(value: NaiveDateTime) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}

/// Serde adapters keeping the textual formats on the wire.
pub mod serde_date {
    use super::{format_date, parse_date};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&format_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse_date(text).map(Some).map_err(serde::de::Error::custom),
        }
    }
}

pub mod serde_date_time {
    use super::{format_date_time, parse_date_time};
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_str(&format_date_time(*value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse_date_time(text).map(Some).map_err(serde::de::Error::custom),
        }
    }
}
