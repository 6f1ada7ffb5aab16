//! Export files and import file reading.
//!
//! JSON exports hold `{"items": [...]}` with one [`TodoRecord`] per task and
//! can be read back by [`read_records`]. CSV exports are flat and meant for
//! spreadsheets only.

use super::todo::TodoRecord;
use anyhow::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ExportDocument {
    exported_at: String,
    items: Vec<TodoRecord>,
}

/// Import input: either an export document or a bare record array.
#[derive(Deserialize)]
#[serde(untagged)]
enum ImportDocument {
    Wrapped { items: Vec<TodoRecord> },
    Bare(Vec<TodoRecord>),
}

pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    /// Without an explicit path, writes `todos_export_<timestamp>.<ext>` in
    /// the working directory.
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>) -> Self {
        let output_path = output_path.unwrap_or_else(|| {
            PathBuf::from(format!("todos_export_{}.{}", Local::now().format("%Y%m%d_%H%M%S"), format.extension()))
        });

        Self { format, output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn export(&self, records: &[TodoRecord]) -> Result<()> {
        match self.format {
            ExportFormat::Json => self.export_json(records),
            ExportFormat::Csv => self.export_csv(records),
        }
    }

    fn export_json(&self, records: &[TodoRecord]) -> Result<()> {
        let document = ExportDocument {
            exported_at: Local::now().to_rfc3339(),
            items: records.to_vec(),
        };
        fs::write(&self.output_path, serde_json::to_string_pretty(&document)?)?;
        Ok(())
    }

    fn export_csv(&self, records: &[TodoRecord]) -> Result<()> {
        let mut wtr = csv::Writer::from_path(&self.output_path)?;
        wtr.write_record([
            "id",
            "title",
            "project",
            "due_date",
            "reminder_at",
            "parent_id",
            "priority",
            "status",
            "recurrence",
            "tags",
            "completed",
            "created_at",
            "completed_at",
        ])?;

        for record in records {
            wtr.write_record([
                record.id.map(|id| id.to_string()).unwrap_or_default(),
                record.title.clone(),
                record.project.clone().unwrap_or_default(),
                record.due_date.clone().unwrap_or_default(),
                record.reminder_at.clone().unwrap_or_default(),
                record.parent_id.map(|id| id.to_string()).unwrap_or_default(),
                record.priority.clone().unwrap_or_default(),
                record.status.clone().unwrap_or_default(),
                record.recurrence.clone().unwrap_or_default(),
                record.tags.join(", "),
                record.completed.to_string(),
                record.created_at.clone().unwrap_or_default(),
                record.completed_at.clone().unwrap_or_default(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }
}

/// Reads import records from JSON text.
pub fn parse_records(json: &str) -> Result<Vec<TodoRecord>> {
    let records = match serde_json::from_str::<ImportDocument>(json)? {
        ImportDocument::Wrapped { items } => items,
        ImportDocument::Bare(items) => items,
    };
    Ok(records)
}

/// Reads import records from a JSON export file.
pub fn read_records(path: &Path) -> Result<Vec<TodoRecord>> {
    parse_records(&fs::read_to_string(path)?)
}
