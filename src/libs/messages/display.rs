//! Display implementation for application messages.
//!
//! All user-facing text and diagnostic wording lives here, so command and
//! store code only ever names a [`Message`] variant.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            // === TODO MESSAGES ===
            Message::TodoCreated(id, title) => format!("Task #{} created: {}", id, title),
            Message::TodosCreated(count) => format!("{} tasks created", count),
            Message::TodoUpdated(id) => format!("Task #{} updated", id),
            Message::TodoCompleted(id) => format!("Task #{} completed", id),
            Message::TodoReopened(id) => format!("Task #{} reopened", id),
            Message::TodoNotFound(id) => format!("Task #{} not found", id),
            Message::TodosDeleted(count) => format!("{} task(s) deleted", count),
            Message::CompletedCleared(count) => format!("{} completed task(s) cleared", count),
            Message::NothingToClear => "No completed tasks to clear".to_string(),
            Message::NoTitlesProvided => "No valid titles provided after trimming".to_string(),
            Message::NoPatchFields => "Nothing to change: pass at least one field option".to_string(),
            Message::TodosHeader => "Tasks:".to_string(),
            Message::TodoHeader(id) => format!("Task #{}:", id),
            Message::NoTodosFound => "No tasks found".to_string(),
            Message::PageFooter {
                page,
                total_pages,
                total,
                has_next,
            } => format!(
                "Page {}/{} ({} total){}",
                page,
                total_pages,
                total,
                if *has_next { ", more available" } else { "" }
            ),
            Message::DueSnapshotLine {
                overdue,
                today,
                upcoming,
                no_due,
            } => format!(
                "Overdue: {} | Today: {} | Upcoming: {} | No due date: {}",
                overdue, today, upcoming, no_due
            ),
            Message::ConfirmDeleteSubtree(id, title) => {
                format!("Delete task #{} '{}' and all of its subtasks?", id, title)
            }
            Message::OperationCancelled => "Operation cancelled".to_string(),

            // === BATCH MESSAGES ===
            Message::BatchApplied(changed, skipped) => format!("{} task(s) changed, {} skipped", changed, skipped),
            Message::BatchChangedIds(ids) => format!("Changed: {}", ids),

            // === UNDO MESSAGES ===
            Message::UndoApplied(count) => format!("Undo complete, {} task(s) restored", count),
            Message::NoUndoAvailable => "No undo available".to_string(),
            Message::UndoDepth(depth) => format!("Undo steps available: {}", depth),

            // === IMPORT / EXPORT MESSAGES ===
            Message::ExportCompleted(path, count) => format!("Exported {} task(s) to {}", count, path),
            Message::ImportCompleted(count, mode) => format!("Imported {} task(s) ({} mode)", count, mode),
            Message::ImportFormatUnsupported(path) => {
                format!("Cannot import '{}': only JSON exports can be imported", path)
            }
            Message::ImportFileUnreadable(path, error) => format!("Cannot read '{}': {}", path, error),
            Message::ConfirmReplaceImport(count) => {
                format!("Replace ALL existing tasks with {} imported task(s)?", count)
            }

            // === STATS MESSAGES ===
            Message::StatsHeader => "Statistics:".to_string(),
            Message::StatsLine(total, completed, active) => {
                format!("Total: {} | Completed: {} | Active: {}", total, completed, active)
            }
            Message::ProjectsHeader => "Projects:".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigWizardHeader => "Todo Harbor configuration".to_string(),
            Message::PromptOwnerId => "Owner id".to_string(),
            Message::PromptUndoHistoryLimit => "Undo steps to keep".to_string(),
            Message::PromptPageSize => "Default page size".to_string(),
            Message::OwnerMustBePositive => "Owner id must be a positive integer".to_string(),
            Message::PageSizeOutOfRange(max) => format!("Page size must be between 1 and {}", max),

            // === STORE DIAGNOSTICS ===
            Message::DatabaseOpened(path) => format!("Opened database at {}", path),
            Message::DatabaseUpToDate => "Database is up to date".to_string(),
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All migrations completed".to_string(),
            Message::ColumnAdded(table, column) => format!("Added missing column {}.{}", table, column),
            Message::UndoSnapshotSaved(owner, rows) => {
                format!("Saved undo snapshot for owner {} ({} rows)", owner, rows)
            }
            Message::UndoSnapshotRestored(owner, rows) => {
                format!("Restored undo snapshot for owner {} ({} rows)", owner, rows)
            }
            Message::OrphanParentsCleared(count) => format!("Cleared {} dangling parent reference(s)", count),
            Message::RecurringTodoSpawned(from, to, due) => {
                format!("Task #{} recurs as task #{} due {}", from, to, due)
            }
            Message::BatchCompletionExcluded(ids) => {
                format!("Completion skipped for tasks with outside active children: {:?}", ids)
            }
            Message::ImportParentDropped(index) => {
                format!("items[{}]: parent reference dropped (unresolved or cyclic)", index)
            }
            Message::UnownedTodosClaimed(owner, count) => {
                format!("Assigned {} unowned task(s) to owner {}", count, owner)
            }
        };

        write!(f, "{}", text)
    }
}
