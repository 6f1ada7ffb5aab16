#[derive(Debug, Clone)]
pub enum Message {
    // === TODO MESSAGES ===
    TodoCreated(i64, String),
    TodosCreated(usize),
    TodoUpdated(i64),
    TodoCompleted(i64),
    TodoReopened(i64),
    TodoNotFound(i64),
    TodosDeleted(usize),
    CompletedCleared(usize),
    NothingToClear,
    NoTitlesProvided,
    NoPatchFields,
    TodosHeader,
    TodoHeader(i64),
    NoTodosFound,
    PageFooter {
        page: u32,
        total_pages: u64,
        total: u64,
        has_next: bool,
    },
    DueSnapshotLine {
        overdue: u64,
        today: u64,
        upcoming: u64,
        no_due: u64,
    },
    ConfirmDeleteSubtree(i64, String),
    OperationCancelled,

    // === BATCH MESSAGES ===
    BatchApplied(usize, usize),
    BatchChangedIds(String),

    // === UNDO MESSAGES ===
    UndoApplied(usize),
    NoUndoAvailable,
    UndoDepth(usize),

    // === IMPORT / EXPORT MESSAGES ===
    ExportCompleted(String, usize),
    ImportCompleted(usize, String),
    ImportFormatUnsupported(String),
    ImportFileUnreadable(String, String),
    ConfirmReplaceImport(usize),

    // === STATS MESSAGES ===
    StatsHeader,
    StatsLine(usize, usize, usize),
    ProjectsHeader,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigWizardHeader,
    PromptOwnerId,
    PromptUndoHistoryLimit,
    PromptPageSize,
    OwnerMustBePositive,
    PageSizeOutOfRange(u32),

    // === STORE DIAGNOSTICS ===
    DatabaseOpened(String),
    DatabaseUpToDate,
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationCompleted(u32),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    ColumnAdded(String, String),
    UndoSnapshotSaved(i64, usize),
    UndoSnapshotRestored(i64, usize),
    OrphanParentsCleared(usize),
    RecurringTodoSpawned(i64, i64, String),
    BatchCompletionExcluded(Vec<i64>),
    ImportParentDropped(usize),
    UnownedTodosClaimed(i64, usize),
}
