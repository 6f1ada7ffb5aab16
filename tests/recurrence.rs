#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use todo_harbor::db::batch::BatchUpdate;
    use todo_harbor::db::{db::Db, todos::Todos};
    use todo_harbor::libs::error::TodoError;
    use todo_harbor::libs::query::ListOptions;
    use todo_harbor::libs::recurrence::{next_due_date, next_occurrence, next_reminder_at};
    use todo_harbor::libs::todo::{Priority, Recurrence, Status, Todo, TodoDraft};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    const OWNER: i64 = 11;

    struct RecurrenceTestContext {
        _temp_dir: TempDir,
        todos: Todos,
    }

    impl TestContext for RecurrenceTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("todos.db")).unwrap();
            RecurrenceTestContext {
                todos: Todos::open(db, 20),
                _temp_dir: temp_dir,
            }
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    fn all(todos: &Todos) -> Vec<Todo> {
        let mut items = todos.list(OWNER, &ListOptions::default()).unwrap().items;
        items.sort_by_key(|t| t.id);
        items
    }

    #[test]
    fn test_next_due_date_steps() {
        assert_eq!(next_due_date(date(2025, 3, 9), Recurrence::Daily), Some(date(2025, 3, 10)));
        assert_eq!(next_due_date(date(2025, 12, 31), Recurrence::Daily), Some(date(2026, 1, 1)));
        assert_eq!(next_due_date(date(2025, 3, 9), Recurrence::Weekly), Some(date(2025, 3, 16)));
        assert_eq!(next_due_date(date(2025, 3, 9), Recurrence::None), None);
    }

    #[test]
    fn test_monthly_clamps_to_month_end() {
        assert_eq!(next_due_date(date(2025, 3, 31), Recurrence::Monthly), Some(date(2025, 4, 30)));
        assert_eq!(next_due_date(date(2025, 1, 31), Recurrence::Monthly), Some(date(2025, 2, 28)));
        assert_eq!(next_due_date(date(2024, 1, 31), Recurrence::Monthly), Some(date(2024, 2, 29)));
        assert_eq!(next_due_date(date(2025, 1, 15), Recurrence::Monthly), Some(date(2025, 2, 15)));
    }

    #[test]
    fn test_reminder_keeps_offset() {
        let due = date(2025, 5, 10);
        assert_eq!(
            next_reminder_at(at(2025, 5, 10, 9, 30), due, date(2025, 5, 11)),
            Some(at(2025, 5, 11, 9, 30))
        );
        assert_eq!(
            next_reminder_at(at(2025, 5, 9, 18, 0), due, date(2025, 5, 17)),
            Some(at(2025, 5, 16, 18, 0))
        );
    }

    #[test_context(RecurrenceTestContext)]
    #[test]
    fn test_next_occurrence_requires_due_date(ctx: &mut RecurrenceTestContext) {
        let plain = ctx.todos.create(OWNER, &TodoDraft::new("Once")).unwrap();
        assert!(next_occurrence(&plain).is_none());

        let missing_due = ctx.todos.create(
            OWNER,
            &TodoDraft {
                recurrence: Recurrence::Daily,
                ..TodoDraft::new("Broken")
            },
        );
        assert!(matches!(missing_due, Err(TodoError::RecurrenceWithoutDueDate)));
    }

    #[test_context(RecurrenceTestContext)]
    #[test]
    fn test_toggle_spawns_next_occurrence(ctx: &mut RecurrenceTestContext) {
        let water = ctx
            .todos
            .create(
                OWNER,
                &TodoDraft {
                    project: Some("Home".to_string()),
                    due_date: Some(date(2025, 5, 10)),
                    reminder_at: Some(at(2025, 5, 10, 8, 0)),
                    priority: Priority::High,
                    status: Status::InProgress,
                    recurrence: Recurrence::Daily,
                    tags: vec!["garden".to_string()],
                    ..TodoDraft::new("Water plants")
                },
            )
            .unwrap();

        ctx.todos.toggle(OWNER, water.id).unwrap();

        let items = all(&ctx.todos);
        assert_eq!(items.len(), 2);
        assert!(items[0].completed);
        let next = &items[1];
        assert_eq!(next.title, "Water plants");
        assert_eq!(next.project, "Home");
        assert_eq!(next.tags, vec!["garden".to_string()]);
        assert_eq!(next.priority, Priority::High);
        assert_eq!(next.status, Status::Todo);
        assert_eq!(next.recurrence, Recurrence::Daily);
        assert_eq!(next.due_date, Some(date(2025, 5, 11)));
        assert_eq!(next.reminder_at, Some(at(2025, 5, 11, 8, 0)));
        assert!(!next.completed);

        // Reopening never spawns, and undo restores exactly one task.
        ctx.todos.toggle(OWNER, water.id).unwrap();
        assert_eq!(all(&ctx.todos).len(), 2);
        ctx.todos.undo(OWNER).unwrap();
        ctx.todos.undo(OWNER).unwrap();
        assert_eq!(all(&ctx.todos), vec![water]);
    }

    #[test_context(RecurrenceTestContext)]
    #[test]
    fn test_spawn_keeps_active_parent(ctx: &mut RecurrenceTestContext) {
        let parent = ctx.todos.create(OWNER, &TodoDraft::new("Chores")).unwrap();
        let child = ctx
            .todos
            .create(
                OWNER,
                &TodoDraft {
                    parent_id: Some(parent.id),
                    due_date: Some(date(2025, 1, 31)),
                    recurrence: Recurrence::Monthly,
                    ..TodoDraft::new("Pay rent")
                },
            )
            .unwrap();

        ctx.todos.toggle(OWNER, child.id).unwrap();

        let spawned = all(&ctx.todos).into_iter().last().unwrap();
        assert_ne!(spawned.id, child.id);
        assert_eq!(spawned.parent_id, Some(parent.id));
        assert_eq!(spawned.due_date, Some(date(2025, 2, 28)));
    }

    #[test_context(RecurrenceTestContext)]
    #[test]
    fn test_spawn_drops_completed_parent(ctx: &mut RecurrenceTestContext) {
        let parent = ctx.todos.create(OWNER, &TodoDraft::new("Sprint")).unwrap();
        let child = ctx
            .todos
            .create(
                OWNER,
                &TodoDraft {
                    parent_id: Some(parent.id),
                    due_date: Some(date(2025, 4, 1)),
                    recurrence: Recurrence::Weekly,
                    ..TodoDraft::new("Standup notes")
                },
            )
            .unwrap();

        let outcome = ctx
            .todos
            .batch_update(
                OWNER,
                &[parent.id, child.id],
                &BatchUpdate {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(outcome.count, 2);

        let items = all(&ctx.todos);
        assert_eq!(items.len(), 3);
        let spawned = &items[2];
        assert_eq!(spawned.title, "Standup notes");
        assert_eq!(spawned.parent_id, None);
        assert_eq!(spawned.due_date, Some(date(2025, 4, 8)));
    }
}
