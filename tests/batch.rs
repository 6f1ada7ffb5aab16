#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use todo_harbor::db::batch::{BatchUpdate, MAX_BATCH_SIZE};
    use todo_harbor::db::{db::Db, todos::Todos};
    use todo_harbor::libs::error::TodoError;
    use todo_harbor::libs::todo::{Priority, Recurrence, Status, Todo, TodoDraft};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    const OWNER: i64 = 5;

    struct BatchTestContext {
        _temp_dir: TempDir,
        todos: Todos,
    }

    impl TestContext for BatchTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("todos.db")).unwrap();
            BatchTestContext {
                todos: Todos::open(db, 20),
                _temp_dir: temp_dir,
            }
        }
    }

    impl BatchTestContext {
        fn add(&self, title: &str, parent_id: Option<i64>) -> Todo {
            self.todos
                .create(
                    OWNER,
                    &TodoDraft {
                        parent_id,
                        ..TodoDraft::new(title)
                    },
                )
                .unwrap()
        }

        fn fetch(&self, id: i64) -> Todo {
            self.todos.get(OWNER, id).unwrap().unwrap()
        }
    }

    fn complete() -> BatchUpdate {
        BatchUpdate {
            completed: Some(true),
            ..Default::default()
        }
    }

    #[test_context(BatchTestContext)]
    #[test]
    fn test_parent_and_children_complete_together(ctx: &mut BatchTestContext) {
        let root = ctx.add("Release", None);
        let mid = ctx.add("Build", Some(root.id));
        let leaf = ctx.add("Tag", Some(mid.id));

        let outcome = ctx.todos.batch_update(OWNER, &[root.id, mid.id, leaf.id], &complete()).unwrap();

        assert_eq!(outcome.count, 3);
        assert!(outcome.skipped.is_empty());
        for id in [root.id, mid.id, leaf.id] {
            let todo = ctx.fetch(id);
            assert!(todo.completed);
            assert!(todo.completed_at.is_some());
        }
    }

    #[test_context(BatchTestContext)]
    #[test]
    fn test_parent_with_active_child_outside_batch_is_excluded(ctx: &mut BatchTestContext) {
        let parent = ctx.add("Parent", None);
        let _outside = ctx.add("Outside", Some(parent.id));
        let other = ctx.add("Other", None);

        let outcome = ctx.todos.batch_update(OWNER, &[parent.id, other.id], &complete()).unwrap();

        assert_eq!(outcome.ids, vec![other.id]);
        assert_eq!(outcome.skipped, vec![parent.id]);
        assert!(!ctx.fetch(parent.id).completed);
        assert!(ctx.fetch(other.id).completed);
    }

    #[test_context(BatchTestContext)]
    #[test]
    fn test_excluded_parent_still_gets_field_changes(ctx: &mut BatchTestContext) {
        let parent = ctx.add("Parent", None);
        let _outside = ctx.add("Outside", Some(parent.id));

        let outcome = ctx
            .todos
            .batch_update(
                OWNER,
                &[parent.id],
                &BatchUpdate {
                    completed: Some(true),
                    priority: Some(Priority::High),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(outcome.ids, vec![parent.id]);
        let parent = ctx.fetch(parent.id);
        assert!(!parent.completed);
        assert_eq!(parent.priority, Priority::High);
    }

    #[test_context(BatchTestContext)]
    #[test]
    fn test_field_changes_apply_to_all_targets(ctx: &mut BatchTestContext) {
        let a = ctx.add("A", None);
        let b = ctx.add("B", None);
        let due = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();

        let outcome = ctx
            .todos
            .batch_update(
                OWNER,
                &[a.id, b.id, b.id, 999],
                &BatchUpdate {
                    project: Some("  Ops ".to_string()),
                    due_date: Some(Some(due)),
                    status: Some(Status::Blocked),
                    recurrence: Some(Recurrence::Weekly),
                    tags: Some(vec!["Infra".to_string(), "infra".to_string()]),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(outcome.count, 2);
        assert_eq!(outcome.skipped, vec![999]);
        for id in [a.id, b.id] {
            let todo = ctx.fetch(id);
            assert_eq!(todo.project, "Ops");
            assert_eq!(todo.due_date, Some(due));
            assert_eq!(todo.status, Status::Blocked);
            assert_eq!(todo.recurrence, Recurrence::Weekly);
            assert_eq!(todo.tags, vec!["Infra".to_string()]);
        }
    }

    #[test_context(BatchTestContext)]
    #[test]
    fn test_clearing_due_date_ends_recurrence(ctx: &mut BatchTestContext) {
        let todo = ctx
            .todos
            .create(
                OWNER,
                &TodoDraft {
                    due_date: NaiveDate::from_ymd_opt(2025, 2, 2),
                    recurrence: Recurrence::Daily,
                    ..TodoDraft::new("Daily")
                },
            )
            .unwrap();

        ctx.todos
            .batch_update(
                OWNER,
                &[todo.id],
                &BatchUpdate {
                    due_date: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();

        let todo = ctx.fetch(todo.id);
        assert_eq!(todo.due_date, None);
        assert_eq!(todo.recurrence, Recurrence::None);
    }

    #[test_context(BatchTestContext)]
    #[test]
    fn test_reopen_clears_completion(ctx: &mut BatchTestContext) {
        let a = ctx.add("A", None);
        ctx.todos.toggle(OWNER, a.id).unwrap();

        let outcome = ctx
            .todos
            .batch_update(
                OWNER,
                &[a.id],
                &BatchUpdate {
                    completed: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(outcome.count, 1);
        let a = ctx.fetch(a.id);
        assert!(!a.completed);
        assert_eq!(a.completed_at, None);
    }

    #[test_context(BatchTestContext)]
    #[test]
    fn test_rejected_batches(ctx: &mut BatchTestContext) {
        let a = ctx.add("A", None);

        let empty = ctx.todos.batch_update(OWNER, &[a.id], &BatchUpdate::default());
        assert!(matches!(empty, Err(TodoError::EmptyBatch)));

        let ids: Vec<i64> = (1..=(MAX_BATCH_SIZE as i64 + 1)).collect();
        let too_large = ctx.todos.batch_update(OWNER, &ids, &complete());
        assert!(matches!(too_large, Err(TodoError::BatchTooLarge { max: 500, got: 501 })));

        let no_due = ctx.todos.batch_update(
            OWNER,
            &[a.id],
            &BatchUpdate {
                recurrence: Some(Recurrence::Monthly),
                ..Default::default()
            },
        );
        assert!(matches!(no_due, Err(TodoError::RecurrenceWithoutDueDate)));

        assert_eq!(ctx.todos.undo_depth(OWNER).unwrap(), 1);
    }

    #[test_context(BatchTestContext)]
    #[test]
    fn test_duplicates_count_once_toward_limit(ctx: &mut BatchTestContext) {
        let a = ctx.add("A", None);
        let ids = vec![a.id; MAX_BATCH_SIZE + 10];

        let outcome = ctx.todos.batch_update(OWNER, &ids, &complete()).unwrap();
        assert_eq!(outcome.ids, vec![a.id]);
    }

    #[test_context(BatchTestContext)]
    #[test]
    fn test_batch_without_targets_is_noop(ctx: &mut BatchTestContext) {
        let parent = ctx.add("Parent", None);
        let _child = ctx.add("Child", Some(parent.id));
        let depth = ctx.todos.undo_depth(OWNER).unwrap();

        let unknown = ctx.todos.batch_update(OWNER, &[404, -1], &complete()).unwrap();
        assert_eq!(unknown.count, 0);
        assert_eq!(unknown.skipped, vec![404]);

        let blocked = ctx.todos.batch_update(OWNER, &[parent.id], &complete()).unwrap();
        assert_eq!(blocked.count, 0);
        assert_eq!(blocked.skipped, vec![parent.id]);

        assert_eq!(ctx.todos.undo_depth(OWNER).unwrap(), depth);
    }

    #[test_context(BatchTestContext)]
    #[test]
    fn test_batch_is_one_undo_step(ctx: &mut BatchTestContext) {
        let a = ctx.add("A", None);
        let b = ctx.add("B", None);

        ctx.todos.batch_update(OWNER, &[a.id, b.id], &complete()).unwrap();
        ctx.todos.undo(OWNER).unwrap();

        assert!(!ctx.fetch(a.id).completed);
        assert!(!ctx.fetch(b.id).completed);
    }
}
