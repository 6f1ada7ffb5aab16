#[cfg(test)]
mod tests {
    use todo_harbor::db::tree::{completion_eligible, ParentIndex};
    use todo_harbor::db::{db::Db, todos::Todos};
    use todo_harbor::libs::error::TodoError;
    use todo_harbor::libs::todo::{TodoDraft, TodoPatch};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    const OWNER: i64 = 3;

    struct TreeTestContext {
        _temp_dir: TempDir,
        todos: Todos,
    }

    impl TestContext for TreeTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("todos.db")).unwrap();
            TreeTestContext {
                todos: Todos::open(db, 20),
                _temp_dir: temp_dir,
            }
        }
    }

    fn reparent(parent: Option<i64>) -> TodoPatch {
        TodoPatch {
            parent_id: Some(parent),
            ..Default::default()
        }
    }

    #[test_context(TreeTestContext)]
    #[test]
    fn test_reparent_rejects_cycles(ctx: &mut TreeTestContext) {
        let a = ctx.todos.create(OWNER, &TodoDraft::new("A")).unwrap();
        let b = ctx
            .todos
            .create(
                OWNER,
                &TodoDraft {
                    parent_id: Some(a.id),
                    ..TodoDraft::new("B")
                },
            )
            .unwrap();

        let cycle = ctx.todos.update(OWNER, a.id, &reparent(Some(b.id)));
        assert!(matches!(cycle, Err(TodoError::ParentCycle { .. })));

        let own = ctx.todos.update(OWNER, a.id, &reparent(Some(a.id)));
        assert!(matches!(own, Err(TodoError::SelfParent(id)) if id == a.id));

        assert_eq!(ctx.todos.get(OWNER, a.id).unwrap().unwrap().parent_id, None);
        assert_eq!(ctx.todos.undo_depth(OWNER).unwrap(), 2);
    }

    #[test_context(TreeTestContext)]
    #[test]
    fn test_deep_cycle_is_detected(ctx: &mut TreeTestContext) {
        let root = ctx.todos.create(OWNER, &TodoDraft::new("Root")).unwrap();
        let mut last = root.id;
        for i in 0..5 {
            last = ctx
                .todos
                .create(
                    OWNER,
                    &TodoDraft {
                        parent_id: Some(last),
                        ..TodoDraft::new(&format!("Level {}", i))
                    },
                )
                .unwrap()
                .id;
        }

        let result = ctx.todos.update(OWNER, root.id, &reparent(Some(last)));
        assert!(matches!(result, Err(TodoError::ParentCycle { task_id, parent_id }) if task_id == root.id && parent_id == last));
    }

    #[test_context(TreeTestContext)]
    #[test]
    fn test_parent_must_belong_to_owner(ctx: &mut TreeTestContext) {
        let foreign = ctx.todos.create(OWNER + 1, &TodoDraft::new("Elsewhere")).unwrap();
        let result = ctx.todos.create(
            OWNER,
            &TodoDraft {
                parent_id: Some(foreign.id),
                ..TodoDraft::new("Child")
            },
        );
        assert!(matches!(result, Err(TodoError::ParentNotFound(id)) if id == foreign.id));
    }

    #[test_context(TreeTestContext)]
    #[test]
    fn test_has_active_children(ctx: &mut TreeTestContext) {
        let parent = ctx.todos.create(OWNER, &TodoDraft::new("Parent")).unwrap();
        assert!(!ctx.todos.has_active_children(OWNER, parent.id).unwrap());

        let child = ctx
            .todos
            .create(
                OWNER,
                &TodoDraft {
                    parent_id: Some(parent.id),
                    ..TodoDraft::new("Child")
                },
            )
            .unwrap();
        assert!(ctx.todos.has_active_children(OWNER, parent.id).unwrap());

        ctx.todos.toggle(OWNER, child.id).unwrap();
        assert!(!ctx.todos.has_active_children(OWNER, parent.id).unwrap());
    }

    #[test]
    fn test_check_parent_on_index() {
        let index = ParentIndex::from_rows([(1, None, false), (2, Some(1), false), (3, Some(2), false), (4, None, false)]);

        assert!(index.check_parent(4, 3).is_ok());
        assert!(index.check_parent(3, 1).is_ok());
        assert!(matches!(index.check_parent(1, 3), Err(TodoError::ParentCycle { .. })));
        assert!(matches!(index.check_parent(2, 2), Err(TodoError::SelfParent(2))));
    }

    #[test]
    fn test_check_parent_stops_on_corrupt_loop() {
        let index = ParentIndex::from_rows([(1, Some(2), false), (2, Some(1), false), (3, None, false)]);
        assert!(matches!(index.check_parent(3, 1), Err(TodoError::ParentCycle { .. })));
    }

    #[test]
    fn test_subtree_closure() {
        let index = ParentIndex::from_rows([
            (1, None, false),
            (2, Some(1), false),
            (3, Some(1), true),
            (4, Some(2), false),
            (5, None, false),
        ]);

        let mut subtree = index.subtree(1);
        assert_eq!(subtree[0], 1);
        subtree.sort();
        assert_eq!(subtree, vec![1, 2, 3, 4]);
        assert_eq!(index.subtree(5), vec![5]);
        assert!(index.subtree(42).is_empty());
    }

    #[test]
    fn test_completion_eligible_fixed_point() {
        // 1 <- 2 <- 3, and 1 <- 4 (completed)
        let index = ParentIndex::from_rows([(1, None, false), (2, Some(1), false), (3, Some(2), false), (4, Some(1), true)]);

        let all: Vec<i64> = completion_eligible(&index, &[1, 2, 3]).into_iter().collect();
        assert_eq!(all, vec![1, 2, 3]);

        let missing_leaf: Vec<i64> = completion_eligible(&index, &[1, 2]).into_iter().collect();
        assert!(missing_leaf.is_empty());

        let leaf_only: Vec<i64> = completion_eligible(&index, &[3, 99]).into_iter().collect();
        assert_eq!(leaf_only, vec![3]);
    }
}
