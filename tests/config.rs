#[cfg(test)]
mod tests {
    use std::env;
    use std::path::PathBuf;
    use todo_harbor::libs::config::{Config, DEFAULT_UNDO_HISTORY_LIMIT};
    use todo_harbor::libs::data_storage::DataStorage;
    use todo_harbor::libs::query::DEFAULT_PAGE_SIZE;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ConfigTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            ConfigTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }

        fn teardown(self) {
            for key in ["UNDO_HISTORY_LIMIT", "HARBOR_OWNER", "DB_FILE", "DATA_DIR"] {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.owner_id, 1);
        assert_eq!(config.undo_history_limit, DEFAULT_UNDO_HISTORY_LIMIT);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.db_file.is_none());
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"owner_id": 42}"#).unwrap();
        assert_eq!(config.owner_id, 42);
        assert_eq!(config.undo_history_limit, DEFAULT_UNDO_HISTORY_LIMIT);

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("db_file"));
    }

    // Every environment mutation lives in this one test so parallel tests
    // never observe each other's variables.
    #[test_context(ConfigTestContext)]
    #[test]
    fn test_environment_overrides(ctx: &mut ConfigTestContext) {
        let db_file = ctx.temp_dir.path().join("nested").join("tasks.db");
        env::set_var("UNDO_HISTORY_LIMIT", " 7 ");
        env::set_var("HARBOR_OWNER", "not-a-number");
        env::set_var("DB_FILE", &db_file);
        env::set_var("DATA_DIR", ctx.temp_dir.path());

        let config = Config::default().with_env_overrides();
        assert_eq!(config.undo_history_limit, 7);
        assert_eq!(config.owner_id, 1);
        assert_eq!(config.db_file, Some(db_file.clone()));

        assert_eq!(config.db_path().unwrap(), db_file);
        assert!(ctx.temp_dir.path().join("nested").is_dir());

        assert_eq!(DataStorage::new().base_path(), ctx.temp_dir.path());

        config.save().unwrap();
        let read = Config::read().unwrap();
        assert_eq!(read.undo_history_limit, 7);
        assert_eq!(read.db_file, Some(PathBuf::from(&db_file)));
    }
}
