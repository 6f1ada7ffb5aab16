#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use todo_harbor::libs::error::TodoError;
    use todo_harbor::libs::normalize::{
        normalize_project, normalize_tags, normalize_title, parse_date, parse_date_time, parse_optional_date, parse_tag_list, require_owner,
        tags_to_json, DEFAULT_PROJECT,
    };
    use todo_harbor::libs::todo::{Priority, Recurrence, Status};

    #[test]
    fn test_owner_must_be_positive() {
        assert_eq!(require_owner(3).unwrap(), 3);
        assert!(matches!(require_owner(0), Err(TodoError::OwnerRequired(0))));
        assert!(matches!(require_owner(-2), Err(TodoError::OwnerRequired(-2))));
    }

    #[test]
    fn test_title_bounds() {
        assert_eq!(normalize_title("  Buy milk ").unwrap(), "Buy milk");
        assert!(normalize_title("   ").is_err());
        assert!(normalize_title(&"é".repeat(200)).is_ok());
        assert!(matches!(normalize_title(&"x".repeat(201)), Err(TodoError::InvalidTitle { max: 200 })));
    }

    #[test]
    fn test_project_defaults_and_bounds() {
        assert_eq!(normalize_project(None).unwrap(), DEFAULT_PROJECT);
        assert_eq!(normalize_project(Some("  ")).unwrap(), DEFAULT_PROJECT);
        assert_eq!(normalize_project(Some(" Work ")).unwrap(), "Work");
        assert!(matches!(normalize_project(Some(&"p".repeat(81))), Err(TodoError::InvalidProject { max: 80 })));
    }

    #[test]
    fn test_tags_are_an_ordered_case_insensitive_set() {
        let tags = normalize_tags(["#Work", " work ", "", "home", "#", "averyveryverylongtagname"]);
        assert_eq!(tags, vec!["Work".to_string(), "home".to_string(), "averyveryverylongtag".to_string()]);

        let many: Vec<String> = (0..30).map(|i| format!("t{}", i)).collect();
        assert_eq!(normalize_tags(&many).len(), 20);
    }

    #[test]
    fn test_tag_text_forms() {
        assert_eq!(parse_tag_list(r#"["a","b"]"#), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(parse_tag_list("a, b ,#c"), vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        assert!(parse_tag_list("  ").is_empty());
        assert_eq!(tags_to_json(&["x".to_string(), "X".to_string()]), r#"["x"]"#);
    }

    #[test]
    fn test_dates_are_strict() {
        assert_eq!(parse_date("2024-02-29").unwrap(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(matches!(parse_date("2023-02-29"), Err(TodoError::InvalidDate(_))));
        assert!(parse_date("2024-2-9").is_err());
        assert!(parse_date("2024/02/09").is_err());
        assert_eq!(parse_optional_date(Some(" ")).unwrap(), None);
        assert_eq!(parse_optional_date(None).unwrap(), None);
    }

    #[test]
    fn test_date_times_are_strict() {
        let parsed = parse_date_time("2025-01-02T23:59").unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap().and_hms_opt(23, 59, 0).unwrap());
        assert!(matches!(parse_date_time("2025-01-02T24:00"), Err(TodoError::InvalidDateTime(_))));
        assert!(parse_date_time("2025-01-02 10:00").is_err());
        assert!(parse_date_time("2025-01-02T10:60").is_err());
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!(Priority::parse(" HIGH "), Some(Priority::High));
        assert_eq!(Priority::parse("urgent"), None);
        assert_eq!(Priority::normalize("urgent"), Priority::Medium);
        assert_eq!(Status::normalize("in_progress"), Status::InProgress);
        assert_eq!(Status::normalize("done"), Status::Todo);
        assert_eq!(Recurrence::normalize("yearly"), Recurrence::None);
        assert!(Recurrence::Weekly.is_enabled());
        assert_eq!(Status::InProgress.to_string(), "in_progress");
    }
}
