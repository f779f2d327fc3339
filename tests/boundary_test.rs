use sqlbundle::boundary::SelectionWarning;
use sqlbundle::ui;

// ============================================================================
// SelectionWarning Display Tests
// ============================================================================

#[test]
fn test_skipped_by_pattern_display() {
    let warning = SelectionWarning::SkippedByPattern {
        path: "docs/notes.txt".to_string(),
        pattern: "*.sql".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("docs/notes.txt"),
        "Message should name the skipped path, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("*.sql"),
        "Message should name the pattern, got: {}",
        display_msg
    );
}

#[test]
fn test_skipped_deleted_display() {
    let warning = SelectionWarning::SkippedDeleted {
        path: "db/old_proc.sql".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("db/old_proc.sql"),
        "Message should name the deleted path, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("no longer"),
        "Message should say the file is gone, got: {}",
        display_msg
    );
}

#[test]
fn test_no_database_state_display() {
    let display_msg = SelectionWarning::NoDatabaseState.to_string();
    assert!(
        display_msg.contains("No database"),
        "Message should mention the missing database, got: {}",
        display_msg
    );
}

#[test]
fn test_no_recorded_release_display() {
    let warning = SelectionWarning::NoRecordedRelease {
        database: "svr09/tdi".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("svr09/tdi"),
        "Message should name the database, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("repository root"),
        "Message should say where the range starts, got: {}",
        display_msg
    );
}

#[test]
fn test_explicit_file_list_display() {
    let warning = SelectionWarning::ExplicitFileList { count: 3 };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains('3'),
        "Message should include the file count, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("not scanned"),
        "Message should say the range was skipped, got: {}",
        display_msg
    );
}

// ============================================================================
// SelectionWarning Equality Tests
// ============================================================================

#[test]
fn test_selection_warning_equality() {
    let a = SelectionWarning::SkippedDeleted {
        path: "a.sql".to_string(),
    };
    let b = SelectionWarning::SkippedDeleted {
        path: "a.sql".to_string(),
    };
    let c = SelectionWarning::SkippedDeleted {
        path: "b.sql".to_string(),
    };

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_ne!(a, SelectionWarning::NoDatabaseState);
}

// ============================================================================
// UI Display Function Tests
// ============================================================================

#[test]
fn test_display_selection_warning_does_not_panic() {
    let warnings = vec![
        SelectionWarning::SkippedByPattern {
            path: "z.txt".to_string(),
            pattern: "*.sql".to_string(),
        },
        SelectionWarning::SkippedDeleted {
            path: "y.sql".to_string(),
        },
        SelectionWarning::NoDatabaseState,
        SelectionWarning::NoRecordedRelease {
            database: "svr09/tdi".to_string(),
        },
        SelectionWarning::ExplicitFileList { count: 0 },
    ];

    for warning in &warnings {
        ui::display_selection_warning(warning);
    }
}
