use git_sync_publish::boundary::BoundaryWarning;
use git_sync_publish::domain::ChangeCategory;
use git_sync_publish::ui;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_boundary_warning_clean_working_tree_display() {
    let warning = BoundaryWarning::CleanWorkingTree {
        category: ChangeCategory::Fix,
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("nothing to commit"),
        "Message should mention the clean tree, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("'fix'"),
        "Message should name the category, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_no_previous_tag_display() {
    let warning = BoundaryWarning::NoPreviousTag {
        initial: "0.1.0".to_string(),
    };

    assert_eq!(
        warning.to_string(),
        "No previous version tag found, starting at 0.1.0"
    );
}

#[test]
fn test_boundary_warning_tag_collision_display() {
    let warning = BoundaryWarning::TagCollision {
        requested: "v1.3.3".to_string(),
        resolved: "v1.3.4".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(display_msg.contains("v1.3.3"), "got: {}", display_msg);
    assert!(display_msg.contains("v1.3.4"), "got: {}", display_msg);
}

#[test]
fn test_boundary_warning_repository_initialized_display() {
    let warning = BoundaryWarning::RepositoryInitialized {
        branch: "main".to_string(),
    };

    assert!(warning.to_string().contains("branch 'main'"));
}

// ============================================================================
// Formatter Tests
// ============================================================================

#[test]
fn test_display_boundary_warning_prints_every_variant() {
    let warnings = [
        BoundaryWarning::CleanWorkingTree {
            category: ChangeCategory::Other,
        },
        BoundaryWarning::NoPreviousTag {
            initial: "0.1.0".to_string(),
        },
        BoundaryWarning::TagCollision {
            requested: "v2.0.0".to_string(),
            resolved: "v2.0.1".to_string(),
        },
        BoundaryWarning::RepositoryInitialized {
            branch: "trunk".to_string(),
        },
    ];

    for warning in &warnings {
        ui::display_boundary_warning(warning);
    }
}
