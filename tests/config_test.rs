// tests/config_test.rs
use git_sync_publish::config::{load_config, Config};
use git_sync_publish::PublishError;
use serial_test::serial;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.repository.primary_branch, "main");
    assert_eq!(config.repository.remote, "origin");
    assert_eq!(config.tagging.prefix, "v");
    assert_eq!(
        config.tagging.breaking_change_markers,
        vec!["BREAKING CHANGE".to_string(), "BREAKING-CHANGE".to_string()]
    );
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.delay_ms, 2000);
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[repository]
primary_branch = "develop"
remote = "upstream"

[tagging]
prefix = "release-"
breaking_change_markers = ["!!"]

[retry]
max_attempts = 5
delay_ms = 250
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap()), Path::new(".")).unwrap();
    assert_eq!(config.repository.primary_branch, "develop");
    assert_eq!(config.repository.remote, "upstream");
    assert_eq!(config.tagging.prefix, "release-");
    assert_eq!(config.tagging.breaking_change_markers, vec!["!!".to_string()]);

    let policy = config.retry.policy();
    assert_eq!(policy.max_attempts(), 5);
    assert_eq!(policy.delay().as_millis(), 250);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let err = load_config(Some(missing.to_str().unwrap()), dir.path()).unwrap_err();
    assert!(matches!(err, PublishError::Config(_)));
}

#[test]
fn test_invalid_values_are_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"[repository]\nprimary_branch = \"\"\n")
        .unwrap();
    temp_file.flush().unwrap();

    assert!(load_config(Some(temp_file.path().to_str().unwrap()), Path::new(".")).is_err());
}

#[test]
#[serial]
fn test_config_in_working_directory_is_picked_up() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("gitsync.toml"),
        "[repository]\nprimary_branch = \"trunk\"\n",
    )
    .unwrap();

    let original = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let result = load_config(None, Path::new("."));
    std::env::set_current_dir(original).unwrap();

    let config = result.unwrap();
    assert_eq!(config.repository.primary_branch, "trunk");
    assert_eq!(config.repository.remote, "origin");
}

#[test]
fn test_config_in_target_directory_is_picked_up() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("gitsync.toml"),
        "[tagging]\nprefix = \"release-\"\n",
    )
    .unwrap();

    let config = load_config(None, dir.path()).unwrap();
    assert_eq!(config.tagging.prefix, "release-");
}

#[test]
fn test_explicit_path_wins_over_target_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("gitsync.toml"),
        "[tagging]\nprefix = \"release-\"\n",
    )
    .unwrap();

    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[tagging]\nprefix = \"ver\"\n").unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap()), dir.path()).unwrap();
    assert_eq!(config.tagging.prefix, "ver");
}
