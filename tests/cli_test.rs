// Smoke tests for the compiled binary
use std::process::Command;

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_git-sync-publish"))
}

#[test]
fn test_help_lists_options() {
    let output = binary().arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--config", "--path", "--yes", "--verbose"] {
        assert!(stdout.contains(flag), "missing {} in:\n{}", flag, stdout);
    }
}

#[test]
fn test_version_flag() {
    let output = binary().arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unreadable_config_exits_with_error() {
    let output = binary()
        .args(["--config", "/nonexistent/gitsync.toml"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error loading config"));
}
