//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end: argument handling, exit
//! codes, and the credential failure path. Nothing here touches the
//! network; a run only reaches the Play API once the credentials file
//! loads, so these tests stop at or before that point.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Get the binary to test.
fn stagecast() -> Command {
    Command::cargo_bin("stagecast").unwrap()
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    stagecast()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("staged Play-store rollout"));
}

#[test]
fn test_help_lists_positional_args() {
    stagecast()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("TRACK"))
        .stdout(predicate::str::contains("ROLLOUT_STEPS"))
        .stdout(predicate::str::contains("PACKAGE_NAME"))
        .stdout(predicate::str::contains("WEBHOOK_URL"))
        .stdout(predicate::str::contains("CREDENTIALS_FILE"));
}

#[test]
fn test_version_flag() {
    stagecast()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ============================================================================
// Argument Validation Tests
// ============================================================================

#[test]
fn test_no_args_shows_usage() {
    stagecast().assert().failure().stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_missing_credentials_arg() {
    stagecast()
        .args(["production", "1,20,50,100", "com.example.app", "https://example.test/hook"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CREDENTIALS_FILE"));
}

// ============================================================================
// Credential Failure Tests
// ============================================================================

#[test]
fn test_nonexistent_credentials_file_fails() {
    stagecast()
        .args([
            "production",
            "1,20,50,100",
            "com.example.app",
            "https://example.test/hook",
            "/nonexistent/credentials.json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("credentials"));
}

#[test]
fn test_malformed_credentials_file_fails() {
    let file = assert_fs::NamedTempFile::new("credentials.json").unwrap();
    file.write_str("definitely not json").unwrap();

    stagecast()
        .args([
            "production",
            "1,20,50,100",
            "com.example.app",
            "https://example.test/hook",
            file.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("credentials"));
}

#[test]
fn test_empty_token_fails_before_network() {
    let file = assert_fs::NamedTempFile::new("credentials.json").unwrap();
    file.write_str(r#"{"access_token": ""}"#).unwrap();

    stagecast()
        .args([
            "production",
            "1,20,50,100",
            "com.example.app",
            "https://example.test/hook",
            file.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("access_token is empty"));
}
