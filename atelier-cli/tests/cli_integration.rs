//! CLI integration tests for atelier-cli.
//!
//! These tests verify the CLI behavior by running the actual binary and
//! checking outputs and exit codes. No server is started; network-touching
//! commands are pointed at an unroutable address and must fail cleanly.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a Command for the atelier binary.
fn atelier() -> Command {
    Command::cargo_bin("atelier").unwrap()
}

/// A base URL nothing listens on. Port 1 is reserved and unbound.
const DEAD_SERVER: &str = "http://127.0.0.1:1";

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_displays_usage() {
    atelier()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Moderation console"))
        .stdout(predicate::str::contains("queue"))
        .stdout(predicate::str::contains("approve"))
        .stdout(predicate::str::contains("reject"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn test_version_displays_version() {
    atelier()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("atelier"));
}

#[test]
fn test_approve_help_shows_options() {
    atelier()
        .args(["approve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LISTING_ID"))
        .stdout(predicate::str::contains("--reason"));
}

#[test]
fn test_report_help_shows_options() {
    atelier()
        .args(["report", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LISTING_ID"))
        .stdout(predicate::str::contains("--reason"));
}

// ============================================================================
// Argument Validation Tests
// ============================================================================

#[test]
fn test_show_rejects_malformed_id() {
    atelier()
        .args(["show", "not-a-uuid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_approve_requires_reason() {
    atelier()
        .args(["approve", "550e8400-e29b-41d4-a716-446655440000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--reason"));
}

#[test]
fn test_approve_rejects_empty_reason_without_network() {
    // Validated client-side, so the dead server address is never dialed
    atelier()
        .args([
            "--server",
            DEAD_SERVER,
            "approve",
            "550e8400-e29b-41d4-a716-446655440000",
            "--reason",
            "   ",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-empty reason"));
}

#[test]
fn test_report_rejects_empty_reason_without_network() {
    atelier()
        .args([
            "--server",
            DEAD_SERVER,
            "report",
            "550e8400-e29b-41d4-a716-446655440000",
            "--reason",
            "",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-empty reason"));
}

// ============================================================================
// Connection Error Tests
// ============================================================================

#[test]
fn test_queue_fails_cleanly_when_server_unreachable() {
    atelier()
        .args(["--server", DEAD_SERVER, "queue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to reach"));
}

#[test]
fn test_health_fails_cleanly_when_server_unreachable() {
    atelier()
        .args(["--server", DEAD_SERVER, "health"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to reach"));
}
