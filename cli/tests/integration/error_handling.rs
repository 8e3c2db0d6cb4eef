//! Error handling integration tests for tstore CLI.
//!
//! These tests verify proper error handling behaviors:
//! - Inaccessible roots fail before anything is touched
//! - Mid-traversal failures abort with the right error code
//! - Invalid arguments exit with code 2

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{TestFixture, count_entries};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A missing source is reported as an access error and the destination
/// stays untouched.
#[test]
fn test_copy_source_not_accessible() {
    let fx = TestFixture::new();
    let missing = fx.src.path().join("missing");

    cargo_bin_cmd!("tstore")
        .arg("copy")
        .arg(&missing)
        .arg(fx.dst.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error[access_denied]"))
        .stderr(predicate::str::contains("source path is not accessible"));

    assert_eq!(count_entries(fx.dst.path()), 0);
}

#[test]
fn test_copy_destination_not_accessible() {
    let fx = TestFixture::new();
    fx.create_scenario_tree();
    let missing = fx.dst.path().join("missing");

    cargo_bin_cmd!("tstore")
        .arg("copy")
        .arg(fx.src.path())
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("destination path is not accessible"));

    assert!(!missing.exists());
}

#[test]
fn test_flush_root_not_accessible() {
    let base = TempDir::new().unwrap();

    cargo_bin_cmd!("tstore")
        .arg("flush")
        .arg(base.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("root path is not accessible"));
}

#[cfg(unix)]
#[test]
fn test_read_only_source_not_accessible() {
    use std::os::unix::fs::PermissionsExt;

    // root bypasses permission bits
    // SAFETY: geteuid has no preconditions and cannot fail
    if unsafe { libc::geteuid() } == 0 {
        return;
    }

    let fx = TestFixture::new();
    fx.create_scenario_tree();
    fs::set_permissions(fx.src.path(), fs::Permissions::from_mode(0o500)).unwrap();

    let assert = cargo_bin_cmd!("tstore")
        .arg("copy")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert();

    fs::set_permissions(fx.src.path(), fs::Permissions::from_mode(0o700)).unwrap();

    assert
        .failure()
        .stderr(predicate::str::contains("error[access_denied]"));
    assert_eq!(count_entries(fx.dst.path()), 0);
}

/// A file in the source that collides with a directory in the destination
/// aborts the copy.
#[test]
fn test_copy_file_over_directory_fails() {
    let fx = TestFixture::new();
    fx.write("clash", "file content");
    fs::create_dir(fx.dst.path().join("clash")).unwrap();
    fs::write(fx.dst.path().join("clash/inside.txt"), "inside").unwrap();

    cargo_bin_cmd!("tstore")
        .arg("copy")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[copy_failed]"));

    assert_eq!(
        fs::read_to_string(fx.dst.path().join("clash/inside.txt")).unwrap(),
        "inside"
    );
}

#[test]
fn test_copy_into_itself_is_invalid_input() {
    let fx = TestFixture::new();
    fx.create_scenario_tree();

    cargo_bin_cmd!("tstore")
        .arg("copy")
        .arg(fx.src.path())
        .arg(fx.src.path().join("sub"))
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("error[invalid_input]"));

    assert_eq!(count_entries(&fx.src.path().join("sub")), 1);
}

#[test]
fn test_empty_exclusion_rejected() {
    let fx = TestFixture::new();
    fx.create_scenario_tree();

    cargo_bin_cmd!("tstore")
        .args(["flush", "-x", ""])
        .arg(fx.src.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("must not be empty"));

    assert!(fx.src.path().join("a.txt").exists());
}

#[test]
fn test_error_json_record() {
    let base = TempDir::new().unwrap();

    let output = cargo_bin_cmd!("tstore")
        .args(["flush", "--output", "json"])
        .arg(base.path().join("missing"))
        .output()
        .unwrap();
    assert!(!output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "failed");
    assert_eq!(value["error_code"], "access_denied");
    assert!(
        value["error_message"]
            .as_str()
            .unwrap()
            .contains("not accessible")
    );
}

#[test]
fn test_missing_subcommand_is_usage_error() {
    cargo_bin_cmd!("tstore")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}
