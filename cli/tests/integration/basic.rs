//! Basic functionality integration tests for tstore CLI.

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{TestFixture, count_entries, tree_snapshot};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_copy_tree() {
    let fx = TestFixture::new();
    fx.create_scenario_tree();

    cargo_bin_cmd!("tstore")
        .arg("copy")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::contains("Copied 2 files"));

    fx.assert_file_content(&fx.dst.path().join("a.txt"), "alpha");
    fx.assert_file_content(&fx.dst.path().join("sub/b.txt"), "beta");
}

#[test]
fn test_copy_reproduces_tree_exactly() {
    let fx = TestFixture::new();
    fx.write("one/two/three/deep.bin", "deep");
    fx.write("one/side.txt", "side");
    fx.write("top.txt", "");
    fx.mkdir("empty/nested");

    cargo_bin_cmd!("tstore")
        .args(["copy", "-q"])
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .success();

    assert_eq!(tree_snapshot(fx.src.path()), tree_snapshot(fx.dst.path()));
}

#[test]
fn test_flush_tree_keeps_root() {
    let fx = TestFixture::new();
    fx.create_scenario_tree();

    cargo_bin_cmd!("tstore")
        .args(["flush", "-q"])
        .arg(fx.src.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 files and 1 directories"));

    assert!(fx.src.path().is_dir());
    assert_eq!(count_entries(fx.src.path()), 0);
}

#[test]
fn test_copy_json_output() {
    let fx = TestFixture::new();
    fx.create_scenario_tree();

    let output = cargo_bin_cmd!("tstore")
        .args(["copy", "--output", "json"])
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "ok");
    assert_eq!(value["operation"], "copy");
    assert_eq!(value["files_copied"], 2);
    assert_eq!(value["dirs_created"], 1);
    assert_eq!(value["bytes_copied"], 9);
}

#[test]
fn test_flush_json_output() {
    let fx = TestFixture::new();
    fx.create_scenario_tree();

    let output = cargo_bin_cmd!("tstore")
        .args(["flush", "--output", "json", "-x", "sub"])
        .arg(fx.src.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["operation"], "flush");
    assert_eq!(value["files_removed"], 1);
    assert_eq!(value["dirs_removed"], 0);
    assert_eq!(value["entries_excluded"], 2);
}

#[test]
fn test_verbose_lists_entries() {
    let fx = TestFixture::new();
    fx.create_scenario_tree();

    cargo_bin_cmd!("tstore")
        .args(["flush", "-v"])
        .arg(fx.src.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("removed"))
        .stderr(predicate::str::contains("a.txt"));
}

#[test]
fn test_mkfile_in_root() {
    let root = TempDir::new().unwrap();

    let output = cargo_bin_cmd!("tstore")
        .args(["mkfile", "--prefix", "job_", "--root"])
        .arg(root.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let printed = String::from_utf8(output.stdout).unwrap();
    let path = std::path::PathBuf::from(printed.trim());
    assert!(path.is_file());
    assert_eq!(path.parent().unwrap(), root.path());
    assert!(
        path.file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("job_")
    );
    assert_eq!(fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn test_mkdir_json_output() {
    let root = TempDir::new().unwrap();

    let output = cargo_bin_cmd!("tstore")
        .args(["mkdir", "--output", "json", "--root"])
        .arg(root.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["kind"], "directory");
    let path = std::path::PathBuf::from(value["path"].as_str().unwrap());
    assert!(path.is_dir());
    assert!(
        path.file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("sm_")
    );
}

#[test]
fn test_mkdir_falls_back_to_temp_dir() {
    let base = TempDir::new().unwrap();
    let missing = base.path().join("missing");

    let output = cargo_bin_cmd!("tstore")
        .args(["mkdir", "--root"])
        .arg(&missing)
        .output()
        .unwrap();
    assert!(output.status.success());

    let printed = String::from_utf8(output.stdout).unwrap();
    let path = std::path::PathBuf::from(printed.trim());
    assert!(path.is_dir());
    assert!(!missing.exists());
    fs::remove_dir(&path).unwrap();
}
