//! Exclusion behaviour of copy and flush through the tstore CLI.

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::TestFixture;
use predicates::prelude::*;
use rstest::rstest;

fn build_cache_tree(fx: &TestFixture) {
    fx.write("cache/sub/file.txt", "cached bytes");
    fx.write("cached/file.txt", "real data");
    fx.write("notes.txt", "notes");
}

#[rstest]
#[case::fragment_itself("cache", false)]
#[case::descendant("cache/sub/file.txt", false)]
#[case::prefix_sibling("cached/file.txt", true)]
#[case::unrelated("notes.txt", true)]
fn test_copy_exclusion_is_separator_anchored(#[case] rel: &str, #[case] copied: bool) {
    let fx = TestFixture::new();
    build_cache_tree(&fx);

    cargo_bin_cmd!("tstore")
        .args(["copy", "-q", "-x", "cache"])
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .success();

    assert_eq!(fx.dst.path().join(rel).exists(), copied, "{rel}");
}

#[rstest]
#[case::kept_fragment("cache", true)]
#[case::kept_descendant("cache/sub/file.txt", true)]
#[case::removed_sibling("cached", false)]
#[case::removed_file("notes.txt", false)]
fn test_flush_exclusion_is_separator_anchored(#[case] rel: &str, #[case] kept: bool) {
    let fx = TestFixture::new();
    build_cache_tree(&fx);

    cargo_bin_cmd!("tstore")
        .args(["flush", "-q", "-x", "cache"])
        .arg(fx.src.path())
        .assert()
        .success();

    assert_eq!(fx.src.path().join(rel).exists(), kept, "{rel}");
}

#[test]
fn test_fragments_are_literal() {
    let fx = TestFixture::new();
    fx.write("a.b", "dot");
    fx.write("axb", "x");

    cargo_bin_cmd!("tstore")
        .args(["copy", "-q", "-x", "a.b"])
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .success();

    assert!(!fx.dst.path().join("a.b").exists());
    fx.assert_file_content(&fx.dst.path().join("axb"), "x");
}

#[test]
fn test_multiple_exclusions() {
    let fx = TestFixture::new();
    fx.write("logs/today.log", "log");
    fx.write("tmp/scratch", "tmp");
    fx.write("data/keep.csv", "a,b");

    cargo_bin_cmd!("tstore")
        .args(["copy", "-q", "-x", "logs", "--exclude", "tmp"])
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("excluded 4 entries"));

    assert!(!fx.dst.path().join("logs").exists());
    assert!(!fx.dst.path().join("tmp").exists());
    fx.assert_file_content(&fx.dst.path().join("data/keep.csv"), "a,b");
}

/// Flushing twice with the same exclusions: the second run removes nothing.
#[test]
fn test_flush_is_idempotent() {
    let fx = TestFixture::new();
    fx.create_scenario_tree();

    for expected in ["Removed 1 files", "Removed 0 files"] {
        cargo_bin_cmd!("tstore")
            .args(["flush", "-q", "-x", "sub"])
            .arg(fx.src.path())
            .assert()
            .success()
            .stdout(predicate::str::contains(expected));
    }

    assert!(!fx.src.path().join("a.txt").exists());
    fx.assert_file_content(&fx.src.path().join("sub/b.txt"), "beta");
}

/// Keeping a single file inside a directory leaves that directory non-empty,
/// so removing it fails the flush after its other children are gone.
#[cfg(unix)]
#[test]
fn test_flush_excluded_child_blocks_parent() {
    let fx = TestFixture::new();
    fx.create_scenario_tree();
    fx.write("sub/c.txt", "gamma");

    cargo_bin_cmd!("tstore")
        .args(["flush", "-q", "-x", "sub/b.txt"])
        .arg(fx.src.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error[flush_failed]"));

    assert!(!fx.src.path().join("sub/c.txt").exists());
    assert!(fx.src.path().join("sub/b.txt").exists());
}
