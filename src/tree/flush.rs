//! Recursive delete with exclusions.
//!
//! The tree is walked bottom-up so a directory is only reached after all of
//! its children. Files are deleted, directories are removed with
//! `remove_dir`, which requires them to be empty. A directory that still
//! holds an excluded child therefore fails the flush instead of being
//! skipped, unless the directory itself is excluded. The root is never
//! removed.

use crate::error::{AccessSide, Error, Result};
use crate::options::TreeOptions;
use crate::utils::access::ensure_accessible;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;

use super::walk::{Order, Walker};

/// Statistics from a flush operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FlushStats {
    /// Number of files deleted
    pub files_removed: u64,
    /// Number of directories removed
    pub dirs_removed: u64,
    /// Number of entries kept because they matched an exclusion
    pub entries_excluded: u64,
    /// Duration of the flush operation
    pub duration: std::time::Duration,
}

/// Delete everything below `root` that is not excluded.
///
/// `root` itself stays in place; removing it is up to the caller once the
/// flush succeeded.
///
/// # Errors
///
/// Returns an error if:
/// - `root` is not readable and writable ([`Error::Access`], before
///   anything is touched)
/// - Any listing, file deletion or directory removal fails
///   ([`Error::Flush`]), including removing a directory that still holds
///   excluded entries. Entries removed before the failure stay removed.
pub fn flush_tree<P: AsRef<Path>>(root: P, options: &TreeOptions) -> Result<FlushStats> {
    let start_time = Instant::now();
    let root = root.as_ref();

    ensure_accessible(root, AccessSide::Root)?;

    let matcher = options.matcher()?;
    let mut stats = FlushStats::default();

    for entry in Walker::new(root, Order::BottomUp).map_err(Error::into_flush)? {
        let entry = entry.map_err(Error::into_flush)?;

        if matcher.matches_path(&entry.relative) {
            stats.entries_excluded += 1;
            options.verbose(&format!("kept {}", entry.relative.display()));
            continue;
        }

        let flush_err = |source: io::Error| Error::Flush {
            path: entry.path.clone(),
            source,
        };

        if entry.is_dir {
            fs::remove_dir(&entry.path).map_err(flush_err)?;
            stats.dirs_removed += 1;
        } else {
            fs::remove_file(&entry.path).map_err(flush_err)?;
            stats.files_removed += 1;
        }
        options.verbose(&format!("removed {}", entry.path.display()));
    }

    stats.duration = start_time.elapsed();
    Ok(stats)
}

// =============================================================================
// Tests
// =============================================================================
