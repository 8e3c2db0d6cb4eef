//! Recursive copy with exclusions.
//!
//! The source tree is walked top-down so every destination directory exists
//! before any file is copied into it. Each entry is checked against the
//! exclusion matcher on its own; an excluded directory is still walked, and
//! its descendants are skipped only because they match too.

use crate::error::{AccessSide, Error, Result};
use crate::exclude::ExclusionMatcher;
use crate::options::TreeOptions;
use crate::utils::access::ensure_accessible;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::utils::{copy_file_contents, create_dir_idempotent, preserve_timestamps};
use super::walk::{Order, Walker};

/// Statistics from a copy operation.
///
/// Returned by [`copy_tree`] to provide information about what was copied.
///
/// # Example
///
/// ```no_run
/// use tempstore::{copy_tree, TreeOptions};
///
/// let stats = copy_tree("work", "backup", &TreeOptions::default())?;
/// println!("Copied {} files ({} bytes)", stats.files_copied, stats.bytes_copied);
/// # Ok::<(), tempstore::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CopyStats {
    /// Number of files whose contents were duplicated
    pub files_copied: u64,
    /// Number of directories created (existing ones are not counted)
    pub dirs_created: u64,
    /// Total bytes copied
    pub bytes_copied: u64,
    /// Number of entries skipped because they matched an exclusion
    pub entries_excluded: u64,
    /// Duration of the copy operation
    pub duration: std::time::Duration,
}

/// Copy the contents of `from` into `to`, skipping excluded entries.
///
/// Directories are created under `to` (existing ones are reused) and file
/// contents are duplicated, overwriting files already present. The roots
/// themselves are not copied: `from/a.txt` lands at `to/a.txt`.
///
/// # Errors
///
/// Returns an error if:
/// - Either root is not readable and writable ([`Error::Access`], before
///   anything is touched)
/// - `to` is `from`, or lies inside it without being excluded
///   ([`Error::NestedDestination`])
/// - Any directory creation, listing or file copy fails ([`Error::Copy`]).
///   Entries copied before the failure are left in place.
pub fn copy_tree<P: AsRef<Path>, Q: AsRef<Path>>(
    from: P,
    to: Q,
    options: &TreeOptions,
) -> Result<CopyStats> {
    let start_time = Instant::now();
    let (from, to) = (from.as_ref(), to.as_ref());

    ensure_accessible(from, AccessSide::Source)?;
    ensure_accessible(to, AccessSide::Destination)?;

    let matcher = options.matcher()?;
    reject_nested_destination(from, to, &matcher)?;

    let mut stats = CopyStats::default();

    for entry in Walker::new(from, Order::TopDown).map_err(Error::into_copy)? {
        let entry = entry.map_err(Error::into_copy)?;

        if matcher.matches_path(&entry.relative) {
            stats.entries_excluded += 1;
            options.verbose(&format!("excluded {}", entry.relative.display()));
            continue;
        }

        let target = to.join(&entry.relative);
        let copy_err = |source: io::Error| Error::Copy {
            path: entry.path.clone(),
            source,
        };

        if entry.is_dir {
            if create_dir_idempotent(&target).map_err(copy_err)? {
                stats.dirs_created += 1;
                options.verbose(&format!("created {}", target.display()));
            }
            continue;
        }

        let bytes = copy_file_contents(&entry.path, &target, options.fsync).map_err(copy_err)?;
        stats.files_copied += 1;
        stats.bytes_copied += bytes;
        options.verbose(&format!(
            "copied {} -> {} ({} bytes)",
            entry.path.display(),
            target.display(),
            bytes
        ));

        if options.preserve_timestamps {
            let kept = fs::metadata(&entry.path)
                .and_then(|meta| preserve_timestamps(&meta, &target));
            if let Err(e) = kept {
                options.warn(&format!(
                    "Failed to preserve timestamps on {}: {}",
                    target.display(),
                    e
                ));
            }
        }
    }

    stats.duration = start_time.elapsed();
    Ok(stats)
}

/// A destination inside the source must be excluded, or the walk would keep
/// finding the directories it just created.
fn reject_nested_destination(from: &Path, to: &Path, matcher: &ExclusionMatcher) -> Result<()> {
    let canonical = |path: &Path| -> Result<PathBuf> {
        fs::canonicalize(path).map_err(|source| Error::Copy {
            path: path.to_path_buf(),
            source,
        })
    };

    let (from_canonical, to_canonical) = (canonical(from)?, canonical(to)?);
    let nested = match to_canonical.strip_prefix(&from_canonical) {
        Ok(relative) => relative.as_os_str().is_empty() || !matcher.matches_path(relative),
        Err(_) => false,
    };

    if nested {
        return Err(Error::NestedDestination {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
