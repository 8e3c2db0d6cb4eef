//! File primitives used by the copy and flush engines.
//!
//! Every handle opened here lives only for the duration of one call and is
//! closed on every exit path, including errors, so a long traversal never
//! accumulates descriptors.

use filetime::{FileTime, set_file_times};
use std::fs::{self, File, Metadata};
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

// =============================================================================
// File content copying
// =============================================================================

/// Duplicate the bytes of `src` into `dst`, creating or truncating `dst`.
///
/// Returns the number of bytes written.
pub(crate) fn copy_file_contents(src: &Path, dst: &Path, fsync: bool) -> io::Result<u64> {
    let reader = File::open(src)?;
    let writer = File::create(dst)?;

    let mut reader = BufReader::new(reader);
    let mut writer = BufWriter::new(writer);
    let bytes = io::copy(&mut reader, &mut writer)?;

    let writer = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
    if fsync {
        writer.sync_all()?;
    }

    Ok(bytes)
}

// =============================================================================
// Directory utilities
// =============================================================================

/// Create `dst` as a directory. An existing directory is not an error.
pub(crate) fn create_dir_idempotent(dst: &Path) -> io::Result<bool> {
    match fs::create_dir(dst) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dst.is_dir() => Ok(false),
        Err(e) => Err(e),
    }
}

// =============================================================================
// Metadata and timestamp utilities
// =============================================================================

/// Preserve file timestamps (mtime and atime)
pub(crate) fn preserve_timestamps(src_meta: &Metadata, dst: &Path) -> io::Result<()> {
    let mtime = FileTime::from_last_modification_time(src_meta);
    let atime = FileTime::from_last_access_time(src_meta);
    set_file_times(dst, atime, mtime)
}

// =============================================================================
// Tests
// =============================================================================
