//! Read/write accessibility checks.
//!
//! The engines only model a binary "can read and write" notion of access.
//! On Unix this asks the kernel via `access(2)`, which honours the real
//! uid/gid and any mount-level restrictions. Elsewhere it falls back to
//! checking that the path exists and is not marked read-only.

use crate::error::{AccessSide, Error, Result};
use std::path::Path;

/// Returns true iff `path` exists and the calling process can both read
/// and write it.
#[cfg(unix)]
pub fn is_accessible(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };

    // SAFETY: c_path is a valid NUL-terminated string for the duration of the call
    unsafe { libc::access(c_path.as_ptr(), libc::R_OK | libc::W_OK) == 0 }
}

/// Returns true iff `path` exists and the calling process can both read
/// and write it.
#[cfg(not(unix))]
pub fn is_accessible(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| !meta.permissions().readonly())
        .unwrap_or(false)
}

/// Fail with [`Error::Access`] unless `path` is readable and writable.
pub(crate) fn ensure_accessible(path: &Path, side: AccessSide) -> Result<()> {
    if is_accessible(path) {
        Ok(())
    } else {
        Err(Error::Access {
            path: path.to_path_buf(),
            side,
        })
    }
}
