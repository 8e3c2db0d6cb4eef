//! Error types for tempstore.
//!
//! This module provides the [`Error`] enum containing all possible errors
//! that can occur during copy, flush and storage operations, the
//! [`Result`] type alias, and the stable [`ErrorCode`] classification.
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | Access | [`Error::Access`], [`Error::StorageUnavailable`] |
//! | Traversal | [`Error::Copy`], [`Error::Flush`], [`Error::Walk`] |
//! | Validation | [`Error::NestedDestination`], [`Error::Pattern`] |
//! | IO | [`Error::Io`] |

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for tempstore operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Check if an IO error indicates "no space left on device".
///
/// Detects `StorageFull` as well as the raw `ENOSPC` (Unix) and
/// `ERROR_DISK_FULL` (Windows) codes, which older toolchains do not map.
pub fn is_no_space_error(error: &io::Error) -> bool {
    if error.kind() == io::ErrorKind::StorageFull {
        return true;
    }

    #[cfg(unix)]
    const NO_SPACE: Option<i32> = Some(28);
    #[cfg(windows)]
    const NO_SPACE: Option<i32> = Some(112);
    #[cfg(not(any(unix, windows)))]
    const NO_SPACE: Option<i32> = None;

    NO_SPACE.is_some() && error.raw_os_error() == NO_SPACE
}

/// Which root of an operation failed the read/write accessibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessSide {
    /// The source root of a copy.
    Source,
    /// The destination root of a copy.
    Destination,
    /// The single root of a flush or walk.
    Root,
}

impl fmt::Display for AccessSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Source => "source",
            Self::Destination => "destination",
            Self::Root => "root",
        })
    }
}

/// Stable, machine-readable classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A root path is not readable and writable.
    AccessDenied,
    /// A copy aborted mid-traversal.
    CopyFailed,
    /// A flush aborted mid-traversal.
    FlushFailed,
    /// The destination device ran out of space.
    NoSpace,
    /// Arguments were rejected before any filesystem work.
    InvalidInput,
    /// No storage root could be resolved.
    StorageUnavailable,
    /// Any other IO failure.
    IoError,
    /// Bug or unexpected internal condition.
    Internal,
}

impl ErrorCode {
    /// The snake_case name used in machine-readable output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccessDenied => "access_denied",
            Self::CopyFailed => "copy_failed",
            Self::FlushFailed => "flush_failed",
            Self::NoSpace => "no_space",
            Self::InvalidInput => "invalid_input",
            Self::StorageUnavailable => "storage_unavailable",
            Self::IoError => "io_error",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during tempstore operations.
///
/// Every variant is fatal to the call that produced it. Copy and flush are
/// not transactional: entries processed before the failure stay as they are.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A required root is not simultaneously readable and writable.
    ///
    /// Raised before any traversal starts, so nothing has been touched.
    #[error("{side} path is not accessible (read/write): {path}")]
    Access {
        /// The offending root
        path: PathBuf,
        /// Which root of the operation it is
        side: AccessSide,
    },

    /// Creating a directory or duplicating a file failed during a copy.
    #[error("Failed to copy {path}: {source}")]
    Copy {
        /// Entry being copied (source side) when the failure happened
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Deleting a file or removing a directory failed during a flush.
    #[error("Failed to flush {path}: {source}")]
    Flush {
        /// Entry being removed when the failure happened
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// A directory could not be listed while walking a tree.
    #[error("Failed to list directory {path}: {source}")]
    Walk {
        /// Directory that could not be listed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The copy destination is the source itself or lies inside it.
    #[error("Destination {to} is inside source {from}")]
    NestedDestination {
        /// Source root
        from: PathBuf,
        /// Destination root
        to: PathBuf,
    },

    /// The compiled exclusion pattern was rejected by the regex engine.
    #[error("Invalid exclusion pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Neither the configured storage root nor the system temp dir is usable.
    #[error("Storage directory is not accessible (read/write): {path}")]
    StorageUnavailable {
        /// The last root that was tried
        path: PathBuf,
    },

    /// IO error during storage file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Classify this error for machine-readable reporting.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Access { .. } => ErrorCode::AccessDenied,
            Self::Copy { source, .. } if is_no_space_error(source) => ErrorCode::NoSpace,
            Self::Copy { .. } => ErrorCode::CopyFailed,
            Self::Flush { .. } => ErrorCode::FlushFailed,
            Self::NestedDestination { .. } | Self::Pattern(_) => ErrorCode::InvalidInput,
            Self::StorageUnavailable { .. } => ErrorCode::StorageUnavailable,
            Self::Io(source) if is_no_space_error(source) => ErrorCode::NoSpace,
            Self::Walk { .. } | Self::Io(_) => ErrorCode::IoError,
        }
    }

    /// Re-tag a walker listing failure as a copy failure.
    pub(crate) fn into_copy(self) -> Self {
        match self {
            Self::Walk { path, source } => Self::Copy { path, source },
            other => other,
        }
    }

    /// Re-tag a walker listing failure as a flush failure.
    pub(crate) fn into_flush(self) -> Self {
        match self {
            Self::Walk { path, source } => Self::Flush { path, source },
            other => other,
        }
    }
}
