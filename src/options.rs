//! Configuration for tree operations and scratch storage.
//!
//! This module provides [`TreeOptions`] for configuring copy and flush, and
//! [`StorageConfig`] for choosing where scratch entries are created.
//!
//! # Example
//!
//! ```
//! use tempstore::{StorageConfig, TreeOptions};
//!
//! let options = TreeOptions::default()
//!     .with_exclusion("cache")
//!     .with_exclusion("logs")
//!     .with_fsync();
//!
//! let config = StorageConfig::default()
//!     .with_root("/var/lib/export/scratch")
//!     .with_prefix("export_");
//! ```

use crate::exclude::ExclusionMatcher;
use crate::error::Result;
use std::path::PathBuf;

/// Default name prefix for scratch files and directories.
pub const DEFAULT_PREFIX: &str = "sm_";

/// Options for [`copy_tree`](crate::copy_tree) and
/// [`flush_tree`](crate::flush_tree).
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `exclusions` | empty | Nothing excluded |
/// | `fsync` | `false` | Do not sync copied files |
/// | `preserve_timestamps` | `false` | Copies get fresh mtime/atime |
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeOptions {
    /// Literal fragments relative to the traversal root.
    ///
    /// A fragment excludes the entry with exactly that relative path and
    /// everything nested under it. Exclusion is checked per entry; excluded
    /// directories are still walked.
    pub exclusions: Vec<String>,

    /// Whether to sync each copied file to disk before closing it
    pub fsync: bool,

    /// Whether copied files keep the source mtime/atime
    ///
    /// Failing to set timestamps is reported as a warning, not an error.
    pub preserve_timestamps: bool,

    /// Callback for warnings (optional)
    ///
    /// If not set and `tracing` feature is enabled, warnings are logged via tracing.
    /// Otherwise, warnings are silently ignored.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub warn_handler: Option<fn(&str)>,

    /// Callback for per-entry progress lines (optional)
    ///
    /// If not set and `tracing` feature is enabled, lines are logged at
    /// debug level. Otherwise, they are dropped.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub verbose_handler: Option<fn(&str)>,
}

impl TreeOptions {
    /// Add one exclusion fragment
    #[must_use]
    pub fn with_exclusion(mut self, fragment: impl Into<String>) -> Self {
        self.exclusions.push(fragment.into());
        self
    }

    /// Replace the exclusion fragments
    #[must_use]
    pub fn with_exclusions<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions = fragments.into_iter().map(Into::into).collect();
        self
    }

    /// Sync every copied file before closing it
    #[must_use]
    pub fn with_fsync(mut self) -> Self {
        self.fsync = true;
        self
    }

    /// Keep source timestamps on copied files
    #[must_use]
    pub fn with_preserved_timestamps(mut self) -> Self {
        self.preserve_timestamps = true;
        self
    }

    /// Create options with a warning handler
    #[must_use]
    pub fn with_warn_handler(mut self, handler: fn(&str)) -> Self {
        self.warn_handler = Some(handler);
        self
    }

    /// Create options with a verbose handler
    #[must_use]
    pub fn with_verbose_handler(mut self, handler: fn(&str)) -> Self {
        self.verbose_handler = Some(handler);
        self
    }

    /// Compile the exclusion fragments. Done once per operation.
    pub(crate) fn matcher(&self) -> Result<ExclusionMatcher> {
        ExclusionMatcher::new(&self.exclusions)
    }

    pub(crate) fn warn(&self, msg: &str) {
        if let Some(handler) = self.warn_handler {
            handler(msg);
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!("{}", msg);
        }
    }

    pub(crate) fn verbose(&self, msg: &str) {
        if let Some(handler) = self.verbose_handler {
            handler(msg);
        } else {
            #[cfg(feature = "tracing")]
            tracing::debug!("{}", msg);
        }
    }
}

/// Where and how scratch entries are named.
///
/// Replaces process-wide constants: every [`Storage`](crate::Storage) gets
/// its own config.
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `root` | `None` | Use the system temp dir |
/// | `prefix` | `"sm_"` | Name prefix of created entries |
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StorageConfig {
    /// Preferred storage root
    ///
    /// Used when it exists and is readable and writable; otherwise the
    /// system temp dir is used.
    pub root: Option<PathBuf>,

    /// Prefix prepended to every created file and directory name
    pub prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: None,
            prefix: DEFAULT_PREFIX.to_owned(),
        }
    }
}

impl StorageConfig {
    /// Set the preferred storage root
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Set the name prefix
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}
