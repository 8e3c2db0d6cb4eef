//! Builder API for copy and flush.
//!
//! The builders provide a fluent interface over [`copy_tree`] and
//! [`flush_tree`] that is often more convenient than constructing
//! [`TreeOptions`] by hand.
//!
//! # Examples
//!
//! ## Copy
//!
//! ```no_run
//! use tempstore::CopyBuilder;
//!
//! let stats = CopyBuilder::new("site", "/tmp/export")
//!     .exclude("cache")
//!     .exclude("uploads/tmp")
//!     .run()?;
//! println!("Copied {} files", stats.files_copied);
//! # Ok::<(), tempstore::Error>(())
//! ```
//!
//! ## Flush
//!
//! ```no_run
//! use tempstore::FlushBuilder;
//!
//! let stats = FlushBuilder::new("/tmp/export")
//!     .exclude("manifest.json")
//!     .run()?;
//! println!("Removed {} files", stats.files_removed);
//! # Ok::<(), tempstore::Error>(())
//! ```

use crate::error::Result;
use crate::options::TreeOptions;
use crate::tree::{CopyStats, FlushStats, copy_tree, flush_tree};
use std::path::{Path, PathBuf};

/// A builder for configuring and executing a tree copy.
#[derive(Debug, Clone)]
pub struct CopyBuilder {
    from: PathBuf,
    to: PathBuf,
    options: TreeOptions,
}

impl CopyBuilder {
    /// Create a new `CopyBuilder` copying the contents of `from` into `to`.
    ///
    /// Uses default options (nothing excluded, no fsync, fresh timestamps).
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(from: P, to: Q) -> Self {
        Self {
            from: from.as_ref().to_path_buf(),
            to: to.as_ref().to_path_buf(),
            options: TreeOptions::default(),
        }
    }

    /// Exclude a relative path and everything below it.
    #[must_use]
    pub fn exclude(mut self, fragment: impl Into<String>) -> Self {
        self.options = self.options.with_exclusion(fragment);
        self
    }

    /// Sync every copied file to disk before closing it.
    #[must_use]
    pub fn fsync(mut self) -> Self {
        self.options = self.options.with_fsync();
        self
    }

    /// Keep source mtime/atime on copied files.
    #[must_use]
    pub fn preserve_timestamps(mut self) -> Self {
        self.options = self.options.with_preserved_timestamps();
        self
    }

    /// Set a handler for non-fatal warnings.
    #[must_use]
    pub fn on_warning(mut self, handler: fn(&str)) -> Self {
        self.options = self.options.with_warn_handler(handler);
        self
    }

    /// Set a handler receiving one line per processed entry.
    #[must_use]
    pub fn verbose(mut self, handler: fn(&str)) -> Self {
        self.options = self.options.with_verbose_handler(handler);
        self
    }

    /// Get the current options.
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Execute the copy.
    ///
    /// # Errors
    ///
    /// See [`copy_tree`].
    pub fn run(self) -> Result<CopyStats> {
        copy_tree(&self.from, &self.to, &self.options)
    }
}

/// A builder for configuring and executing a tree flush.
#[derive(Debug, Clone)]
pub struct FlushBuilder {
    root: PathBuf,
    options: TreeOptions,
}

impl FlushBuilder {
    /// Create a new `FlushBuilder` emptying `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            options: TreeOptions::default(),
        }
    }

    /// Keep a relative path and everything below it.
    #[must_use]
    pub fn exclude(mut self, fragment: impl Into<String>) -> Self {
        self.options = self.options.with_exclusion(fragment);
        self
    }

    /// Set a handler receiving one line per processed entry.
    #[must_use]
    pub fn verbose(mut self, handler: fn(&str)) -> Self {
        self.options = self.options.with_verbose_handler(handler);
        self
    }

    /// Get the current options.
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Execute the flush. The root itself is kept.
    ///
    /// # Errors
    ///
    /// See [`flush_tree`].
    pub fn run(self) -> Result<FlushStats> {
        flush_tree(&self.root, &self.options)
    }
}
