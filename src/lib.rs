//! # tempstore
//!
//! Scratch file and directory storage with exclusion-aware recursive copy
//! and flush.
//!
//! ## Core Features
//!
//! - **Scratch entries**: uniquely named files and directories under a
//!   configurable storage root, falling back to the system temp dir
//! - **Line I/O**: append, read back, and walk a scratch file by offset
//! - **Recursive copy**: top-down, directories before their contents,
//!   existing directories reused and files overwritten
//! - **Recursive flush**: bottom-up delete that keeps the root in place
//! - **Exclusions**: literal path fragments that skip an entry and
//!   everything below it, anchored at separators (`cache` never matches
//!   `cached`)
//! - **Typed errors**: access, copy and flush failures are distinct
//!   [`Error`] variants
//!
//! ## Quick Start with Builder API
//!
//! ```no_run
//! use tempstore::{CopyBuilder, FlushBuilder};
//!
//! let stats = CopyBuilder::new("site", "/tmp/export")
//!     .exclude("cache")
//!     .run()?;
//! println!("Copied {} files ({} bytes)", stats.files_copied, stats.bytes_copied);
//!
//! FlushBuilder::new("/tmp/export").run()?;
//! # Ok::<(), tempstore::Error>(())
//! ```
//!
//! ## Function API
//!
//! ```no_run
//! use tempstore::{copy_tree, flush_tree, TreeOptions};
//!
//! let options = TreeOptions::default()
//!     .with_exclusion("cache")
//!     .with_fsync();
//!
//! copy_tree("site", "/tmp/export", &options)?;
//! flush_tree("/tmp/export", &options)?;
//! # Ok::<(), tempstore::Error>(())
//! ```
//!
//! ## Scratch Storage
//!
//! ```no_run
//! use tempstore::{Storage, StorageConfig, TreeOptions};
//!
//! let storage = Storage::new(StorageConfig::default().with_root("/var/scratch"));
//! let work = storage.create_directory()?;
//! let notes = storage.create_file()?;
//! notes.append_line("hello")?;
//! work.purge(&TreeOptions::default())?;
//! notes.delete()?;
//! # Ok::<(), tempstore::Error>(())
//! ```
//!
//! ## Guarantees and Limits
//!
//! - Access to every root is checked before anything is touched.
//! - Copy and flush are not transactional: a failure aborts the walk and
//!   leaves already processed entries as they are.
//! - Exclusions are checked for every entry; excluded directories are
//!   still walked.
//! - Symlinks are never followed while walking. Copy duplicates the
//!   contents they point to; flush removes the link.
//! - No locking: concurrent operations on overlapping trees are undefined.
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `tracing` | Structured logging with tracing crate |
//! | `serde` | Serialize/Deserialize for [`TreeOptions`] and [`StorageConfig`] |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod error;
mod exclude;
mod options;
mod storage;
mod tree;
mod utils;

pub use builder::{CopyBuilder, FlushBuilder};
pub use error::{AccessSide, Error, ErrorCode, Result, is_no_space_error};
pub use exclude::ExclusionMatcher;
pub use options::{DEFAULT_PREFIX, StorageConfig, TreeOptions};
pub use storage::{Storage, StorageDirectory, StorageFile};
pub use tree::{CopyStats, FlushStats, Order, TraversalEntry, Walker, copy_tree, flush_tree};
pub use utils::access::is_accessible;
