//! Tree operations: traversal, copy and flush.
//!
//! Copy and flush share one walker and one exclusion model; they differ
//! only in traversal order and in what they do with each entry.

mod copy;
mod flush;
mod utils;
mod walk;

// Re-export public API
pub use copy::{CopyStats, copy_tree};
pub use flush::{FlushStats, flush_tree};
pub use walk::{Order, TraversalEntry, Walker};
