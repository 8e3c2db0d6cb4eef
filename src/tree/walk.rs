//! Depth-first directory traversal.
//!
//! [`Walker`] yields every file and directory below a root exactly once,
//! in either [`Order::TopDown`] (directory before its children) or
//! [`Order::BottomUp`] (children before their directory). The walk always
//! descends into every subdirectory; the order only changes when a
//! directory entry itself is emitted.
//!
//! Each directory is listed once, when the walker enters it, and sorted by
//! name. A listing is a snapshot: entries removed or created by the caller
//! after that point do not change what the walker yields for that
//! directory. This is what lets the flush engine delete entries as they are
//! yielded.

use crate::error::{AccessSide, Error, Result};
use crate::utils::access::ensure_accessible;
use std::fs;
use std::path::{Path, PathBuf};
use std::vec;

/// Emission order of a [`Walker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Yield a directory before its children (pre-order).
    TopDown,
    /// Yield a directory after its children (post-order).
    BottomUp,
}

/// One file or directory found below the traversal root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalEntry {
    /// Full path of the entry (root joined with `relative`).
    pub path: PathBuf,
    /// Path relative to the traversal root.
    pub relative: PathBuf,
    /// Whether the entry is a directory. Symlinks are never directories.
    pub is_dir: bool,
}

/// A directory being walked: its remaining children and, in bottom-up
/// order, the directory entry waiting to be emitted after them.
struct Frame {
    children: vec::IntoIter<TraversalEntry>,
    pending: Option<TraversalEntry>,
}

/// Lazy depth-first traversal over a directory tree.
///
/// Uses an explicit stack, so arbitrarily deep trees do not grow the call
/// stack. Listing failures are yielded as [`Error::Walk`] and end the walk.
///
/// # Example
///
/// ```no_run
/// use tempstore::{Order, Walker};
///
/// for entry in Walker::new("/tmp/scratch", Order::BottomUp)? {
///     let entry = entry?;
///     println!("{} (dir: {})", entry.relative.display(), entry.is_dir);
/// }
/// # Ok::<(), tempstore::Error>(())
/// ```
pub struct Walker {
    order: Order,
    stack: Vec<Frame>,
    failed: bool,
}

impl Walker {
    /// Start a walk below `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Access`] with [`AccessSide::Root`] if `root` is not
    /// both readable and writable. Nothing is listed in that case.
    pub fn new<P: AsRef<Path>>(root: P, order: Order) -> Result<Self> {
        let root = root.as_ref();
        ensure_accessible(root, AccessSide::Root)?;

        let children = list_children(root, Path::new(""))?;
        Ok(Self {
            order,
            stack: vec![Frame {
                children: children.into_iter(),
                pending: None,
            }],
            failed: false,
        })
    }

    /// The order this walker emits entries in.
    pub fn order(&self) -> Order {
        self.order
    }

    fn descend(&mut self, dir: TraversalEntry) -> Result<Option<TraversalEntry>> {
        let children = list_children(&dir.path, &dir.relative)?;
        match self.order {
            Order::TopDown => {
                self.stack.push(Frame {
                    children: children.into_iter(),
                    pending: None,
                });
                Ok(Some(dir))
            }
            Order::BottomUp => {
                self.stack.push(Frame {
                    children: children.into_iter(),
                    pending: Some(dir),
                });
                Ok(None)
            }
        }
    }
}

impl Iterator for Walker {
    type Item = Result<TraversalEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let frame = self.stack.last_mut()?;

            match frame.children.next() {
                Some(entry) if entry.is_dir => match self.descend(entry) {
                    Ok(Some(emit)) => return Some(Ok(emit)),
                    Ok(None) => continue,
                    Err(e) => {
                        self.failed = true;
                        return Some(Err(e));
                    }
                },
                Some(entry) => return Some(Ok(entry)),
                None => {
                    let finished = self.stack.pop()?;
                    if let Some(dir) = finished.pending {
                        return Some(Ok(dir));
                    }
                }
            }
        }
    }
}

/// List the direct children of `dir`, sorted by name.
///
/// `read_dir` never yields `.` or `..`. File types come from the directory
/// entry itself, so symlinks are reported as links and never followed.
fn list_children(dir: &Path, relative: &Path) -> Result<Vec<TraversalEntry>> {
    let walk_err = |source| Error::Walk {
        path: dir.to_path_buf(),
        source,
    };

    let mut children = Vec::new();
    for entry in fs::read_dir(dir).map_err(walk_err)? {
        let entry = entry.map_err(walk_err)?;
        let file_type = entry.file_type().map_err(walk_err)?;
        let name = entry.file_name();
        children.push(TraversalEntry {
            path: entry.path(),
            relative: relative.join(&name),
            is_dir: file_type.is_dir(),
        });
    }

    children.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(children)
}
