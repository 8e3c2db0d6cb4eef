//! Scratch files and directories.
//!
//! [`Storage`] creates uniquely named entries under a storage root chosen
//! from its [`StorageConfig`]. The returned [`StorageFile`] and
//! [`StorageDirectory`] are thin handles over a path: they never keep an
//! OS handle open between calls and never delete anything on drop.
//!
//! # Example
//!
//! ```no_run
//! use tempstore::{Storage, StorageConfig, TreeOptions};
//!
//! let storage = Storage::new(StorageConfig::default().with_prefix("export_"));
//!
//! let log = storage.create_file()?;
//! log.append_line("started")?;
//!
//! let work = storage.create_directory()?;
//! work.copy_from("site/uploads", &TreeOptions::default().with_exclusion("cache"))?;
//! // ... use work.path() ...
//! work.purge(&TreeOptions::default())?;
//! log.delete()?;
//! # Ok::<(), tempstore::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::options::{StorageConfig, TreeOptions};
use crate::tree::{CopyStats, FlushStats, copy_tree, flush_tree};
use crate::utils::access::is_accessible;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Factory for scratch entries.
#[derive(Debug, Clone, Default)]
pub struct Storage {
    config: StorageConfig,
}

impl Storage {
    /// Create a storage factory with the given configuration.
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// The configuration this storage was built with.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Resolve the directory new entries are created in.
    ///
    /// The configured root wins when it is readable and writable; otherwise
    /// the system temp dir is used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if neither is accessible.
    pub fn root(&self) -> Result<PathBuf> {
        if let Some(root) = &self.config.root {
            if is_accessible(root) {
                return Ok(root.clone());
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "storage root {} is not accessible, falling back to temp dir",
                root.display()
            );
        }

        let fallback = std::env::temp_dir();
        if is_accessible(&fallback) {
            Ok(fallback)
        } else {
            Err(Error::StorageUnavailable { path: fallback })
        }
    }

    /// Create a new empty file named `<prefix><random>` in the storage root.
    pub fn create_file(&self) -> Result<StorageFile> {
        let root = self.root()?;
        let file = tempfile::Builder::new()
            .prefix(&self.config.prefix)
            .keep(true)
            .tempfile_in(&root)?;
        let path = file.path().to_path_buf();

        #[cfg(feature = "tracing")]
        tracing::debug!("created scratch file {}", path.display());

        Ok(StorageFile { path })
    }

    /// Create a new empty directory named `<prefix><random>` in the storage root.
    pub fn create_directory(&self) -> Result<StorageDirectory> {
        let root = self.root()?;
        let dir = tempfile::Builder::new()
            .prefix(&self.config.prefix)
            .keep(true)
            .tempdir_in(&root)?;
        let path = dir.path().to_path_buf();

        #[cfg(feature = "tracing")]
        tracing::debug!("created scratch directory {}", path.display());

        Ok(StorageDirectory { path })
    }
}

/// A scratch file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageFile {
    path: PathBuf,
}

impl StorageFile {
    /// Absolute path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a read/write handle positioned at the start of the file.
    ///
    /// The handle belongs to the caller and is closed when dropped.
    pub fn open(&self) -> Result<File> {
        Ok(OpenOptions::new().read(true).write(true).open(&self.path)?)
    }

    /// Append `line` followed by a newline.
    pub fn append_line(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// Read every line, without line terminators.
    pub fn read_lines(&self) -> Result<Vec<String>> {
        let reader = BufReader::new(File::open(&self.path)?);
        Ok(reader.lines().collect::<io::Result<Vec<String>>>()?)
    }

    /// Read the line starting at byte `offset`.
    ///
    /// Returns the line without its terminator and the offset of the next
    /// line, or `None` at end of file. Feeding the returned offset back in
    /// walks the file line by line without holding a handle in between.
    pub fn read_line_at(&self, offset: u64) -> Result<Option<(String, u64)>> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(offset))?;

        let mut line = String::new();
        let read = BufReader::new(file).read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some((line, offset + read as u64)))
    }

    /// Size of the file in bytes.
    pub fn len(&self) -> Result<u64> {
        Ok(fs::metadata(&self.path)?.len())
    }

    /// Whether the file is empty.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Delete the file.
    ///
    /// Returns `Ok(false)` if it was already gone.
    pub fn delete(self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl AsRef<Path> for StorageFile {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// A scratch directory on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageDirectory {
    path: PathBuf,
}

impl StorageDirectory {
    /// Absolute path of the directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy this directory's contents into `dest`.
    pub fn copy_to<P: AsRef<Path>>(&self, dest: P, options: &TreeOptions) -> Result<CopyStats> {
        copy_tree(&self.path, dest, options)
    }

    /// Copy the contents of `src` into this directory.
    pub fn copy_from<P: AsRef<Path>>(&self, src: P, options: &TreeOptions) -> Result<CopyStats> {
        copy_tree(src, &self.path, options)
    }

    /// Remove everything inside this directory that is not excluded.
    pub fn flush(&self, options: &TreeOptions) -> Result<FlushStats> {
        flush_tree(&self.path, options)
    }

    /// Remove the directory itself. It must already be empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Flush`] if the directory is not empty or cannot be
    /// removed.
    pub fn delete(self) -> Result<()> {
        fs::remove_dir(&self.path).map_err(|source| Error::Flush {
            path: self.path.clone(),
            source,
        })
    }

    /// Flush with `options`, then remove the directory.
    ///
    /// Fails with [`Error::Flush`] when excluded entries keep the directory
    /// non-empty; the directory handle is consumed either way.
    pub fn purge(self, options: &TreeOptions) -> Result<FlushStats> {
        let stats = self.flush(options)?;
        self.delete()?;
        Ok(stats)
    }
}

impl AsRef<Path> for StorageDirectory {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}
