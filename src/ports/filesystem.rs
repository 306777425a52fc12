//! Filesystem port for tree walks and artifact I/O.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Boxed error returned by filesystem operations.
pub type FsError = Box<dyn std::error::Error + Send + Sync>;

/// Whether a directory entry is a folder or something file-like.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A directory.
    Folder,
    /// A regular file.
    File,
    /// Anything else (sockets, broken symlinks, ...).
    Other,
}

/// One immediate child of a directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirEntry {
    /// File name of the entry (no directory component).
    pub name: String,
    /// Kind of entry.
    pub kind: EntryKind,
    /// Last modification time, when the platform reports one.
    pub modified: Option<DateTime<Utc>>,
}

impl DirEntry {
    /// Returns the extension of the entry name without the leading dot.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.name).extension().and_then(|ext| ext.to_str())
    }

    /// Returns `true` for regular files.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Provides filesystem access for walking trees and reading/writing artifacts.
pub trait FileSystem: Send + Sync {
    /// Lists every directory under `root` (including `root`) in pre-order,
    /// never descending into directories whose name is in `skip`.
    ///
    /// Entries that cannot be read during the walk are logged and left out.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` itself cannot be read.
    fn walk_dirs(&self, root: &Path, skip: &[&str]) -> Result<Vec<PathBuf>, FsError>;

    /// Lists the immediate children of a directory, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a directory or cannot be read.
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>, FsError>;

    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, FsError>;

    /// Writes the given contents to a file, creating parent directories and
    /// overwriting any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(&self, path: &Path, contents: &str) -> Result<(), FsError>;

    /// Returns `true` if the path exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;

    /// Removes a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    fn remove_file(&self, path: &Path) -> Result<(), FsError>;
}
