//! Live filesystem adapter using `std::fs` and `walkdir`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use walkdir::WalkDir;

use crate::ports::filesystem::{DirEntry, EntryKind, FileSystem, FsError};

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn walk_dirs(&self, root: &Path, skip: &[&str]) -> Result<Vec<PathBuf>, FsError> {
        // Surface an unreadable root as an error instead of an empty walk.
        let _ = std::fs::read_dir(root)?;

        let walker = WalkDir::new(root).sort_by_file_name().into_iter().filter_entry(|entry| {
            entry.depth() == 0
                || !(entry.file_type().is_dir()
                    && entry.file_name().to_str().is_some_and(|name| skip.contains(&name)))
        });

        let mut dirs = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_dir() => dirs.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => tracing::warn!("skipping unreadable entry during walk: {e}"),
            }
        }
        Ok(dirs)
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>, FsError> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(String::from) else {
                continue;
            };
            // Follow symlinks so linked files count as files.
            let metadata = std::fs::metadata(entry.path()).ok();
            let kind = match &metadata {
                Some(m) if m.is_dir() => EntryKind::Folder,
                Some(m) if m.is_file() => EntryKind::File,
                _ => EntryKind::Other,
            };
            let modified =
                metadata.and_then(|m| m.modified().ok()).map(DateTime::<Utc>::from);
            entries.push(DirEntry { name, kind, modified });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read_to_string(&self, path: &Path) -> Result<String, FsError> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), FsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(std::fs::write(path, contents)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_file(&self, path: &Path) -> Result<(), FsError> {
        Ok(std::fs::remove_file(path)?)
    }
}
