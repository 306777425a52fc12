//! The per-directory record and its plain-text rendering.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Upper bound on comments carried into one prompt.
pub const MAX_COMMENTS: usize = 100;

/// Identity, timestamp and size of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStamp {
    /// File name.
    pub name: String,
    /// Last modification time.
    pub modified: DateTime<Utc>,
    /// Line count, or `None` if the file could not be read.
    pub lines: Option<usize>,
}

/// Metadata extracted from one eligible directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRecord {
    /// Directory the record describes.
    pub path: PathBuf,
    /// Immediate child directories, by name.
    pub folders: Vec<String>,
    /// Immediate regular files, by name.
    pub files: Vec<String>,
    /// Language of the newest file's extraction patterns.
    pub language: &'static str,
    /// Most recently modified pattern-matched file.
    pub newest: FileStamp,
    /// Least recently modified pattern-matched file.
    pub oldest: FileStamp,
    /// Unique imported module names.
    pub imports: BTreeSet<String>,
    /// Comments across all files, capped at [`MAX_COMMENTS`].
    pub comments: Vec<String>,
    /// Function names across all files.
    pub functions: Vec<String>,
}

impl DirectoryRecord {
    /// Renders the record in the fixed prompt layout.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("=== Directory listing ===\n");
        for folder in &self.folders {
            let _ = writeln!(out, "[folder] {folder}");
        }
        for file in &self.files {
            let _ = writeln!(out, "[file] {file}");
        }

        let _ = writeln!(out, "=== Language ===\n{}", self.language);

        render_stamp(&mut out, "Newest file", &self.newest);
        render_stamp(&mut out, "Oldest file", &self.oldest);

        render_list(&mut out, "Imports", self.imports.iter());
        render_list(&mut out, &format!("Comments (up to {MAX_COMMENTS})"), self.comments.iter());
        render_list(&mut out, "Function definitions", self.functions.iter());

        out
    }
}

fn render_stamp(out: &mut String, header: &str, stamp: &FileStamp) {
    let _ = writeln!(out, "=== {header} ===");
    let _ = writeln!(out, "name: {}", stamp.name);
    let _ = writeln!(out, "modified: {}", stamp.modified.format("%Y-%m-%d %H:%M:%S UTC"));
    match stamp.lines {
        Some(lines) => {
            let _ = writeln!(out, "lines: {lines}");
        }
        None => out.push_str("lines: unknown\n"),
    }
}

fn render_list<'a>(out: &mut String, header: &str, items: impl Iterator<Item = &'a String>) {
    let _ = writeln!(out, "=== {header} ===");
    let mut empty = true;
    for item in items {
        empty = false;
        let _ = writeln!(out, "{item}");
    }
    if empty {
        out.push_str("(none)\n");
    }
}
