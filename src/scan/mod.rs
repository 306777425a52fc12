//! Directory scanner: walks a tree and writes a prompt file into every
//! eligible project directory.

pub mod patterns;
pub mod record;

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::artifact::{is_artifact, PROMPT_FILE, SKIP_DIRS, VCS_MARKERS};
use crate::context::ServiceContext;
use crate::ports::filesystem::{DirEntry, EntryKind};

use self::patterns::PatternRegistry;
use self::record::{DirectoryRecord, FileStamp, MAX_COMMENTS};

/// Extensions that mark a directory as holding source code.
pub const SOURCE_EXTENSIONS: &[&str] = &["py", "js", "c", "cpp", "java", "rb", "go", "php"];

/// Why a directory did not get a prompt file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No `.git`, `.svn` or `.hg` entry.
    NoVcsMarker,
    /// No file with a known source extension.
    NoSourceFiles,
    /// Source files exist, but none with registered extraction patterns.
    NoPatternFiles,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoVcsMarker => "no version-control marker",
            Self::NoSourceFiles => "no source files",
            Self::NoPatternFiles => "no files with extraction patterns",
        })
    }
}

/// Result of scanning one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A prompt file was written at this path.
    Written(PathBuf),
    /// The directory is not eligible.
    Skipped(SkipReason),
    /// The directory was eligible but could not be processed.
    Failed(String),
}

/// Aggregate of one scan run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Directories visited.
    pub visited: usize,
    /// Prompt files written, in walk order.
    pub written: Vec<PathBuf>,
    /// Directories skipped as ineligible.
    pub skipped: usize,
    /// Directories that failed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl ScanReport {
    fn add(&mut self, dir: &Path, outcome: ScanOutcome) {
        self.visited += 1;
        match outcome {
            ScanOutcome::Written(path) => self.written.push(path),
            ScanOutcome::Skipped(_) => self.skipped += 1,
            ScanOutcome::Failed(reason) => self.failed.push((dir.to_path_buf(), reason)),
        }
    }
}

/// Walks trees and produces prompt files.
pub struct Scanner<'a> {
    ctx: &'a ServiceContext,
    registry: PatternRegistry,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner using the built-in pattern registry.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self::with_registry(ctx, PatternRegistry::builtin())
    }

    /// Creates a scanner with a custom pattern registry.
    #[must_use]
    pub fn with_registry(ctx: &'a ServiceContext, registry: PatternRegistry) -> Self {
        Self { ctx, registry }
    }

    /// Scans every directory under `root`.
    ///
    /// Per-directory problems are recorded in the report and never stop
    /// the walk.
    ///
    /// # Errors
    ///
    /// Returns an error only if `root` itself cannot be walked.
    pub fn scan_tree(&self, root: &Path) -> Result<ScanReport, String> {
        let dirs = self
            .ctx
            .fs
            .walk_dirs(root, SKIP_DIRS)
            .map_err(|e| format!("failed to walk {}: {e}", root.display()))?;

        let mut report = ScanReport::default();
        for dir in dirs {
            let outcome = self.scan_directory(&dir);
            match &outcome {
                ScanOutcome::Written(path) => tracing::info!("wrote {}", path.display()),
                ScanOutcome::Skipped(reason) => {
                    tracing::debug!("skipping {}: {reason}", dir.display());
                }
                ScanOutcome::Failed(reason) => {
                    tracing::warn!("failed to process {}: {reason}", dir.display());
                }
            }
            report.add(&dir, outcome);
        }
        Ok(report)
    }

    /// Decides eligibility for one directory and writes its prompt file.
    #[must_use]
    pub fn scan_directory(&self, dir: &Path) -> ScanOutcome {
        let entries = match self.ctx.fs.list_dir(dir) {
            Ok(entries) => entries,
            Err(e) => return ScanOutcome::Failed(format!("failed to list directory: {e}")),
        };

        if let Err(reason) = self.check_eligibility(&entries) {
            return ScanOutcome::Skipped(reason);
        }

        let Some(record) = self.build_record(dir, &entries) else {
            return ScanOutcome::Skipped(SkipReason::NoPatternFiles);
        };

        let path = dir.join(PROMPT_FILE);
        match self.ctx.fs.write(&path, &record.render()) {
            Ok(()) => ScanOutcome::Written(path),
            Err(e) => ScanOutcome::Failed(format!("failed to write {}: {e}", path.display())),
        }
    }

    fn check_eligibility(&self, entries: &[DirEntry]) -> Result<(), SkipReason> {
        if !entries.iter().any(|e| VCS_MARKERS.contains(&e.name.as_str())) {
            return Err(SkipReason::NoVcsMarker);
        }
        let extensions: Vec<&str> =
            entries.iter().filter(|e| e.is_file()).filter_map(DirEntry::extension).collect();
        if !extensions
            .iter()
            .any(|ext| SOURCE_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)))
        {
            return Err(SkipReason::NoSourceFiles);
        }
        if !extensions.iter().any(|ext| self.registry.handles(ext)) {
            return Err(SkipReason::NoPatternFiles);
        }
        Ok(())
    }

    /// Builds the record from an already-listed directory.
    ///
    /// Returns `None` when no file has registered patterns.
    fn build_record(&self, dir: &Path, entries: &[DirEntry]) -> Option<DirectoryRecord> {
        let folders = entries
            .iter()
            .filter(|e| e.kind == EntryKind::Folder)
            .map(|e| e.name.clone())
            .collect();
        let files: Vec<&DirEntry> = entries
            .iter()
            .filter(|e| e.is_file() && !e.name.ends_with(".env") && !is_artifact(&e.name))
            .collect();

        let mut newest: Option<FileStamp> = None;
        let mut oldest: Option<FileStamp> = None;
        let mut language = None;
        let mut comments = Vec::new();
        let mut functions = Vec::new();
        let mut imports = BTreeSet::new();

        for entry in &files {
            let Some(patterns) = entry.extension().and_then(|ext| self.registry.get(ext)) else {
                continue;
            };

            let path = dir.join(&entry.name);
            let lines = match self.ctx.fs.read_to_string(&path) {
                Ok(source) => {
                    let found = patterns.extract(&source);
                    let room = MAX_COMMENTS.saturating_sub(comments.len());
                    comments.extend(found.comments.into_iter().take(room));
                    functions.extend(found.functions);
                    imports.extend(found.imports);
                    Some(source.lines().count())
                }
                Err(e) => {
                    tracing::warn!("failed to extract from {}: {e}", path.display());
                    None
                }
            };

            let stamp = FileStamp {
                name: entry.name.clone(),
                modified: entry.modified.unwrap_or_default(),
                lines,
            };
            // Strict comparisons: the first file in name order wins a tie.
            if newest.as_ref().map_or(true, |n| stamp.modified > n.modified) {
                newest = Some(stamp.clone());
                language = Some(patterns.language);
            }
            if oldest.as_ref().map_or(true, |o| stamp.modified < o.modified) {
                oldest = Some(stamp);
            }
        }

        Some(DirectoryRecord {
            path: dir.to_path_buf(),
            folders,
            files: files.iter().map(|e| e.name.clone()).collect(),
            language: language?,
            newest: newest?,
            oldest: oldest?,
            imports,
            comments,
            functions,
        })
    }
}

/// Writes the run-level audit log: one produced prompt path per line.
///
/// The file is named `<YYYYMMDD_HHMMAM>_processed_directories.txt` after the
/// current (UTC) time and placed in `log_dir`, which is created if absent.
///
/// # Errors
///
/// Returns an error if the log file cannot be written.
pub fn write_audit_log(
    ctx: &ServiceContext,
    log_dir: &Path,
    written: &[PathBuf],
) -> Result<PathBuf, String> {
    let stamp = ctx.clock.audit_stamp();
    let path = log_dir.join(format!("{stamp}_processed_directories.txt"));
    let contents: String = written.iter().map(|p| format!("{}\n", p.display())).collect();
    ctx.fs
        .write(&path, &contents)
        .map_err(|e| format!("failed to write audit log {}: {e}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Port};
    use filetime::{set_file_mtime, FileTime};
    use serde_json::json;

    fn write(path: &Path, contents: &str, mtime: i64) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
        set_file_mtime(path, FileTime::from_unix_time(mtime, 0)).unwrap();
    }

    fn live() -> ServiceContext {
        ServiceContext::live(None)
    }

    fn project(root: &Path) -> PathBuf {
        let repo = root.join("repo");
        std::fs::create_dir_all(repo.join(".git")).unwrap();
        write(
            &repo.join("main.py"),
            "import os\n# entry point\n# parse args\ndef main():\n    pass\n",
            1_600_000_000,
        );
        write(
            &repo.join("util.py"),
            "from pathlib import Path\n# helpers\ndef a():\n    pass\n\ndef b():\n    pass\n",
            1_600_000_500,
        );
        repo
    }

    #[test]
    fn two_file_project_reports_newest_oldest_and_totals() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = project(tmp.path());
        let ctx = live();

        let outcome = Scanner::new(&ctx).scan_directory(&repo);
        assert_eq!(outcome, ScanOutcome::Written(repo.join(PROMPT_FILE)));

        let prompt = std::fs::read_to_string(repo.join(PROMPT_FILE)).unwrap();
        assert!(prompt.contains("[file] util.py\n=== Language ===\npython\n=== Newest file ==="));
        assert!(prompt.contains("=== Newest file ===\nname: util.py\n"));
        assert!(prompt.contains("=== Oldest file ===\nname: main.py\n"));
        assert!(prompt.contains(
            "=== Comments (up to 100) ===\nentry point\nparse args\nhelpers\n=== Function"
        ));
        assert!(prompt.ends_with("=== Function definitions ===\nmain\na\nb\n"));
        assert!(prompt.contains("=== Imports ===\nos\npathlib\n"));
        assert!(prompt.contains("[folder] .git\n[file] main.py\n[file] util.py\n"));
    }

    #[test]
    fn rescanning_is_byte_identical() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = project(tmp.path());
        let ctx = live();
        let scanner = Scanner::new(&ctx);

        scanner.scan_tree(tmp.path()).unwrap();
        let first = std::fs::read(repo.join(PROMPT_FILE)).unwrap();
        scanner.scan_tree(tmp.path()).unwrap();
        let second = std::fs::read(repo.join(PROMPT_FILE)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn directories_without_source_files_get_no_prompt() {
        let tmp = tempfile::tempdir().unwrap();
        let docs = tmp.path().join("docs");
        std::fs::create_dir_all(docs.join(".git")).unwrap();
        write(&docs.join("README.md"), "# Title\n", 1_600_000_000);
        let ctx = live();

        let outcome = Scanner::new(&ctx).scan_directory(&docs);

        assert_eq!(outcome, ScanOutcome::Skipped(SkipReason::NoSourceFiles));
        assert!(!docs.join(PROMPT_FILE).exists());
    }

    #[test]
    fn eligibility_requires_vcs_marker_and_pattern_files() {
        let tmp = tempfile::tempdir().unwrap();
        let plain = tmp.path().join("plain");
        write(&plain.join("app.py"), "# hi\n", 1_600_000_000);
        let js = tmp.path().join("js");
        std::fs::create_dir_all(js.join(".git")).unwrap();
        write(&js.join("index.js"), "// hi\n", 1_600_000_000);
        let ctx = live();
        let scanner = Scanner::new(&ctx);

        assert_eq!(scanner.scan_directory(&plain), ScanOutcome::Skipped(SkipReason::NoVcsMarker));
        assert_eq!(scanner.scan_directory(&js), ScanOutcome::Skipped(SkipReason::NoPatternFiles));
    }

    #[test]
    fn comments_are_capped_across_files() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = tmp.path().join("repo");
        std::fs::create_dir_all(repo.join(".git")).unwrap();
        let many: String = (0..80).map(|i| format!("# note {i}\n")).collect();
        write(&repo.join("a.py"), &many, 1_600_000_000);
        write(&repo.join("b.py"), &many, 1_600_000_001);
        let ctx = live();

        let outcome = Scanner::new(&ctx).scan_directory(&repo);
        assert_eq!(outcome, ScanOutcome::Written(repo.join(PROMPT_FILE)));

        let prompt = std::fs::read_to_string(repo.join(PROMPT_FILE)).unwrap();
        let comments = prompt
            .split("=== Comments (up to 100) ===\n")
            .nth(1)
            .and_then(|rest| rest.split("=== Function definitions ===").next())
            .unwrap();
        assert_eq!(comments.lines().count(), MAX_COMMENTS);
        assert_eq!(comments.lines().last(), Some("note 19"));
    }

    #[test]
    fn unreadable_file_contributes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = tmp.path().join("repo");
        std::fs::create_dir_all(repo.join(".git")).unwrap();
        write(&repo.join("good.py"), "# ok\ndef fine():\n    pass\n", 1_600_000_000);
        std::fs::write(repo.join("binary.py"), [0xff_u8, 0xfe, 0x00, 0x23]).unwrap();
        let ctx = live();

        let outcome = Scanner::new(&ctx).scan_directory(&repo);

        assert!(matches!(outcome, ScanOutcome::Written(_)));
        let prompt = std::fs::read_to_string(repo.join(PROMPT_FILE)).unwrap();
        // binary.py keeps its fresh mtime, so it is the newest file.
        assert!(prompt.contains("=== Newest file ===\nname: binary.py\n"));
        assert!(prompt.contains("lines: unknown\n=== Oldest file ===\nname: good.py\n"));
        assert!(prompt.contains("=== Function definitions ===\nfine\n"));
    }

    #[test]
    fn env_files_and_artifacts_are_left_out_of_the_listing() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = project(tmp.path());
        std::fs::write(repo.join(".env"), "SECRET=1").unwrap();
        std::fs::write(repo.join("chatgpt_results.json"), "{}").unwrap();
        let ctx = live();

        let outcome = Scanner::new(&ctx).scan_directory(&repo);
        assert_eq!(outcome, ScanOutcome::Written(repo.join(PROMPT_FILE)));

        let prompt = std::fs::read_to_string(repo.join(PROMPT_FILE)).unwrap();
        assert!(!prompt.contains(".env"));
        assert!(!prompt.contains("chatgpt_"));
    }

    #[test]
    fn scan_tree_skips_housekeeping_dirs_and_counts_outcomes() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = project(tmp.path());
        // A project-looking directory inside node_modules must not be visited.
        let vendored = repo.join("node_modules/pkg");
        std::fs::create_dir_all(vendored.join(".git")).unwrap();
        write(&vendored.join("x.py"), "# vendored\n", 1_600_000_000);
        let ctx = live();

        let report = Scanner::new(&ctx).scan_tree(tmp.path()).unwrap();

        assert_eq!(report.written, vec![repo.join(PROMPT_FILE)]);
        assert_eq!(report.visited, 2);
        assert_eq!(report.skipped, 1);
        assert!(report.failed.is_empty());
        assert!(!vendored.join(PROMPT_FILE).exists());
    }

    #[test]
    fn blocked_write_does_not_stop_the_walk() {
        let tmp = tempfile::tempdir().unwrap();
        let blocked = tmp.path().join("blocked");
        std::fs::create_dir_all(blocked.join(".git")).unwrap();
        write(&blocked.join("app.py"), "def run():\n    pass\n", 1_600_000_000);
        std::fs::create_dir(blocked.join(PROMPT_FILE)).unwrap();
        let repo = project(tmp.path());
        let ctx = live();

        let report = Scanner::new(&ctx).scan_tree(tmp.path()).unwrap();

        assert_eq!(report.written, vec![repo.join(PROMPT_FILE)]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, blocked);
        assert!(blocked.join(PROMPT_FILE).is_dir());
        assert!(std::fs::read_to_string(repo.join(PROMPT_FILE)).unwrap().contains("util.py"));
    }

    #[test]
    fn scan_tree_of_missing_root_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = live();
        let err = Scanner::new(&ctx).scan_tree(&tmp.path().join("missing")).unwrap_err();
        assert!(err.contains("failed to walk"));
    }

    #[test]
    fn audit_log_is_named_after_run_time() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cassette = Cassette::new("audit", "/t");
        cassette.push(Port::Clock, json!(null), json!("2023-09-08T10:01:00Z"));
        let ctx = ServiceContext::replaying_cassette(&cassette);
        let log_dir = tmp.path().join("logs");
        let written =
            vec![PathBuf::from("/a/chatgpt_prompt.txt"), PathBuf::from("/b/chatgpt_prompt.txt")];

        let path = write_audit_log(&ctx, &log_dir, &written).unwrap();

        assert_eq!(path, log_dir.join("20230908_1001AM_processed_directories.txt"));
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "/a/chatgpt_prompt.txt\n/b/chatgpt_prompt.txt\n"
        );
    }
}
