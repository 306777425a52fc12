//! Artifact cleaner: deletes generated prompt and result files.

use std::path::{Path, PathBuf};

use crate::artifact::{PROMPT_FILE, RESULT_FILE, SKIP_DIRS};
use crate::context::ServiceContext;

/// Aggregate of one clean run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Files removed, in walk order.
    pub removed: Vec<PathBuf>,
    /// Files that could not be removed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// File names to delete: prompts only, or prompts and results.
#[must_use]
pub fn targets(all: bool) -> &'static [&'static str] {
    if all {
        &[PROMPT_FILE, RESULT_FILE]
    } else {
        &[PROMPT_FILE]
    }
}

/// Removes every file named in `targets` under `root`.
///
/// # Errors
///
/// Returns an error only if `root` itself cannot be walked.
pub fn clean_tree(
    ctx: &ServiceContext,
    root: &Path,
    targets: &[&str],
) -> Result<CleanReport, String> {
    let dirs = ctx
        .fs
        .walk_dirs(root, SKIP_DIRS)
        .map_err(|e| format!("failed to walk {}: {e}", root.display()))?;

    let mut report = CleanReport::default();
    for dir in dirs {
        for name in targets {
            let path = dir.join(name);
            if !ctx.fs.exists(&path) {
                continue;
            }
            match ctx.fs.remove_file(&path) {
                Ok(()) => {
                    tracing::debug!("removed {}", path.display());
                    report.removed.push(path);
                }
                Err(e) => {
                    tracing::warn!("failed to remove {}: {e}", path.display());
                    report.failed.push((path, e.to_string()));
                }
            }
        }
    }
    Ok(report)
}
