//! `dirsum clean` command.

use std::path::Path;

use crate::clean::{clean_tree, targets};
use crate::context::ServiceContext;

/// Execute the `clean` command.
///
/// Removes prompt files under `root`, and result files too when `all` is
/// set. There is no confirmation step.
///
/// # Errors
///
/// Returns an error string if the tree cannot be walked.
pub fn run(ctx: &ServiceContext, root: &Path, all: bool) -> Result<(), String> {
    let report = clean_tree(ctx, root, targets(all))?;
    println!("Removed {} file(s).", report.removed.len());
    if !report.failed.is_empty() {
        println!("Could not remove {} file(s):", report.failed.len());
        for (path, reason) in &report.failed {
            println!("  {} ({reason})", path.display());
        }
    }
    Ok(())
}
