//! `dirsum scan` command.

use std::path::Path;
use std::time::Instant;

use crate::context::ServiceContext;
use crate::scan::{write_audit_log, Scanner};

/// Execute the `scan` command.
///
/// Writes prompt files under `root`, then records the produced paths in a
/// timestamped log inside `log_dir`.
///
/// # Errors
///
/// Returns an error string if the tree cannot be walked. A log that cannot
/// be written is reported as a warning; the prompts are already on disk.
pub fn run(ctx: &ServiceContext, root: &Path, log_dir: &Path) -> Result<(), String> {
    let started = Instant::now();
    let report = Scanner::new(ctx).scan_tree(root)?;
    let log_path = match write_audit_log(ctx, log_dir, &report.written) {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::warn!("{e}");
            None
        }
    };

    println!(
        "Scanned {} director{}: {} prompt file(s) written, {} skipped, {} failed.",
        report.visited,
        if report.visited == 1 { "y" } else { "ies" },
        report.written.len(),
        report.skipped,
        report.failed.len(),
    );
    for (dir, reason) in &report.failed {
        println!("  failed: {} ({reason})", dir.display());
    }
    match log_path {
        Some(path) => println!("Processed directories logged to {}", path.display()),
        None => println!("Processed directories were not logged."),
    }
    println!("Elapsed: {:.2?}", started.elapsed());
    Ok(())
}
