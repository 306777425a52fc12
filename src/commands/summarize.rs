//! `dirsum summarize` command.

use std::path::Path;
use std::time::Instant;

use crate::context::ServiceContext;
use crate::summarize::Summarizer;

/// Execute the `summarize` command.
///
/// Runs on a single-threaded runtime: directories are submitted one at a
/// time and each call is awaited before the next begins.
///
/// # Errors
///
/// Returns an error string if the runtime cannot start or the tree cannot
/// be walked.
pub fn run(ctx: &ServiceContext, root: &Path) -> Result<(), String> {
    let started = Instant::now();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start async runtime: {e}"))?;
    let report = runtime.block_on(Summarizer::new(ctx).summarize_tree(root))?;

    println!(
        "Summarized {} director{}, {} already done, {} without a prompt file, {} failed.",
        report.written.len(),
        if report.written.len() == 1 { "y" } else { "ies" },
        report.already_summarized,
        report.no_prompt,
        report.failed.len(),
    );
    for (dir, reason) in &report.failed {
        println!("  failed: {} ({reason})", dir.display());
    }
    println!("Elapsed: {:.2?}", started.elapsed());
    Ok(())
}
