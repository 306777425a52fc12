//! Command dispatch and handlers.

pub mod clean;
pub mod scan;
pub mod summarize;

use std::env;
use std::path::{Path, PathBuf};

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::config::ApiConfig;
use crate::context::ServiceContext;

/// Environment variable naming a directory to record cassettes into.
pub const RECORD_VAR: &str = "DIRSUM_RECORD";

/// Dispatch a parsed command to its handler.
///
/// When `DIRSUM_RECORD` is set to a directory path, clock and LLM
/// interactions are recorded to per-port cassette files under it.
///
/// # Errors
///
/// Returns an error string if configuration is missing or the selected
/// command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    // Only summarize talks to the API; the other commands run without keys.
    let api = match command {
        Command::Summarize { .. } => Some(ApiConfig::from_env()?),
        Command::Scan { .. } | Command::Clean { .. } => None,
    };

    let (ctx, session) = if let Ok(path) = env::var(RECORD_VAR) {
        let (ctx, session) =
            ServiceContext::recording_at(&PathBuf::from(path), root_of(command), api)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(api), None)
    };

    let result = dispatch_with_context(command, &ctx);

    // Finish recording after the command completes, even on error.
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        return settle(result, finish_recording(session));
    }

    result
}

/// Combines the command result with the recording result.
///
/// The command's own error wins; a recording failure behind it is logged.
fn settle(result: Result<(), String>, recorded: Result<(), String>) -> Result<(), String> {
    match (result, recorded) {
        (Err(e), Err(recording)) => {
            tracing::warn!("{recording}");
            Err(e)
        }
        (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
        (Ok(()), Ok(())) => Ok(()),
    }
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(command: &Command, ctx: &ServiceContext) -> Result<(), String> {
    match command {
        Command::Scan { root, log_dir } => scan::run(ctx, root, log_dir),
        Command::Summarize { root } => summarize::run(ctx, root),
        Command::Clean { root, all } => clean::run(ctx, root, *all),
    }
}

fn root_of(command: &Command) -> &Path {
    match command {
        Command::Scan { root, .. } | Command::Summarize { root } | Command::Clean { root, .. } => {
            root
        }
    }
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
