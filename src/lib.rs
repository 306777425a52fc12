//! Core library entry for the `dirsum` CLI.

pub mod adapters;
pub mod artifact;
pub mod cassette;
pub mod clean;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod ports;
pub mod scan;
pub mod summarize;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // clap reports help and version output as errors; they are not failures.
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.print().map_err(|e| format!("failed to print help: {e}"))?;
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_cleans_empty_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_str().unwrap();
        let result = run(["dirsum", "clean", "--root", root]);
        assert!(result.is_ok());
    }

    #[test]
    fn help_and_version_succeed() {
        assert!(run(["dirsum", "--help"]).is_ok());
        assert!(run(["dirsum", "scan", "--help"]).is_ok());
        assert!(run(["dirsum", "--version"]).is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["dirsum", "unknown"]);
        assert!(result.is_err());
    }
}
