//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `dirsum`.
#[derive(Debug, Parser)]
#[command(name = "dirsum", version, about = "Summarize source trees directory by directory")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write a prompt file into every eligible project directory.
    Scan {
        /// Root of the tree to walk.
        #[arg(long, env = "TREE_TO_WALK")]
        root: PathBuf,
        /// Directory receiving the processed-directories log.
        #[arg(long, default_value = "logs")]
        log_dir: PathBuf,
    },
    /// Submit pending prompt files and store the responses.
    Summarize {
        /// Root of the tree to walk.
        #[arg(long, env = "TREE_TO_WALK")]
        root: PathBuf,
    },
    /// Delete generated prompt files.
    Clean {
        /// Root of the tree to walk.
        #[arg(long, env = "TREE_TO_WALK")]
        root: PathBuf,
        /// Also delete result files.
        #[arg(long)]
        all: bool,
    },
}
