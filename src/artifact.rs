//! Names of the files this tool produces and the directories it never enters.

/// Per-directory metadata report written by the scanner.
pub const PROMPT_FILE: &str = "chatgpt_prompt.txt";

/// Per-directory response envelope written by the summarizer.
pub const RESULT_FILE: &str = "chatgpt_results.json";

/// Version-control and dependency-manager housekeeping directories.
pub const SKIP_DIRS: &[&str] = &[".git", ".svn", ".hg", ".idea", "node_modules", "__pycache__", ".venv"];

/// Entries whose presence marks a directory as a version-controlled project.
pub const VCS_MARKERS: &[&str] = &[".git", ".svn", ".hg"];

/// Returns `true` for files this tool generated itself.
#[must_use]
pub fn is_artifact(name: &str) -> bool {
    name == PROMPT_FILE || name == RESULT_FILE
}
