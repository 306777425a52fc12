//! Integration tests for top-level CLI behavior.

use std::fs;
use std::path::Path;
use std::process::Command;

fn run_dirsum(cwd: &Path, args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_dirsum");
    Command::new(bin)
        .current_dir(cwd)
        .args(args)
        .env_remove("TREE_TO_WALK")
        .env_remove("DIRSUM_RECORD")
        .env_remove("OPENAI_API_KEY")
        .env_remove("OPENAI_API_BASE_URL")
        .env_remove("OPENAI_API_VERSION")
        .env_remove("OPENAI_API_DEPLOYMENT")
        .output()
        .expect("failed to run dirsum binary")
}

fn project(root: &Path) {
    fs::create_dir_all(root.join("app/.git")).unwrap();
    fs::write(root.join("app/main.py"), "import os\n# entry point\ndef main():\n    pass\n").unwrap();
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::write(root.join("docs/notes.md"), "notes\n").unwrap();
}

#[test]
fn help_lists_subcommands() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_dirsum(tmp.path(), &["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("scan"));
    assert!(stdout.contains("summarize"));
    assert!(stdout.contains("clean"));
}

#[test]
fn version_prints_to_stdout() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_dirsum(tmp.path(), &["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.starts_with("dirsum "));
}

#[test]
fn scan_writes_prompt_and_log() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path());
    let root = tmp.path().to_str().unwrap();

    let output = run_dirsum(tmp.path(), &["scan", "--root", root, "--log-dir", "logs"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("1 prompt file(s) written"));
    let prompt = fs::read_to_string(tmp.path().join("app/chatgpt_prompt.txt")).unwrap();
    assert!(prompt.contains("main"));
    assert!(!tmp.path().join("docs/chatgpt_prompt.txt").exists());
    assert_eq!(fs::read_dir(tmp.path().join("logs")).unwrap().count(), 1);
}

#[test]
fn root_falls_back_to_environment() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path());
    let bin = env!("CARGO_BIN_EXE_dirsum");

    let output = Command::new(bin)
        .current_dir(tmp.path())
        .args(["clean"])
        .env("TREE_TO_WALK", tmp.path())
        .env_remove("DIRSUM_RECORD")
        .output()
        .expect("failed to run dirsum binary");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Removed 0 file(s)."));
}

#[test]
fn missing_root_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_dirsum(tmp.path(), &["scan"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("--root"));
}

#[test]
fn summarize_without_api_config_fails_fast() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path());
    let root = tmp.path().to_str().unwrap();

    let output = run_dirsum(tmp.path(), &["summarize", "--root", root]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("missing API configuration"));
    assert!(stderr.contains("OPENAI_API_KEY"));
}

#[test]
fn clean_all_reports_count() {
    let tmp = tempfile::tempdir().unwrap();
    for dir in ["a", "b", "c"] {
        fs::create_dir_all(tmp.path().join(dir)).unwrap();
        fs::write(tmp.path().join(dir).join("chatgpt_prompt.txt"), "prompt").unwrap();
    }
    for dir in ["a", "b"] {
        fs::write(tmp.path().join(dir).join("chatgpt_results.json"), "{}").unwrap();
    }
    let root = tmp.path().to_str().unwrap();

    let output = run_dirsum(tmp.path(), &["clean", "--root", root, "--all"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Removed 5 file(s)."));
    assert!(!tmp.path().join("a/chatgpt_results.json").exists());
}
