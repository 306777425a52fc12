//! Shrinks prompt text before submission.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));
static DOUBLE_QUOTED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)""".*?""""#).expect("docstring pattern compiles"));
static SINGLE_QUOTED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)'''.*?'''").expect("docstring pattern compiles"));

/// Drops `#` lines, collapses whitespace and removes triple-quoted spans.
///
/// This only reduces payload size; the result is not meant to be read back.
#[must_use]
pub fn normalize(text: &str) -> String {
    let kept: Vec<&str> = text.lines().filter(|line| !line.trim_start().starts_with('#')).collect();
    let joined = kept.join(" ");
    let collapsed = WHITESPACE.replace_all(&joined, " ");
    let collapsed = collapsed.trim();
    let without_double = DOUBLE_QUOTED_BLOCK.replace_all(collapsed, "");
    SINGLE_QUOTED_BLOCK.replace_all(&without_double, "").into_owned()
}
