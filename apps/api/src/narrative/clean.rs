//! Cleanup applied to every raw generation response before it reaches a record.

use std::sync::LazyLock;

use regex::Regex;

/// `<think> … </think>` reasoning blocks, across any number of lines.
static REASONING_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid reasoning regex"));

/// A leading "Summary" label: `**Summary**`, `**Summary:**`, `Summary:`, or `Summary` alone on its line.
static LEADING_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[*_]+\s*summary\s*:?\s*[*_]+\s*:?|summary\s*:|summary[ \t]*(?:\r?\n|$))")
        .expect("valid label regex")
});

/// Removes reasoning blocks and a leading summary label, then trims.
pub fn clean_narrative(raw: &str) -> String {
    let without_reasoning = REASONING_BLOCK.replace_all(raw, "");
    let trimmed = without_reasoning.trim();
    LEADING_LABEL.replace(trimmed, "").trim().to_string()
}
