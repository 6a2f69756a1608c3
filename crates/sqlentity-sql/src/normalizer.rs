//! Comment stripping and whitespace normalization

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// String literals are matched first so comment markers inside them survive.
static COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)'(?:[^'\\]|\\.|'')*'|--[^\n]*|/\*.*?\*/").expect("comment pattern is valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Remove `--` and `/* */` comments and collapse whitespace runs to one space.
///
/// Never fails; the result is trimmed and has no line breaks.
pub fn normalize(raw: &str) -> String {
    let without_comments = COMMENT.replace_all(raw, |caps: &Captures| {
        let matched = &caps[0];
        if matched.starts_with('\'') {
            matched.to_string()
        } else {
            " ".to_string()
        }
    });

    WHITESPACE
        .replace_all(&without_comments, " ")
        .trim()
        .to_string()
}
