// Title normalization: strip sentence punctuation and lowercase.
//
// Only `,` `.` `!` `?` are removed. Hyphens, colons, digits and whitespace are
// left alone; the tokenizer downstream splits on them anyway.

use std::sync::LazyLock;

use regex_lite::Regex;

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,.!?]").expect("static punctuation pattern is valid"));

/// Normalize a single title.
pub fn normalize_title(title: &str) -> String {
    PUNCTUATION.replace_all(title, "").to_lowercase()
}

/// Normalize every title, preserving length and order.
pub fn normalize_titles<S: AsRef<str>>(titles: &[S]) -> Vec<String> {
    titles.iter().map(|t| normalize_title(t.as_ref())).collect()
}
