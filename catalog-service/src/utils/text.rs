use regex::Regex;
use std::sync::OnceLock;

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Collapses inner whitespace runs and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    whitespace().replace_all(text.trim(), " ").into_owned()
}

/// Key used for case-insensitive equality on text columns.
pub fn normalize_key(text: &str) -> String {
    collapse_whitespace(text).to_lowercase()
}

/// Treats `None` and blank strings alike: both mean "no filter".
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
