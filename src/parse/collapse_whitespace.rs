use std::borrow::Cow;

use crate::static_regex;

/// Trims `s` and replaces every run of whitespace (including newlines) with a single space.
pub fn collapse_whitespace(s: &str) -> Cow<'_, str> {
    static_regex!(WHITESPACE <- r"\s+");
    WHITESPACE.replace_all(s.trim(), " ")
}
