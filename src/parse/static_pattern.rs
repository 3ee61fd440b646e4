use std::sync::OnceLock;

use regex::Regex;
use scraper::Selector;

/// A pattern that is compiled from a string literal the first time it is used.
pub trait FromPattern: Sized {
    fn from_pattern(pattern: &str) -> Result<Self, String>;
}

impl FromPattern for Selector {
    fn from_pattern(pattern: &str) -> Result<Self, String> {
        Self::parse(pattern).map_err(|e| format!("{e:?}"))
    }
}

impl FromPattern for Regex {
    fn from_pattern(pattern: &str) -> Result<Self, String> {
        Self::new(pattern).map_err(|e| e.to_string())
    }
}

#[derive(Debug)]
pub struct StaticPattern<T> {
    cell: OnceLock<T>,
    pattern: &'static str,
}

impl<T> StaticPattern<T> {
    pub const fn new(pattern: &'static str) -> Self {
        Self {
            cell: OnceLock::new(),
            pattern,
        }
    }
}

impl<T: FromPattern> core::ops::Deref for StaticPattern<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.cell
            .get_or_init(|| match T::from_pattern(self.pattern) {
                Ok(compiled) => compiled,
                Err(e) => panic!("Error compiling static pattern {}: {e}", self.pattern),
            })
    }
}

#[macro_export]
macro_rules! static_selector {
    ($x: ident <- $sel: literal) => {
        static $x: $crate::parse::static_pattern::StaticPattern<::scraper::Selector> =
            $crate::parse::static_pattern::StaticPattern::new($sel);
    };
}

#[macro_export]
macro_rules! static_regex {
    ($x: ident <- $re: literal) => {
        static $x: $crate::parse::static_pattern::StaticPattern<::regex::Regex> =
            $crate::parse::static_pattern::StaticPattern::new($re);
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_patterns_compile_lazily() {
        static_regex!(PRICE <- r"\d+,\d{2}");
        static_selector!(STRONG <- "strong");
        assert!(PRICE.is_match("Schnitzel 4,50 €"));
        let doc = scraper::Html::parse_fragment("<p><strong>Montag</strong></p>");
        assert_eq!(doc.select(&STRONG).count(), 1);
    }
}
