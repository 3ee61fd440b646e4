use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    TextParse(String),
    PriceParse(String),
    MissingStructure(String),
    Date(String),
    UnknownLocation(String),
}

impl From<chrono::ParseError> for Error {
    fn from(e: chrono::ParseError) -> Self {
        Self::Date(e.to_string())
    }
}

impl Error {
    pub fn html_parse_error(msg: &str) -> Self {
        Self::HtmlParse(msg.to_string())
    }
    pub fn text_parse_error(msg: &str) -> Self {
        Self::TextParse(msg.to_string())
    }
    pub fn price_parse_error(msg: &str) -> Self {
        Self::PriceParse(msg.to_string())
    }
    pub fn missing_structure(msg: impl Into<String>) -> Self {
        Self::MissingStructure(msg.into())
    }
    pub fn date_error(msg: impl Into<String>) -> Self {
        Self::Date(msg.into())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "HTML Parse Error: {msg}"),
            Self::TextParse(msg) => write!(f, "Text Parse Error: {msg}"),
            Self::PriceParse(msg) => write!(f, "Price Parse Error: {msg}"),
            Self::MissingStructure(msg) => write!(f, "Missing Structure: {msg}"),
            Self::Date(msg) => write!(f, "Date Error: {msg}"),
            Self::UnknownLocation(name) => write!(f, "Unknown location: {name}"),
        }
    }
}

impl std::error::Error for Error {}
