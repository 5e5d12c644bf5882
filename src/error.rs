use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("Malformed date for event '{title}': {value}")]
    MalformedDate { title: String, value: String },

    #[error("Event #{index} is missing required field: {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("No events to choose from")]
    EmptyCandidateSet,

    #[error("Event source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Favorites store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

}

impl From<reqwest::Error> for FinderError {
    fn from(err: reqwest::Error) -> Self {
        FinderError::SourceUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FinderError>;
