//! Error types for cell parsing and markup attachment

/// Failure to turn a cell's text into a typed value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Integer column holding something that is not an integer
    #[error("'{raw}' is not an integer")]
    NotAnInteger { raw: String },

    /// Date text that does not split into exactly day, month and year
    #[error("date '{raw}' has {found} parts, expected 3")]
    DateTokenCount { raw: String, found: usize },

    /// Month written as a word that is not in the month table
    #[error("unknown month name '{month}'")]
    UnknownMonth { month: String },

    /// Day, month or year that is not a number
    #[error("date '{raw}' has a non-numeric {part}")]
    DateNotNumeric { raw: String, part: &'static str },

    /// Parts are numbers but do not form a calendar date
    #[error("date '{raw}' is not a calendar date")]
    DateOutOfRange { raw: String },
}

/// The markup a widget attaches to does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    #[error("column {column} has unknown type '{value}'")]
    UnknownColumnType { column: usize, value: String },

    #[error("column {column} is named '{name}' but has no search input")]
    MissingSearchInput { column: usize, name: String },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("table has rows but no body element")]
    MissingBody,

    #[error("modal '{id}' has no {part} element")]
    MissingModalPart { id: String, part: &'static str },

    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

impl ParseError {
    pub fn not_an_integer(raw: impl Into<String>) -> Self {
        Self::NotAnInteger { raw: raw.into() }
    }
}
