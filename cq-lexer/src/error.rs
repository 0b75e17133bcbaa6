use thiserror::Error;

/// A 1-based line/column position within the source SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub line: u64,
    pub column: u64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message} at line {}, column {}", location.line, location.column)]
pub struct LexerError {
    pub message: String,
    pub location: Location,
}

impl LexerError {
    pub fn new(message: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}
