use thiserror::Error;

/// Main error type for the BioPAX exporter
#[derive(Error, Debug)]
pub enum BiopaxError {
    /// Source store errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed source graph documents
    #[error("Parse error: {0}")]
    Parse(String),

    /// Requested source record does not exist
    #[error("Source record not found: {0}")]
    SourceNotFound(String),

    /// Two model elements were registered under the same URI
    #[error("Duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    /// OWL / JSON output errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using BiopaxError
pub type Result<T> = std::result::Result<T, BiopaxError>;
