use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the bikeshare explorer.
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// The city is not present in the registry.
    #[error("Unknown city: {0}")]
    UnknownCity(String),

    /// A data row could not be turned into a trip record.
    ///
    /// `row` is the zero-based index of the data row (the header is not
    /// counted).
    #[error("Malformed record at row {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },

    /// The header of a trip log lacks a column the city's schema requires.
    #[error("Missing column in {city} trip log: {column}")]
    MissingColumn { city: String, column: String },

    /// A month/weekday selector or page size is outside its allowed set.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV error that is not tied to a single data row.
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the bikeshare crates.
pub type Result<T> = std::result::Result<T, ExplorerError>;
