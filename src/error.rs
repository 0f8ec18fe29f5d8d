//! Error types for docmerge library.

use std::io;
use thiserror::Error;

/// Result type alias for docmerge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while merging documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Document JSON could not be read or written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV source could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet workbook could not be opened or read.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// The source document does not exist in the document store.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// The tabular source does not exist in the tabular store.
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// The file extension is not a recognized document or sheet format.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The sheet content is malformed.
    #[error("Invalid sheet: {0}")]
    InvalidSheet(String),

    /// The target document could not be written.
    #[error("Document store write failed: {0}")]
    Store(String),

    /// Template placeholders without a matching column (strict mode).
    #[error("Placeholders without matching column: {}", .0.join(", "))]
    UnmatchedPlaceholders(Vec<String>),

    /// Error during rendering (text, Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        match err {
            calamine::Error::Io(e) => Error::Io(e),
            _ => Error::Spreadsheet(err.to_string()),
        }
    }
}
