//! Error types for spreadsheet ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while turning an uploaded file into a dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Upload path does not exist.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the upload size limit.
    #[error("file {path} is {size} bytes, larger than the {max_size} byte limit")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Extension does not name a supported spreadsheet format.
    #[error("unsupported file type '{extension}' for {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    // === Parsing Errors ===
    /// Workbook bytes could not be opened or the sheet could not be read.
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    /// Workbook opened but has no sheets.
    #[error("workbook contains no worksheets")]
    NoWorksheet,

    /// CSV text uses an encoding other than UTF-8.
    #[error("unsupported CSV encoding: {encoding}")]
    UnsupportedEncoding { encoding: &'static str },

    /// CSV record could not be parsed.
    #[error("failed to parse CSV: {message}")]
    CsvParse { message: String },
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        Self::CsvParse {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
