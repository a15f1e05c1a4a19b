use std::path::PathBuf;

use thiserror::Error;

/// Errors raised around the formatter: reading inputs, talking to the
/// summarization service and exporting documents.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request to summarization service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("summarization service responded with {status}: {body}")]
    Service { status: u16, body: String },

    #[error("unsupported file type for {0}; only PDF and TXT files are supported")]
    UnsupportedFileType(String),

    #[error("summary not found: {0}")]
    SummaryNotFound(String),

    #[error("Typst compilation failed: {0}")]
    Typst(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, Error>;
