use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogisticsError {
    #[error("Config directory not found at {0}. Run 'logistics init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    /// The persistence medium could not be read or written; the mutation did not take effect.
    #[error("Storage unavailable for '{key}': {source}")]
    StorageUnavailable {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Entry '{0}' not found. Use 'logistics list' to see available entries.")]
    EntryNotFound(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD (e.g., '2026-10-19')")]
    InvalidDate(String),

    #[error("Invalid month '{0}'. Expected YYYY-MM (e.g., '2026-10')")]
    InvalidMonth(String),

    #[error("No entries recorded for {0}")]
    NoEntriesForMonth(String),

    #[error("Typst not found. Install it from https://typst.app/ or run: cargo install typst-cli")]
    TypstNotFound,

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("Failed to export CSV: {0}")]
    Export(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LogisticsError>;
