//! Error types for loading and acting on the BOF catalog.
//!
//! The ranking core never fails; everything here comes from the edges
//! (fetching the index, the clipboard, the system opener).

use thiserror::Error;

/// Errors that can occur around the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The index server answered with a non-success status
    #[error("index request failed with HTTP {0}")]
    Status(u16),

    /// Network-level failure while fetching the index
    #[error("index request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Reading a local index file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The index document was not valid JSON
    #[error("index parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An index location or page address could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Clipboard write errors
    #[error("clipboard error: {0}")]
    Clipboard(String),

    /// The system opener refused the URL
    #[error("open error: {0}")]
    Open(String),

    #[error("unknown sort mode: {0}")]
    UnknownSortMode(String),
}

/// Result type alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
