//! Error types for catalog fetching and parsing.

use std::path::PathBuf;

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building the Unicode class or font catalogs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network fetch failed before a response arrived.
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The remote server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Http {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read a seed or cache file.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A class declaration line did not match the expected grammar.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The font catalog JSON was malformed.
    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A codepoint range string could not be parsed.
    #[error("Invalid codepoint range '{0}'")]
    InvalidRange(String),

    /// Neither a seed file, a cache file, nor the network produced a catalog.
    #[error("No usable source for {what}: no seed, no cache, network unavailable")]
    NoSource { what: &'static str },
}
