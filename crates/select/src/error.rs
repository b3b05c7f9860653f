//! Error kinds for font location and materialization.

use std::path::PathBuf;

/// Errors from one attempt to locate or materialize a font file.
///
/// Every materialization failure is recoverable: the caller walks an
/// ordered fallback chain and degrades to an artifact marker, so these
/// never abort a scan.
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    /// Network download failed before a response arrived.
    #[error("Failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The font server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Http {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The downloaded archive could not be opened.
    #[error("Failed to open archive {url}: {message}")]
    Archive { url: String, message: String },

    /// No archive member matched the wanted file name or its alternates.
    #[error("No member matching '{member}' in archive {url}")]
    MemberNotFound { url: String, member: String },

    /// The downloaded bytes do not parse as a font.
    #[error("Downloaded file for '{family}' is not a parseable font")]
    InvalidFont { family: String },

    /// The declarative font index could not be read.
    #[error("Failed to read font index '{path}': {source}")]
    IndexIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The declarative font index is not valid JSON.
    #[error("Invalid font index '{path}': {source}")]
    IndexFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem failure while copying or writing a font file.
    #[error("IO error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The family was found nowhere: index, local installation or network.
    #[error("Font family '{family}' not found")]
    NotFound { family: String },
}
