//! Error types for the anime-data crate.
//!
//! Two families live here:
//! - `AnimeDataError` for local work (reading catalog files, parsing JSON,
//!   parsing filter values typed by a user)
//! - `SourceError` for failures of the external metadata service, which the
//!   core passes through untouched

use thiserror::Error;

/// Errors that can occur while loading or parsing anime metadata
#[derive(Error, Debug)]
pub enum AnimeDataError {
    /// Catalog file could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Payload was not the JSON shape we expect from the metadata API
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A field had a value we do not recognise (e.g. `--type cartoon`)
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, AnimeDataError>;

/// Failures reported by an `AnimeSource`.
///
/// These originate outside the core. Scoring and session tracking never
/// produce them and never retry them; they are simply propagated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Transport failure or an unexpected HTTP status
    #[error("Network error: {0}")]
    Network(String),

    /// The service asked us to slow down
    #[error("Rate limited by metadata service (retry after {retry_after_secs:?}s)")]
    RateLimited { retry_after_secs: Option<u64> },

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The service answered, but the body could not be decoded
    #[error("Invalid response from metadata service: {0}")]
    InvalidResponse(String),
}

impl From<AnimeDataError> for SourceError {
    fn from(err: AnimeDataError) -> Self {
        SourceError::InvalidResponse(err.to_string())
    }
}
