//! Error types for the discovery crate

use anime_data::SourceError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiscoveryError {
    /// A title search came back empty
    #[error("No anime found for query: {0:?}")]
    NoResults(String),

    /// The metadata source failed; passed through untouched
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DiscoveryError>;
