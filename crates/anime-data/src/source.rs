//! The seam between the core and wherever anime metadata comes from.
//!
//! Implementations:
//! - `jikan_client::JikanClient` (the live HTTP API)
//! - `AnimeCatalog` (a saved JSON dump, for offline use and tests)

use crate::criteria::FilterCriteria;
use crate::error::SourceError;
use crate::parser::SearchPage;
use crate::types::{AnimeRecord, GenreTag};
use async_trait::async_trait;

/// Core trait for anime metadata providers.
///
/// `Send + Sync` so a single source can back concurrent lookups (a battle
/// fetches both contenders at once).
#[async_trait]
pub trait AnimeSource: Send + Sync {
    /// Returns the name of this source (for logging/debugging)
    fn name(&self) -> &str;

    /// Free-text title search. Zero results is `Ok(vec![])`, not an error.
    async fn search_anime(&self, query: &str) -> Result<Vec<AnimeRecord>, SourceError>;

    /// One page (1-based) of titles matching `criteria`, in its sort order.
    async fn discover(
        &self,
        criteria: &FilterCriteria,
        page: u32,
    ) -> Result<SearchPage, SourceError>;

    /// All genres known to the source
    async fn genres(&self) -> Result<Vec<GenreTag>, SourceError>;
}
