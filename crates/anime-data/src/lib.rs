//! # Anime Data Crate
//!
//! Domain types and parsing for anime metadata sourced from the Jikan
//! (MyAnimeList) API.
//!
//! ## Main Components
//!
//! - **types**: `AnimeRecord` and its categorical fields
//! - **criteria**: `FilterCriteria`, the user's filter selection
//! - **parser**: Jikan JSON payloads into `AnimeRecord`s
//! - **catalog**: an in-memory, indexed collection of records
//! - **source**: the `AnimeSource` trait every metadata provider implements
//! - **error**: error types for loading and for upstream failures
//!
//! ## Example Usage
//!
//! ```ignore
//! use anime_data::{AnimeCatalog, FilterCriteria};
//! use std::path::Path;
//!
//! let catalog = AnimeCatalog::load_from_file(Path::new("data/top-anime.json"))?;
//! for record in catalog.filter(&FilterCriteria::default()).iter().take(10) {
//!     println!("{} ({:.2})", record.title, record.score_or_zero());
//! }
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod criteria;
pub mod parser;
pub mod catalog;
pub mod source;

// Re-export commonly used types for convenience
pub use error::{AnimeDataError, Result, SourceError};
pub use types::{
    // Type aliases & constants
    AnimeId,
    GenreId,
    UNRANKED_SENTINEL,
    // Core types
    AnimeRecord,
    GenreTag,
    // Enums
    AiringStatus,
    ContentRating,
    MediaType,
    Season,
    SourceMaterial,
};
pub use criteria::{EpisodeBucket, FilterCriteria, SortDirection, SortField};
pub use parser::SearchPage;
pub use catalog::AnimeCatalog;
pub use source::AnimeSource;
