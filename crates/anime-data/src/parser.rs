//! Parser for Jikan (MyAnimeList) JSON payloads.
//!
//! Handles the three shapes we read:
//! - search pages: `{"data": [ {...}, ... ], "pagination": {...}}`
//! - single lookups: `{"data": {...}}`
//! - genre lists: `{"data": [ {"mal_id": 1, "name": "Action"}, ... ]}`
//!
//! The wire structs are private; everything leaves this module as an
//! `AnimeRecord`. Missing or null fields never fail a parse, and neither do
//! dates we cannot read (they become `None`). Only structurally broken JSON
//! is an error.

use crate::error::Result;
use crate::types::*;
use chrono::{DateTime, NaiveDate};
use rayon::prelude::*;
use serde::Deserialize;

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Deserialize)]
struct JikanAnime {
    mal_id: AnimeId,
    title: Option<String>,
    title_english: Option<String>,
    synopsis: Option<String>,
    score: Option<f64>,
    scored_by: Option<u64>,
    rank: Option<u32>,
    popularity: Option<u32>,
    members: Option<u64>,
    favorites: Option<u64>,
    episodes: Option<u32>,
    aired: Option<JikanAired>,
    genres: Option<Vec<JikanNamed>>,
    studios: Option<Vec<JikanNamed>>,
    images: Option<JikanImages>,
    #[serde(rename = "type")]
    media_type: Option<String>,
    status: Option<String>,
    season: Option<String>,
    year: Option<i32>,
    rating: Option<String>,
    source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JikanAired {
    from: Option<String>,
    to: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JikanNamed {
    mal_id: Option<GenreId>,
    name: String,
}

#[derive(Debug, Deserialize)]
struct JikanImages {
    jpg: Option<JikanImageSet>,
}

#[derive(Debug, Deserialize)]
struct JikanImageSet {
    image_url: Option<String>,
    large_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JikanPagination {
    #[serde(default)]
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope<T> {
    data: Vec<T>,
    pagination: Option<JikanPagination>,
}

#[derive(Debug, Deserialize)]
struct SingleEnvelope<T> {
    data: T,
}

/// Catalog files may be a saved search page or a bare array of records
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Envelope { data: Vec<JikanAnime> },
    Bare(Vec<JikanAnime>),
}

// =============================================================================
// Public API
// =============================================================================

/// One page of search results
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub records: Vec<AnimeRecord>,
    pub has_next_page: bool,
}

/// Parse a search response into records, discarding pagination info.
pub fn parse_search_response(json: &str) -> Result<Vec<AnimeRecord>> {
    Ok(parse_search_page(json)?.records)
}

/// Parse a search response, keeping the "more pages" flag.
pub fn parse_search_page(json: &str) -> Result<SearchPage> {
    let envelope: ListEnvelope<JikanAnime> = serde_json::from_str(json)?;
    Ok(SearchPage {
        has_next_page: envelope
            .pagination
            .map(|p| p.has_next_page)
            .unwrap_or(false),
        records: envelope.data.into_iter().map(AnimeRecord::from).collect(),
    })
}

/// Parse a single-title lookup (`/anime/{id}`).
pub fn parse_anime_response(json: &str) -> Result<AnimeRecord> {
    let envelope: SingleEnvelope<JikanAnime> = serde_json::from_str(json)?;
    Ok(envelope.data.into())
}

/// Parse the genre list (`/genres/anime`), sorted by id.
pub fn parse_genres_response(json: &str) -> Result<Vec<GenreTag>> {
    let envelope: ListEnvelope<JikanNamed> = serde_json::from_str(json)?;
    let mut genres: Vec<GenreTag> = envelope
        .data
        .into_iter()
        .filter_map(|g| Some(GenreTag::new(g.mal_id?, g.name)))
        .collect();
    genres.sort();
    genres.dedup();
    Ok(genres)
}

/// Parse a saved catalog file. Record conversion runs in parallel since
/// catalog dumps can hold tens of thousands of titles.
pub fn parse_catalog(json: &str) -> Result<Vec<AnimeRecord>> {
    let raw = match serde_json::from_str::<CatalogFile>(json)? {
        CatalogFile::Envelope { data } => data,
        CatalogFile::Bare(data) => data,
    };
    Ok(raw.into_par_iter().map(AnimeRecord::from).collect())
}

/// Parse the date formats the API uses: full RFC 3339 timestamps
/// (`2020-04-01T00:00:00+00:00`) or plain `YYYY-MM-DD`.
pub fn parse_jikan_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    let prefix = s.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

// =============================================================================
// Conversion
// =============================================================================

impl From<JikanAnime> for AnimeRecord {
    fn from(raw: JikanAnime) -> Self {
        let (aired_from, aired_to) = match raw.aired {
            Some(aired) => (
                aired.from.as_deref().and_then(parse_jikan_date),
                aired.to.as_deref().and_then(parse_jikan_date),
            ),
            None => (None, None),
        };

        let image_url = raw
            .images
            .and_then(|i| i.jpg)
            .and_then(|jpg| jpg.large_image_url.or(jpg.image_url));

        let genres = raw
            .genres
            .unwrap_or_default()
            .into_iter()
            .map(|g| GenreTag::new(g.mal_id.unwrap_or(0), g.name))
            .collect();

        let studios = raw
            .studios
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.name)
            .collect();

        AnimeRecord {
            id: raw.mal_id,
            title: raw.title.unwrap_or_default(),
            title_english: raw.title_english,
            synopsis: raw.synopsis,
            score: raw.score,
            rank: raw.rank,
            popularity: raw.popularity,
            members: raw.members.unwrap_or(0),
            favorites: raw.favorites.unwrap_or(0),
            scored_by: raw.scored_by.unwrap_or(0),
            episodes: raw.episodes,
            aired_from,
            aired_to,
            genres,
            studios,
            image_url,
            media_type: raw.media_type.as_deref().and_then(MediaType::from_label),
            status: raw.status.as_deref().and_then(AiringStatus::from_label),
            season: raw.season.as_deref().and_then(|s| s.parse().ok()),
            year: raw.year,
            rating: raw.rating.as_deref().and_then(ContentRating::from_label),
            source: raw.source.as_deref().and_then(SourceMaterial::from_label),
        }
    }
}
