//! Core domain types for anime metadata.
//!
//! `AnimeRecord` is the read-only view of one title as returned by the
//! metadata service. Every numeric field may be missing upstream, so the
//! record exposes accessors that substitute a neutral value (0 for counts and
//! score, `UNRANKED_SENTINEL` for rank-like fields) instead of leaking
//! `Option`s into formulas.

use crate::error::{AnimeDataError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Type Aliases & Constants
// =============================================================================

/// MyAnimeList identifier of a title
pub type AnimeId = i64;

/// MyAnimeList identifier of a genre
pub type GenreId = u32;

/// Stand-in for "unranked" rank and popularity values
pub const UNRANKED_SENTINEL: u32 = 999_999;

// =============================================================================
// AnimeRecord
// =============================================================================

/// A genre as reported by the metadata service
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenreTag {
    pub id: GenreId,
    pub name: String,
}

impl GenreTag {
    pub fn new(id: GenreId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Metadata entry for one title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeRecord {
    pub id: AnimeId,
    pub title: String,
    pub title_english: Option<String>,
    pub synopsis: Option<String>,
    /// Mean user score, typically 0-10
    pub score: Option<f64>,
    /// Overall rank, lower is better
    pub rank: Option<u32>,
    /// Popularity rank, lower is better
    pub popularity: Option<u32>,
    pub members: u64,
    pub favorites: u64,
    /// Number of users who scored the title
    pub scored_by: u64,
    pub episodes: Option<u32>,
    pub aired_from: Option<NaiveDate>,
    pub aired_to: Option<NaiveDate>,
    pub genres: Vec<GenreTag>,
    pub studios: Vec<String>,
    pub image_url: Option<String>,
    pub media_type: Option<MediaType>,
    pub status: Option<AiringStatus>,
    pub season: Option<Season>,
    /// Season year; falls back to the air-start year when absent
    pub year: Option<i32>,
    pub rating: Option<ContentRating>,
    pub source: Option<SourceMaterial>,
}

impl AnimeRecord {
    /// A record with only an id and a title; every other field absent.
    pub fn new(id: AnimeId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            title_english: None,
            synopsis: None,
            score: None,
            rank: None,
            popularity: None,
            members: 0,
            favorites: 0,
            scored_by: 0,
            episodes: None,
            aired_from: None,
            aired_to: None,
            genres: Vec::new(),
            studios: Vec::new(),
            image_url: None,
            media_type: None,
            status: None,
            season: None,
            year: None,
            rating: None,
            source: None,
        }
    }

    /// Score, or 0 when the title is unscored
    pub fn score_or_zero(&self) -> f64 {
        self.score.filter(|s| s.is_finite()).unwrap_or(0.0)
    }

    /// Rank, or `UNRANKED_SENTINEL`. The API reports 0 for some unranked
    /// titles, which is treated the same as a missing value.
    pub fn rank_or_sentinel(&self) -> u32 {
        self.rank.filter(|&r| r > 0).unwrap_or(UNRANKED_SENTINEL)
    }

    /// Popularity, or `UNRANKED_SENTINEL` (same convention as rank)
    pub fn popularity_or_sentinel(&self) -> u32 {
        self.popularity.filter(|&p| p > 0).unwrap_or(UNRANKED_SENTINEL)
    }

    /// Calendar year the title started airing
    pub fn air_start_year(&self) -> Option<i32> {
        self.aired_from.map(|d| d.year()).or(self.year)
    }

    /// English title when it differs from the main one
    pub fn alternate_title(&self) -> Option<&str> {
        self.title_english
            .as_deref()
            .filter(|t| !t.is_empty() && *t != self.title)
    }

    pub fn has_genre(&self, genre: GenreId) -> bool {
        self.genres.iter().any(|g| g.id == genre)
    }

    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.name.as_str()).collect()
    }
}

// =============================================================================
// Categorical fields
// =============================================================================
// Each enum knows two spellings: the label the API puts in records
// (`from_label`) and the lowercase value it accepts as a query parameter
// (`as_query` / `FromStr`).

fn invalid(field: &str, value: &str) -> AnimeDataError {
    AnimeDataError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Media format of a title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    Tv,
    Movie,
    Ova,
    Special,
    Ona,
    Music,
}

impl MediaType {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "TV" => Some(MediaType::Tv),
            "Movie" => Some(MediaType::Movie),
            "OVA" => Some(MediaType::Ova),
            "Special" => Some(MediaType::Special),
            "ONA" => Some(MediaType::Ona),
            "Music" => Some(MediaType::Music),
            _ => None,
        }
    }

    pub fn as_query(&self) -> &'static str {
        match self {
            MediaType::Tv => "tv",
            MediaType::Movie => "movie",
            MediaType::Ova => "ova",
            MediaType::Special => "special",
            MediaType::Ona => "ona",
            MediaType::Music => "music",
        }
    }
}

impl FromStr for MediaType {
    type Err = AnimeDataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tv" => Ok(MediaType::Tv),
            "movie" => Ok(MediaType::Movie),
            "ova" => Ok(MediaType::Ova),
            "special" => Ok(MediaType::Special),
            "ona" => Ok(MediaType::Ona),
            "music" => Ok(MediaType::Music),
            _ => Err(invalid("type", s)),
        }
    }
}

/// Airing status of a title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiringStatus {
    Airing,
    Complete,
    Upcoming,
}

impl AiringStatus {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Currently Airing" => Some(AiringStatus::Airing),
            "Finished Airing" => Some(AiringStatus::Complete),
            "Not yet aired" => Some(AiringStatus::Upcoming),
            _ => None,
        }
    }

    pub fn as_query(&self) -> &'static str {
        match self {
            AiringStatus::Airing => "airing",
            AiringStatus::Complete => "complete",
            AiringStatus::Upcoming => "upcoming",
        }
    }
}

impl FromStr for AiringStatus {
    type Err = AnimeDataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "airing" => Ok(AiringStatus::Airing),
            "complete" => Ok(AiringStatus::Complete),
            "upcoming" => Ok(AiringStatus::Upcoming),
            _ => Err(invalid("status", s)),
        }
    }
}

/// Broadcast season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub fn as_query(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
        }
    }
}

impl FromStr for Season {
    type Err = AnimeDataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" | "autumn" => Ok(Season::Fall),
            _ => Err(invalid("season", s)),
        }
    }
}

/// Audience rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentRating {
    G,
    Pg,
    Pg13,
    R17,
    RPlus,
    Rx,
}

impl ContentRating {
    /// Labels look like "PG-13 - Teens 13 or older"; only the code before the
    /// first " - " matters.
    pub fn from_label(label: &str) -> Option<Self> {
        let code = label.split(" - ").next().unwrap_or(label).trim();
        match code {
            "G" => Some(ContentRating::G),
            "PG" => Some(ContentRating::Pg),
            "PG-13" => Some(ContentRating::Pg13),
            "R" => Some(ContentRating::R17),
            "R+" => Some(ContentRating::RPlus),
            "Rx" => Some(ContentRating::Rx),
            _ => None,
        }
    }

    pub fn as_query(&self) -> &'static str {
        match self {
            ContentRating::G => "g",
            ContentRating::Pg => "pg",
            ContentRating::Pg13 => "pg13",
            ContentRating::R17 => "r17",
            ContentRating::RPlus => "r",
            ContentRating::Rx => "rx",
        }
    }
}

impl FromStr for ContentRating {
    type Err = AnimeDataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "g" => Ok(ContentRating::G),
            "pg" => Ok(ContentRating::Pg),
            "pg13" => Ok(ContentRating::Pg13),
            "r17" => Ok(ContentRating::R17),
            "r" => Ok(ContentRating::RPlus),
            "rx" => Ok(ContentRating::Rx),
            _ => Err(invalid("rating", s)),
        }
    }
}

/// What the adaptation is based on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceMaterial {
    Original,
    Manga,
    LightNovel,
    VisualNovel,
    WebManga,
    Novel,
    Game,
    Other,
}

impl SourceMaterial {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "" | "Unknown" => None,
            "Original" => Some(SourceMaterial::Original),
            "Manga" | "4-koma manga" => Some(SourceMaterial::Manga),
            "Light novel" => Some(SourceMaterial::LightNovel),
            "Visual novel" => Some(SourceMaterial::VisualNovel),
            "Web manga" => Some(SourceMaterial::WebManga),
            "Novel" | "Web novel" => Some(SourceMaterial::Novel),
            "Game" | "Card game" => Some(SourceMaterial::Game),
            _ => Some(SourceMaterial::Other),
        }
    }
}

impl FromStr for SourceMaterial {
    type Err = AnimeDataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "original" => Ok(SourceMaterial::Original),
            "manga" => Ok(SourceMaterial::Manga),
            "lightnovel" => Ok(SourceMaterial::LightNovel),
            "visualnovel" => Ok(SourceMaterial::VisualNovel),
            "webmanga" => Ok(SourceMaterial::WebManga),
            "novel" => Ok(SourceMaterial::Novel),
            "game" => Ok(SourceMaterial::Game),
            "other" => Ok(SourceMaterial::Other),
            _ => Err(invalid("source", s)),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MediaType::Tv => "TV",
            MediaType::Movie => "Movie",
            MediaType::Ova => "OVA",
            MediaType::Special => "Special",
            MediaType::Ona => "ONA",
            MediaType::Music => "Music",
        };
        f.write_str(label)
    }
}
