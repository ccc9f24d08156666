//! Filter criteria selected by the user.
//!
//! The remote search endpoint understands most of these fields directly. The
//! rest (season, episode bucket, source material) only exist on the returned
//! records, so `FilterCriteria::matches` re-checks everything locally.

use crate::error::{AnimeDataError, Result};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Coarse episode-count ranges offered as a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpisodeBucket {
    /// 1-12 episodes
    Short,
    /// 13-26 episodes
    Standard,
    /// 27-100 episodes
    Long,
    /// More than 100 episodes
    Epic,
}

impl EpisodeBucket {
    /// Whether an episode count falls in this bucket. Unknown counts never do.
    pub fn contains(&self, episodes: Option<u32>) -> bool {
        let Some(n) = episodes else {
            return false;
        };
        match self {
            EpisodeBucket::Short => (1..=12).contains(&n),
            EpisodeBucket::Standard => (13..=26).contains(&n),
            EpisodeBucket::Long => (27..=100).contains(&n),
            EpisodeBucket::Epic => n > 100,
        }
    }
}

impl FromStr for EpisodeBucket {
    type Err = AnimeDataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "short" | "1-12" => Ok(EpisodeBucket::Short),
            "standard" | "13-26" => Ok(EpisodeBucket::Standard),
            "long" | "27-100" => Ok(EpisodeBucket::Long),
            "epic" | "100+" => Ok(EpisodeBucket::Epic),
            _ => Err(AnimeDataError::InvalidValue {
                field: "episodes".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Field used to order results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    Score,
    Popularity,
    Rank,
    Members,
    Favorites,
    Title,
    StartDate,
    Episodes,
}

impl SortField {
    pub fn as_query(&self) -> &'static str {
        match self {
            SortField::Score => "score",
            SortField::Popularity => "popularity",
            SortField::Rank => "rank",
            SortField::Members => "members",
            SortField::Favorites => "favorites",
            SortField::Title => "title",
            SortField::StartDate => "start_date",
            SortField::Episodes => "episodes",
        }
    }
}

impl FromStr for SortField {
    type Err = AnimeDataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "score" => Ok(SortField::Score),
            "popularity" => Ok(SortField::Popularity),
            "rank" => Ok(SortField::Rank),
            "members" => Ok(SortField::Members),
            "favorites" => Ok(SortField::Favorites),
            "title" => Ok(SortField::Title),
            "start_date" | "start-date" => Ok(SortField::StartDate),
            "episodes" => Ok(SortField::Episodes),
            _ => Err(AnimeDataError::InvalidValue {
                field: "order_by".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_query(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = AnimeDataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(AnimeDataError::InvalidValue {
                field: "sort".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// The active filter selection of a browsing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Every listed genre must be present on a record
    pub genres: BTreeSet<GenreId>,
    pub media_type: Option<MediaType>,
    /// Records scoring below this are excluded; 0 disables the check
    pub min_score: f64,
    pub status: Option<AiringStatus>,
    pub season: Option<Season>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub episode_bucket: Option<EpisodeBucket>,
    pub rating: Option<ContentRating>,
    pub source: Option<SourceMaterial>,
    pub order_by: SortField,
    pub sort: SortDirection,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            genres: BTreeSet::new(),
            media_type: None,
            min_score: 1.0,
            status: None,
            season: None,
            start_year: None,
            end_year: None,
            episode_bucket: None,
            rating: None,
            source: None,
            order_by: SortField::Score,
            sort: SortDirection::Desc,
        }
    }
}

impl FilterCriteria {
    /// Check a record against every criterion.
    pub fn matches(&self, record: &AnimeRecord) -> bool {
        if !self.genres.iter().all(|&g| record.has_genre(g)) {
            return false;
        }
        if self.min_score > 0.0 && record.score_or_zero() < self.min_score {
            return false;
        }
        if !option_matches(self.media_type, record.media_type)
            || !option_matches(self.status, record.status)
            || !option_matches(self.season, record.season)
            || !option_matches(self.rating, record.rating)
            || !option_matches(self.source, record.source)
        {
            return false;
        }
        if let Some(bucket) = self.episode_bucket {
            if !bucket.contains(record.episodes) {
                return false;
            }
        }
        self.year_in_range(record.air_start_year())
    }

    fn year_in_range(&self, year: Option<i32>) -> bool {
        if self.start_year.is_none() && self.end_year.is_none() {
            return true;
        }
        let Some(year) = year else {
            return false;
        };
        self.start_year.is_none_or(|start| year >= start)
            && self.end_year.is_none_or(|end| year <= end)
    }

    /// Order two records by the selected sort field and direction.
    ///
    /// Missing values always sort last, whichever the direction.
    pub fn compare(&self, a: &AnimeRecord, b: &AnimeRecord) -> Ordering {
        let ordering = match self.order_by {
            SortField::Score => cmp_missing_last(a.score, b.score, self.sort),
            SortField::Popularity => cmp_missing_last(
                a.popularity.filter(|&p| p > 0),
                b.popularity.filter(|&p| p > 0),
                self.sort,
            ),
            SortField::Rank => cmp_missing_last(
                a.rank.filter(|&r| r > 0),
                b.rank.filter(|&r| r > 0),
                self.sort,
            ),
            SortField::Members => directed(a.members.cmp(&b.members), self.sort),
            SortField::Favorites => directed(a.favorites.cmp(&b.favorites), self.sort),
            SortField::Title => directed(
                a.title.to_lowercase().cmp(&b.title.to_lowercase()),
                self.sort,
            ),
            SortField::StartDate => cmp_missing_last(a.aired_from, b.aired_from, self.sort),
            SortField::Episodes => cmp_missing_last(a.episodes, b.episodes, self.sort),
        };
        ordering.then_with(|| a.id.cmp(&b.id))
    }
}

fn option_matches<T: PartialEq>(wanted: Option<T>, actual: Option<T>) -> bool {
    match wanted {
        Some(w) => actual == Some(w),
        None => true,
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn cmp_missing_last<T: PartialOrd>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => directed(
            x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            direction,
        ),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
