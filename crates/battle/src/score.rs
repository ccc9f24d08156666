//! Per-title battle score.
//!
//! total = base + quality, where
//!
//! ```text
//! base    = 0.30·score + 0.20·popularity + 0.15·members + 0.10·favorites
//!         + 0.10·scored_by + 0.15·rank
//! quality = 0.3·episodes + 0.2·synopsis + 0.2·genres + 0.2·studios + 0.1·recency
//! ```
//!
//! Each term is computed from the record's substituted values, so a record
//! with every optional field missing still scores a finite, non-negative
//! number. `now` is an argument rather than a clock read; the recency term is
//! the only place it matters.

use anime_data::AnimeRecord;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

// Base score weights
pub const SCORE_WEIGHT: f64 = 0.30;
pub const POPULARITY_WEIGHT: f64 = 0.20;
pub const MEMBERS_WEIGHT: f64 = 0.15;
pub const FAVORITES_WEIGHT: f64 = 0.10;
pub const SCORED_BY_WEIGHT: f64 = 0.10;
pub const RANK_WEIGHT: f64 = 0.15;

// Quality bonus weights
pub const EPISODE_WEIGHT: f64 = 0.3;
pub const SYNOPSIS_WEIGHT: f64 = 0.2;
pub const GENRE_WEIGHT: f64 = 0.2;
pub const STUDIO_WEIGHT: f64 = 0.2;
pub const RECENCY_WEIGHT: f64 = 0.1;

/// Rank-like values at or beyond this contribute nothing
const RANK_CEILING: f64 = 10_000.0;

/// Titles that started airing this many calendar years ago or fewer count
/// as recent
pub const RECENCY_WINDOW_YEARS: i32 = 5;

/// Every term that went into one title's battle score.
///
/// Terms are stored unweighted; `base`, `quality` and `total` are the
/// weighted sums.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub score: f64,
    pub popularity_term: f64,
    pub members_term: f64,
    pub favorites_term: f64,
    pub scored_by_term: f64,
    pub rank_term: f64,
    pub base: f64,

    pub episode_term: f64,
    pub synopsis_term: f64,
    pub genre_term: f64,
    pub studio_term: f64,
    pub recency_term: f64,
    pub quality: f64,

    pub total: f64,
}

/// Compute the full score breakdown for one record at instant `now`.
pub fn score_record(record: &AnimeRecord, now: DateTime<Utc>) -> ScoreBreakdown {
    let score = record.score_or_zero();
    let popularity_term = rank_like_term(record.popularity_or_sentinel());
    let members_term = log10_or_zero(record.members);
    let favorites_term = (record.favorites as f64 + 1.0).log10();
    let scored_by_term = log10_or_zero(record.scored_by);
    let rank_term = rank_like_term(record.rank_or_sentinel());

    let base = SCORE_WEIGHT * score
        + POPULARITY_WEIGHT * popularity_term
        + MEMBERS_WEIGHT * members_term
        + FAVORITES_WEIGHT * favorites_term
        + SCORED_BY_WEIGHT * scored_by_term
        + RANK_WEIGHT * rank_term;

    let episode_term = record
        .episodes
        .map(|e| (e as f64 / 12.0).min(3.0))
        .unwrap_or(1.0);
    let synopsis_term = record
        .synopsis
        .as_deref()
        .map(|s| (s.chars().count() as f64 / 200.0).min(2.0))
        .unwrap_or(0.0);
    let genre_term = (record.genres.len() as f64 / 3.0).min(2.0);
    let studio_term = if record.studios.is_empty() { 1.0 } else { 1.5 };
    let recency_term = recency_term(record, now);

    let quality = EPISODE_WEIGHT * episode_term
        + SYNOPSIS_WEIGHT * synopsis_term
        + GENRE_WEIGHT * genre_term
        + STUDIO_WEIGHT * studio_term
        + RECENCY_WEIGHT * recency_term;

    ScoreBreakdown {
        score,
        popularity_term,
        members_term,
        favorites_term,
        scored_by_term,
        rank_term,
        base,
        episode_term,
        synopsis_term,
        genre_term,
        studio_term,
        recency_term,
        quality,
        total: base + quality,
    }
}

/// Shorthand for `score_record(record, now).total`
pub fn battle_score(record: &AnimeRecord, now: DateTime<Utc>) -> f64 {
    score_record(record, now).total
}

/// `max(0, (10000 - value) / 100)`; the unranked sentinel lands at 0.
fn rank_like_term(value: u32) -> f64 {
    ((RANK_CEILING - value as f64) / 100.0).max(0.0)
}

fn log10_or_zero(count: u64) -> f64 {
    if count > 0 {
        (count as f64).log10()
    } else {
        0.0
    }
}

/// 1 when the title started airing within the last `RECENCY_WINDOW_YEARS`
/// calendar years (current year included), 0 otherwise. Titles with no known
/// start, or starting after `now`'s year, are not recent.
fn recency_term(record: &AnimeRecord, now: DateTime<Utc>) -> f64 {
    match record.air_start_year() {
        Some(year) if year <= now.year() && now.year() - year <= RECENCY_WINDOW_YEARS => 1.0,
        _ => 0.0,
    }
}
