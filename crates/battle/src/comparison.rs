//! Metric-by-metric comparison table shown next to a battle result.
//!
//! Purely explanatory: the row winners here never feed back into the overall
//! winner, which comes from the scalar battle score alone.

use crate::score::{
    FAVORITES_WEIGHT, MEMBERS_WEIGHT, POPULARITY_WEIGHT, RANK_WEIGHT, SCORED_BY_WEIGHT,
    SCORE_WEIGHT,
};
use anime_data::AnimeRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The six metrics compared, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    MalScore,
    PopularityRank,
    CommunitySize,
    UserFavorites,
    UsersScored,
    OverallRank,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::MalScore,
        Metric::PopularityRank,
        Metric::CommunitySize,
        Metric::UserFavorites,
        Metric::UsersScored,
        Metric::OverallRank,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::MalScore => "MAL Score",
            Metric::PopularityRank => "Popularity Rank",
            Metric::CommunitySize => "Community Size",
            Metric::UserFavorites => "User Favorites",
            Metric::UsersScored => "Users Scored",
            Metric::OverallRank => "Overall Rank",
        }
    }

    pub fn format(&self) -> MetricFormat {
        match self {
            Metric::MalScore => MetricFormat::Plain,
            Metric::PopularityRank | Metric::OverallRank => MetricFormat::OrdinalRank,
            Metric::CommunitySize | Metric::UserFavorites | Metric::UsersScored => {
                MetricFormat::Grouped
            }
        }
    }

    /// Display weight; mirrors the base-score weight of the same field
    pub fn weight(&self) -> f64 {
        match self {
            Metric::MalScore => SCORE_WEIGHT,
            Metric::PopularityRank => POPULARITY_WEIGHT,
            Metric::CommunitySize => MEMBERS_WEIGHT,
            Metric::UserFavorites => FAVORITES_WEIGHT,
            Metric::UsersScored => SCORED_BY_WEIGHT,
            Metric::OverallRank => RANK_WEIGHT,
        }
    }

    /// Smaller raw value wins
    pub fn is_inverse(&self) -> bool {
        matches!(self, Metric::PopularityRank | Metric::OverallRank)
    }

    /// Raw value with the same substitutions the scorer uses
    pub fn raw_value(&self, record: &AnimeRecord) -> f64 {
        match self {
            Metric::MalScore => record.score_or_zero(),
            Metric::PopularityRank => record.popularity_or_sentinel() as f64,
            Metric::CommunitySize => record.members as f64,
            Metric::UserFavorites => record.favorites as f64,
            Metric::UsersScored => record.scored_by as f64,
            Metric::OverallRank => record.rank_or_sentinel() as f64,
        }
    }
}

/// How a raw value should be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricFormat {
    /// Two decimals, e.g. `8.75`
    Plain,
    /// `#12`, or "Unranked" for the sentinel
    OrdinalRank,
    /// Thousands-grouped integer, e.g. `1,234,567`
    Grouped,
}

/// Winner of a single comparison row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricWinner {
    A,
    B,
    Tie,
}

/// One row of the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub metric: Metric,
    pub name: String,
    pub value_a: f64,
    pub value_b: f64,
    pub format: MetricFormat,
    pub weight: f64,
    pub inverse: bool,
    pub winner: MetricWinner,
}

impl Comparison {
    pub fn evaluate(metric: Metric, a: &AnimeRecord, b: &AnimeRecord) -> Self {
        let value_a = metric.raw_value(a);
        let value_b = metric.raw_value(b);
        Self {
            metric,
            name: metric.label().to_string(),
            value_a,
            value_b,
            format: metric.format(),
            weight: metric.weight(),
            inverse: metric.is_inverse(),
            winner: row_winner(value_a, value_b, metric.is_inverse()),
        }
    }
}

/// Build the full six-row table for `a` versus `b`.
pub fn compare_metrics(a: &AnimeRecord, b: &AnimeRecord) -> Vec<Comparison> {
    Metric::ALL
        .iter()
        .map(|&metric| Comparison::evaluate(metric, a, b))
        .collect()
}

fn row_winner(value_a: f64, value_b: f64, inverse: bool) -> MetricWinner {
    let ordering = value_a.total_cmp(&value_b);
    let ordering = if inverse { ordering.reverse() } else { ordering };
    match ordering {
        Ordering::Greater => MetricWinner::A,
        Ordering::Less => MetricWinner::B,
        Ordering::Equal => MetricWinner::Tie,
    }
}
