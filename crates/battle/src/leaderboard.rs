//! Rank any number of titles by battle score.
//!
//! Scoring is independent per record, so it runs in parallel with Rayon.

use crate::score::{score_record, ScoreBreakdown};
use anime_data::AnimeRecord;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// 1-based position
    pub position: usize,
    pub record: AnimeRecord,
    pub breakdown: ScoreBreakdown,
}

/// Score every record at `now` and order them by total, highest first.
/// Equal totals keep their input order, so the earlier record places higher,
/// consistent with the side-A tie-break of a battle.
pub fn leaderboard(records: &[AnimeRecord], now: DateTime<Utc>) -> Vec<RankedEntry> {
    let mut scored: Vec<(AnimeRecord, ScoreBreakdown)> = records
        .par_iter()
        .map(|record| (record.clone(), score_record(record, now)))
        .collect();

    // Stable sort keeps input order for ties
    scored.sort_by(|a, b| b.1.total.total_cmp(&a.1.total));

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (record, breakdown))| RankedEntry {
            position: i + 1,
            record,
            breakdown,
        })
        .collect()
}
