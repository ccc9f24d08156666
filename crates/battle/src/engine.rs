//! Head-to-head battle between two titles.

use crate::comparison::{compare_metrics, Comparison};
use crate::score::{score_record, ScoreBreakdown};
use anime_data::AnimeRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which of the two inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(&self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// One side of a battle: the record as given plus how it scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contender {
    pub record: AnimeRecord,
    pub breakdown: ScoreBreakdown,
}

impl Contender {
    pub fn battle_score(&self) -> f64 {
        self.breakdown.total
    }
}

/// Outcome of `score_battle`. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleResult {
    pub side_a: Contender,
    pub side_b: Contender,
    pub winner: Side,
    pub comparisons: Vec<Comparison>,
    /// The `now` the battle was scored at
    pub computed_at: DateTime<Utc>,
}

impl BattleResult {
    pub fn contender(&self, side: Side) -> &Contender {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    pub fn winning(&self) -> &Contender {
        self.contender(self.winner)
    }

    pub fn losing(&self) -> &Contender {
        self.contender(self.winner.other())
    }

    /// Winner's total minus loser's total (0 on a tie)
    pub fn margin(&self) -> f64 {
        self.winning().battle_score() - self.losing().battle_score()
    }

    /// "A vs B"
    pub fn title(&self) -> String {
        format!("{} vs {}", self.side_a.record.title, self.side_b.record.title)
    }
}

/// Score `a` against `b` at instant `now`.
///
/// The strictly higher total wins. Equal totals go to side A, always; the
/// tie-break is fixed so results are reproducible.
pub fn score_battle(a: &AnimeRecord, b: &AnimeRecord, now: DateTime<Utc>) -> BattleResult {
    let breakdown_a = score_record(a, now);
    let breakdown_b = score_record(b, now);

    let winner = if breakdown_b.total > breakdown_a.total {
        Side::B
    } else {
        Side::A
    };

    BattleResult {
        side_a: Contender {
            record: a.clone(),
            breakdown: breakdown_a,
        },
        side_b: Contender {
            record: b.clone(),
            breakdown: breakdown_b,
        },
        winner,
        comparisons: compare_metrics(a, b),
        computed_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anime_data::GenreTag;
    use chrono::{Datelike, Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn populated() -> AnimeRecord {
        let mut r = AnimeRecord::new(5114, "Fullmetal Alchemist: Brotherhood");
        r.score = Some(9.0);
        r.rank = Some(5);
        r.popularity = Some(3);
        r.members = 2_000_000;
        r.favorites = 150_000;
        r.scored_by = 1_800_000;
        r.episodes = Some(24);
        r.genres = ["Action", "Adventure", "Drama", "Fantasy", "Military"]
            .iter()
            .enumerate()
            .map(|(i, name)| GenreTag::new(i as u32 + 1, *name))
            .collect();
        r.studios = vec!["Bones".to_string(), "Aniplex".to_string()];
        r.aired_from = Some((now() - Duration::days(365)).date_naive());
        r
    }

    #[test]
    fn test_populated_beats_blank() {
        let blank = AnimeRecord::new(1, "Blank");
        let result = score_battle(&populated(), &blank, now());

        assert_eq!(result.winner, Side::A);
        assert!(result.side_a.battle_score() > result.side_b.battle_score());
        assert_eq!(result.side_a.breakdown.recency_term, 1.0);
        assert!(result.margin() > 0.0);
        assert_eq!(result.winning().record.id, 5114);
        assert_eq!(result.losing().record.id, 1);
    }

    #[test]
    fn test_blank_vs_blank_is_finite_and_non_negative() {
        let result = score_battle(&AnimeRecord::new(1, "X"), &AnimeRecord::new(2, "Y"), now());
        for side in [&result.side_a, &result.side_b] {
            assert!(side.battle_score().is_finite());
            assert!(side.battle_score() >= 0.0);
        }
    }

    #[test]
    fn test_deterministic() {
        let a = populated();
        let b = AnimeRecord::new(1, "Blank");
        let first = score_battle(&a, &b, now());
        let second = score_battle(&a, &b, now());
        assert_eq!(first, second);
        assert_eq!(
            first.side_a.battle_score().to_bits(),
            second.side_a.battle_score().to_bits()
        );
    }

    #[test]
    fn test_swapping_mirrors_winner() {
        let a = populated();
        let b = AnimeRecord::new(1, "Blank");
        let forward = score_battle(&a, &b, now());
        let backward = score_battle(&b, &a, now());

        assert_ne!(forward.side_a.battle_score(), forward.side_b.battle_score());
        assert_eq!(forward.winner, Side::A);
        assert_eq!(backward.winner, Side::B);
        assert_eq!(forward.winning().record.id, backward.winning().record.id);
    }

    #[test]
    fn test_tie_goes_to_side_a() {
        let a = populated();
        let mut b = populated();
        b.id = 9999;
        b.title = "Identical Twin".to_string();

        for _ in 0..3 {
            let result = score_battle(&a, &b, now());
            assert_eq!(result.winner, Side::A);
            assert_eq!(result.margin(), 0.0);
        }
    }

    #[test]
    fn test_result_records_now_and_title() {
        let result = score_battle(&populated(), &AnimeRecord::new(1, "Blank"), now());
        assert_eq!(result.computed_at, now());
        assert_eq!(result.computed_at.year(), 2025);
        assert_eq!(result.title(), "Fullmetal Alchemist: Brotherhood vs Blank");
        assert_eq!(result.comparisons.len(), 6);
    }

    #[test]
    fn test_side_other() {
        assert_eq!(Side::A.other(), Side::B);
        assert_eq!(Side::B.other(), Side::A);
    }
}
