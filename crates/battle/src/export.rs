//! Shareable renderings of a `BattleResult`: the downloadable JSON summary,
//! its file name, the plain-text share message, and metric formatting.

use crate::comparison::MetricFormat;
use crate::engine::{BattleResult, Contender};
use anime_data::UNRANKED_SENTINEL;
use serde::{Deserialize, Serialize};

pub const GENERATED_BY: &str = "AniePick Battle Mode";

/// Per-side block of the exported summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSide {
    pub title: String,
    pub score: f64,
    /// Rounded to two decimals
    pub battle_score: String,
    pub rank: u32,
    pub members: u64,
    pub episodes: Option<u32>,
}

impl ExportSide {
    fn from_contender(contender: &Contender) -> Self {
        let record = &contender.record;
        Self {
            title: record.title.clone(),
            score: record.score_or_zero(),
            battle_score: format!("{:.2}", contender.battle_score()),
            rank: record.rank_or_sentinel(),
            members: record.members,
            episodes: record.episodes,
        }
    }
}

/// The downloadable battle summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleExport {
    pub battle_title: String,
    /// Title of the winning side
    pub winner: String,
    pub anime1: ExportSide,
    pub anime2: ExportSide,
    /// `YYYY-MM-DD` of the scoring instant
    pub battle_date: String,
    pub generated_by: String,
}

impl BattleExport {
    pub fn from_result(result: &BattleResult) -> Self {
        Self {
            battle_title: result.title(),
            winner: result.winning().record.title.clone(),
            anime1: ExportSide::from_contender(&result.side_a),
            anime2: ExportSide::from_contender(&result.side_b),
            battle_date: result.computed_at.format("%Y-%m-%d").to_string(),
            generated_by: GENERATED_BY.to_string(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `anime-battle-<slug>.json`, where every character of the battle title
/// that is not an ASCII letter or digit becomes `-`.
pub fn export_file_name(export: &BattleExport) -> String {
    let slug: String = export
        .battle_title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    format!("anime-battle-{}.json", slug)
}

/// Plain-text summary for pasting into chats.
pub fn share_text(result: &BattleResult) -> String {
    let a = &result.side_a;
    let b = &result.side_b;
    format!(
        "🥊 Anime Battle Results 🥊\n\n\
         {} vs {}\n\n\
         🏆 Winner: {}\n\n\
         Battle Scores:\n\
         📊 {}: {:.2}\n\
         📊 {}: {:.2}\n\n\
         ⚔️ Powered by {}",
        a.record.title,
        b.record.title,
        result.winning().record.title,
        a.record.title,
        a.battle_score(),
        b.record.title,
        b.battle_score(),
        GENERATED_BY,
    )
}

/// Render a raw metric value for display.
pub fn format_metric(value: f64, format: MetricFormat) -> String {
    match format {
        MetricFormat::Plain => {
            if value == 0.0 {
                "N/A".to_string()
            } else {
                format!("{:.2}", value)
            }
        }
        MetricFormat::OrdinalRank => {
            if value >= UNRANKED_SENTINEL as f64 {
                "Unranked".to_string()
            } else {
                format!("#{}", value as u64)
            }
        }
        MetricFormat::Grouped => group_thousands(value.max(0.0).round() as u64),
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::score_battle;
    use anime_data::AnimeRecord;
    use chrono::{TimeZone, Utc};

    fn result() -> BattleResult {
        let mut a = AnimeRecord::new(1, "Steins;Gate");
        a.score = Some(9.07);
        a.rank = Some(3);
        a.members = 2_600_000;
        a.episodes = Some(24);
        let b = AnimeRecord::new(2, "Blank Slate");
        score_battle(&a, &b, Utc.with_ymd_and_hms(2025, 3, 9, 18, 30, 0).unwrap())
    }

    #[test]
    fn test_export_shape() {
        let export = BattleExport::from_result(&result());
        assert_eq!(export.battle_title, "Steins;Gate vs Blank Slate");
        assert_eq!(export.winner, "Steins;Gate");
        assert_eq!(export.battle_date, "2025-03-09");
        assert_eq!(export.anime2.rank, 999_999);
        assert_eq!(export.anime2.score, 0.0);
        assert_eq!(export.anime2.episodes, None);

        let json: serde_json::Value =
            serde_json::from_str(&export.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["battleTitle"], "Steins;Gate vs Blank Slate");
        assert_eq!(json["anime1"]["members"], 2_600_000);
        assert_eq!(json["generatedBy"], GENERATED_BY);
        assert!(json["anime1"]["battleScore"].as_str().unwrap().contains('.'));
    }

    #[test]
    fn test_battle_score_has_two_decimals() {
        let export = BattleExport::from_result(&result());
        let decimals = export.anime1.battle_score.split('.').nth(1).unwrap();
        assert_eq!(decimals.len(), 2);
    }

    #[test]
    fn test_export_file_name() {
        let export = BattleExport::from_result(&result());
        assert_eq!(
            export_file_name(&export),
            "anime-battle-steins-gate-vs-blank-slate.json"
        );
    }

    #[test]
    fn test_share_text_mentions_both_sides() {
        let text = share_text(&result());
        assert!(text.contains("Steins;Gate vs Blank Slate"));
        assert!(text.contains("Winner: Steins;Gate"));
        assert!(text.contains("📊 Blank Slate: 0.50"));
    }

    #[test]
    fn test_format_metric() {
        assert_eq!(format_metric(8.5, MetricFormat::Plain), "8.50");
        assert_eq!(format_metric(0.0, MetricFormat::Plain), "N/A");
        assert_eq!(format_metric(12.0, MetricFormat::OrdinalRank), "#12");
        assert_eq!(format_metric(999_999.0, MetricFormat::OrdinalRank), "Unranked");
        assert_eq!(format_metric(1_234_567.0, MetricFormat::Grouped), "1,234,567");
        assert_eq!(format_metric(999.0, MetricFormat::Grouped), "999");
        assert_eq!(format_metric(1000.0, MetricFormat::Grouped), "1,000");
        assert_eq!(format_metric(0.0, MetricFormat::Grouped), "0");
    }
}
