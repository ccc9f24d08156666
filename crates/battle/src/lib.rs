//! Battle scoring for anime titles.
//!
//! This crate provides:
//! - `score_record`: the weighted per-title battle score and its breakdown
//! - `score_battle`: a head-to-head result with a deterministic winner
//! - `compare_metrics`: the explanatory six-metric comparison table
//! - `leaderboard`: many titles ranked by battle score
//! - export helpers (JSON summary, file name, share text)
//!
//! Everything here is a pure function of its inputs. The evaluation instant
//! is always passed in, so the same records and `now` give bit-identical
//! results.
//!
//! ## Example Usage
//! ```ignore
//! use battle::{score_battle, Side};
//! use chrono::Utc;
//!
//! let result = score_battle(&frieren, &bocchi, Utc::now());
//! match result.winner {
//!     Side::A => println!("{} wins", result.side_a.record.title),
//!     Side::B => println!("{} wins", result.side_b.record.title),
//! }
//! ```

pub mod score;
pub mod comparison;
pub mod engine;
pub mod export;
pub mod leaderboard;

// Re-export main types
pub use score::{battle_score, score_record, ScoreBreakdown};
pub use comparison::{compare_metrics, Comparison, Metric, MetricFormat, MetricWinner};
pub use engine::{score_battle, BattleResult, Contender, Side};
pub use export::{export_file_name, format_metric, share_text, BattleExport, ExportSide};
pub use leaderboard::{leaderboard, RankedEntry};
