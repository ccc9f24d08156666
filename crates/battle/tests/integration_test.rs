//! Integration tests for battle scoring.
//!
//! These run realistic records (parsed from API-shaped JSON) through scoring,
//! comparison, export and the leaderboard together.

use anime_data::parser::parse_search_response;
use anime_data::AnimeRecord;
use battle::{
    compare_metrics, export_file_name, leaderboard, score_battle, BattleExport, MetricWinner,
    Side,
};
use chrono::{DateTime, TimeZone, Utc};

const PAGE: &str = r#"{"data": [
    {"mal_id": 52991, "title": "Sousou no Frieren", "title_english": "Frieren: Beyond Journey's End",
     "score": 9.3, "scored_by": 600000, "rank": 1, "popularity": 150, "members": 1100000,
     "favorites": 60000, "episodes": 28, "synopsis": "During their decade-long quest to defeat the Demon King, the members of the hero's party forged bonds.",
     "aired": {"from": "2023-09-29T00:00:00+00:00"},
     "genres": [{"mal_id": 2, "name": "Adventure"}, {"mal_id": 8, "name": "Drama"}, {"mal_id": 10, "name": "Fantasy"}],
     "studios": [{"mal_id": 11, "name": "Madhouse"}]},
    {"mal_id": 1, "title": "Cowboy Bebop", "score": 8.75, "scored_by": 1000000, "rank": 45,
     "popularity": 43, "members": 1900000, "favorites": 85000, "episodes": 26,
     "aired": {"from": "1998-04-03T00:00:00+00:00"},
     "genres": [{"mal_id": 1, "name": "Action"}, {"mal_id": 24, "name": "Sci-Fi"}],
     "studios": [{"mal_id": 14, "name": "Sunrise"}]},
    {"mal_id": 99999, "title": "Unaired Pilot"}
]}"#;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
}

fn records() -> Vec<AnimeRecord> {
    parse_search_response(PAGE).unwrap()
}

#[test]
fn test_parsed_records_battle() {
    let records = records();
    let frieren = &records[0];
    let bebop = &records[1];

    let result = score_battle(frieren, bebop, now());
    let reverse = score_battle(bebop, frieren, now());

    // Whoever wins, swapping the inputs must swap the side
    assert_eq!(result.winner.other(), reverse.winner);
    assert_eq!(result.winning().record.id, reverse.winning().record.id);

    // Frieren is recent, Bebop is not
    assert_eq!(result.side_a.breakdown.recency_term, 1.0);
    assert_eq!(result.side_b.breakdown.recency_term, 0.0);
}

#[test]
fn test_comparison_is_independent_of_winner() {
    let records = records();
    let frieren = &records[0];
    let bebop = &records[1];

    let result = score_battle(frieren, bebop, now());
    let table = compare_metrics(frieren, bebop);
    assert_eq!(result.comparisons, table);

    // Bebop has more members, Frieren the better rank, regardless of outcome
    assert_eq!(table[2].winner, MetricWinner::B);
    assert_eq!(table[5].winner, MetricWinner::A);
}

#[test]
fn test_sparse_record_loses_and_exports() {
    let records = records();
    let pilot = &records[2];
    let bebop = &records[1];

    let result = score_battle(pilot, bebop, now());
    assert_eq!(result.winner, Side::B);
    assert!(result.side_a.battle_score().is_finite());

    let export = BattleExport::from_result(&result);
    assert_eq!(export.winner, "Cowboy Bebop");
    assert_eq!(
        export_file_name(&export),
        "anime-battle-unaired-pilot-vs-cowboy-bebop.json"
    );
}

#[test]
fn test_leaderboard_places_sparse_record_last() {
    let board = leaderboard(&records(), now());
    assert_eq!(board.len(), 3);
    assert_eq!(board.last().unwrap().record.id, 99999);
    assert!(board[0].breakdown.total >= board[1].breakdown.total);
}
