//! Integration tests for loading a catalog dump and querying it.

use anime_data::{AnimeCatalog, AnimeSource, EpisodeBucket, FilterCriteria, MediaType};
use std::path::PathBuf;

const DUMP: &str = r#"{
    "data": [
        {"mal_id": 1, "title": "Cowboy Bebop", "type": "TV", "score": 8.75, "episodes": 26,
         "aired": {"from": "1998-04-03T00:00:00+00:00"},
         "genres": [{"mal_id": 1, "name": "Action"}, {"mal_id": 24, "name": "Sci-Fi"}]},
        {"mal_id": 5, "title": "Cowboy Bebop: Tengoku no Tobira", "type": "Movie", "score": 8.38,
         "episodes": 1, "genres": [{"mal_id": 1, "name": "Action"}]},
        {"mal_id": 6, "title": "Trigun", "type": "TV", "score": 8.22, "episodes": 26,
         "genres": [{"mal_id": 1, "name": "Action"}, {"mal_id": 2, "name": "Adventure"}]},
        {"mal_id": 7, "title": "Witch Hunter Robin", "type": "TV", "score": 7.25, "episodes": 26,
         "genres": [{"mal_id": 7, "name": "Mystery"}]}
    ]
}"#;

fn write_dump(tag: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "anime-data-{}-{}.json",
        tag,
        std::process::id()
    ));
    std::fs::write(&path, DUMP).unwrap();
    path
}

#[test]
fn test_load_and_filter() {
    let path = write_dump("filter");
    let catalog = AnimeCatalog::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(catalog.len(), 4);

    let criteria = FilterCriteria {
        genres: [1].into_iter().collect(),
        media_type: Some(MediaType::Tv),
        episode_bucket: Some(EpisodeBucket::Standard),
        ..FilterCriteria::default()
    };
    let titles: Vec<&str> = catalog
        .filter(&criteria)
        .iter()
        .map(|r| r.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Cowboy Bebop", "Trigun"]);
}

#[tokio::test]
async fn test_catalog_as_source() {
    let path = write_dump("source");
    let catalog = AnimeCatalog::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let hits = catalog.search_anime("cowboy bebop").await.unwrap();
    assert_eq!(hits[0].id, 1);
    assert_eq!(hits.len(), 2);

    let none = catalog.search_anime("gintama").await.unwrap();
    assert!(none.is_empty());

    let genres = catalog.genres().await.unwrap();
    assert_eq!(genres.len(), 4);
    assert_eq!(catalog.name(), "catalog");
}
