//! In-memory anime catalog.
//!
//! Loaded from a saved search dump, indexed by id and genre, and usable as
//! an `AnimeSource` wherever the live API would be.

use crate::criteria::FilterCriteria;
use crate::error::{AnimeDataError, Result, SourceError};
use crate::parser::{self, SearchPage};
use crate::source::AnimeSource;
use crate::types::*;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::info;

/// Results per page returned by `discover`, matching the API's page size
pub const CATALOG_PAGE_SIZE: usize = 25;

#[derive(Debug, Default)]
pub struct AnimeCatalog {
    records: HashMap<AnimeId, AnimeRecord>,
    /// Insertion order, so iteration is deterministic
    order: Vec<AnimeId>,
    genre_index: HashMap<GenreId, Vec<AnimeId>>,
    genre_names: BTreeMap<GenreId, String>,
}

impl AnimeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON file (a saved search page or a bare array).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AnimeDataError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let json = std::fs::read_to_string(path)?;
        let records = parser::parse_catalog(&json)?;

        let mut catalog = Self::new();
        for record in records {
            catalog.insert(record);
        }
        info!(
            "Loaded catalog from {}: {} titles, {} genres",
            path.display(),
            catalog.len(),
            catalog.genre_names.len()
        );
        Ok(catalog)
    }

    /// Insert a record, replacing any existing record with the same id.
    pub fn insert(&mut self, record: AnimeRecord) {
        let id = record.id;
        if let Some(previous) = self.records.remove(&id) {
            for genre in &previous.genres {
                if let Some(ids) = self.genre_index.get_mut(&genre.id) {
                    ids.retain(|&other| other != id);
                }
            }
        } else {
            self.order.push(id);
        }

        for genre in &record.genres {
            self.genre_index.entry(genre.id).or_default().push(id);
            self.genre_names
                .entry(genre.id)
                .or_insert_with(|| genre.name.clone());
        }
        self.records.insert(id, record);
    }

    pub fn get(&self, id: AnimeId) -> Option<&AnimeRecord> {
        self.records.get(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &AnimeRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    pub fn ids_by_genre(&self, genre: GenreId) -> &[AnimeId] {
        self.genre_index
            .get(&genre)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn genre_list(&self) -> Vec<GenreTag> {
        self.genre_names
            .iter()
            .map(|(&id, name)| GenreTag::new(id, name.clone()))
            .collect()
    }

    /// Case-insensitive substring search over both titles.
    ///
    /// Exact title matches come first, then higher scores.
    pub fn search(&self, query: &str) -> Vec<&AnimeRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<(u8, &AnimeRecord)> = self
            .iter()
            .filter_map(|record| {
                let titles = std::iter::once(record.title.as_str())
                    .chain(record.title_english.as_deref());
                let mut best = None;
                for title in titles {
                    let lower = title.to_lowercase();
                    if lower == needle {
                        best = Some(0);
                        break;
                    } else if lower.contains(&needle) {
                        best = Some(1);
                    }
                }
                best.map(|relevance| (relevance, record))
            })
            .collect();

        matches.sort_by(|a, b| {
            a.0.cmp(&b.0).then_with(|| {
                b.1.score_or_zero()
                    .partial_cmp(&a.1.score_or_zero())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        });
        matches.into_iter().map(|(_, record)| record).collect()
    }

    /// All records satisfying `criteria`, in the criteria's sort order.
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&AnimeRecord> {
        // Narrow by the first genre through the index before the full check
        let mut matching: Vec<&AnimeRecord> = match criteria.genres.iter().next() {
            Some(&genre) => self
                .ids_by_genre(genre)
                .iter()
                .filter_map(|id| self.records.get(id))
                .filter(|r| criteria.matches(r))
                .collect(),
            None => self.iter().filter(|r| criteria.matches(r)).collect(),
        };
        matching.sort_by(|a, b| criteria.compare(a, b));
        matching
    }
}

#[async_trait]
impl AnimeSource for AnimeCatalog {
    fn name(&self) -> &str {
        "catalog"
    }

    async fn search_anime(&self, query: &str) -> std::result::Result<Vec<AnimeRecord>, SourceError> {
        Ok(self.search(query).into_iter().cloned().collect())
    }

    async fn discover(
        &self,
        criteria: &FilterCriteria,
        page: u32,
    ) -> std::result::Result<SearchPage, SourceError> {
        let matching = self.filter(criteria);
        let start = (page.max(1) as usize - 1) * CATALOG_PAGE_SIZE;
        let records: Vec<AnimeRecord> = matching
            .iter()
            .skip(start)
            .take(CATALOG_PAGE_SIZE)
            .map(|r| (*r).clone())
            .collect();
        Ok(SearchPage {
            has_next_page: start + CATALOG_PAGE_SIZE < matching.len(),
            records,
        })
    }

    async fn genres(&self) -> std::result::Result<Vec<GenreTag>, SourceError> {
        Ok(self.genre_list())
    }
}
