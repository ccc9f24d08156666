//! The user's favorites list.
//!
//! Stores full record snapshots so the list can be shown without refetching.
//! Same value-in/value-out style as the tracker.

use anime_data::{AnimeId, AnimeRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Favorites {
    entries: Vec<AnimeRecord>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` unless a record with the same id is already present.
    #[must_use]
    pub fn add(mut self, record: AnimeRecord) -> Self {
        if !self.contains(record.id) {
            self.entries.push(record);
        }
        self
    }

    #[must_use]
    pub fn remove(mut self, id: AnimeId) -> Self {
        self.entries.retain(|r| r.id != id);
        self
    }

    /// Remove the record if present, add it otherwise.
    #[must_use]
    pub fn toggle(self, record: AnimeRecord) -> Self {
        if self.contains(record.id) {
            self.remove(record.id)
        } else {
            self.add(record)
        }
    }

    #[must_use]
    pub fn clear(self) -> Self {
        Self::new()
    }

    pub fn contains(&self, id: AnimeId) -> bool {
        self.entries.iter().any(|r| r.id == id)
    }

    pub fn get(&self, id: AnimeId) -> Option<&AnimeRecord> {
        self.entries.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order they were added
    pub fn iter(&self) -> impl Iterator<Item = &AnimeRecord> {
        self.entries.iter()
    }
}
