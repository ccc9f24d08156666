//! # Discovery Orchestrator
//!
//! Serves "show me something new" requests:
//! 1. Page through the source with the session's filters
//! 2. Re-check each record against the full criteria
//! 3. Drop titles already shown this session
//! 4. Pick at random among what is left
//! 5. Record the pick (or exhaustion) in a new session state
//!
//! The session state goes in and comes out by value; nothing is cached here
//! between calls.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use anime_data::{AnimeRecord, AnimeSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use session::SessionState;
use tracing::{debug, info};

use crate::error::Result;

/// Pages fetched before giving up on finding something unseen
pub const DEFAULT_MAX_PAGES: u32 = 5;

pub struct DiscoveryOrchestrator<S: AnimeSource + ?Sized> {
    source: Arc<S>,
    max_pages: u32,
    rng: StdRng,
}

impl<S: AnimeSource + ?Sized> DiscoveryOrchestrator<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            max_pages: DEFAULT_MAX_PAGES,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Fix the random stream, for reproducible picks.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Pick one title not yet shown in this session.
    ///
    /// Returns the updated state and the pick. When nothing unseen remains
    /// within `max_pages`, the state comes back marked exhausted with `None`.
    pub async fn next_anime(
        &mut self,
        state: SessionState,
    ) -> Result<(SessionState, Option<AnimeRecord>)> {
        let (state, mut picks) = self.next_batch(state, 1).await?;
        Ok((state, picks.pop()))
    }

    /// Pick up to `count` distinct unseen titles.
    ///
    /// Fewer than `count` comes back when the filters run dry; the session is
    /// only marked exhausted when not a single unseen title was found.
    pub async fn next_batch(
        &mut self,
        state: SessionState,
        count: usize,
    ) -> Result<(SessionState, Vec<AnimeRecord>)> {
        let start_time = Instant::now();
        let mut candidates = self.collect_unseen(&state, count.max(1)).await?;

        if candidates.is_empty() {
            info!(
                "No unseen titles left after {} shown; session exhausted",
                state.shown_count()
            );
            return Ok((state.mark_exhausted(), Vec::new()));
        }

        // Partial Fisher-Yates: the first `take` slots end up a uniform sample
        let take = count.min(candidates.len());
        for i in 0..take {
            let j = self.rng.random_range(i..candidates.len());
            candidates.swap(i, j);
        }
        candidates.truncate(take);

        let state = candidates
            .iter()
            .fold(state, |state, record| state.record_shown(record.id));

        info!(
            "Picked {} title(s) from {} in {:.2?} ({} shown this session)",
            candidates.len(),
            self.source.name(),
            start_time.elapsed(),
            state.shown_count()
        );
        Ok((state, candidates))
    }

    /// Walk pages until `wanted` unseen candidates are in hand or the source
    /// runs out.
    async fn collect_unseen(
        &self,
        state: &SessionState,
        wanted: usize,
    ) -> Result<Vec<AnimeRecord>> {
        let criteria = state.filters();
        let mut candidates: Vec<AnimeRecord> = Vec::new();
        // Sources may repeat a title across pages
        let mut seen = HashSet::new();

        for page in 1..=self.max_pages {
            let result = self.source.discover(criteria, page).await?;
            if result.records.is_empty() {
                debug!("Page {} is empty; stopping", page);
                break;
            }

            let fetched = result.records.len();
            for record in result.records {
                if criteria.matches(&record)
                    && !state.is_shown(record.id)
                    && seen.insert(record.id)
                {
                    candidates.push(record);
                }
            }
            debug!(
                "Page {}: {} fetched, {} unseen so far",
                page,
                fetched,
                candidates.len()
            );

            if candidates.len() >= wanted || !result.has_next_page {
                break;
            }
        }

        Ok(candidates)
    }
}
