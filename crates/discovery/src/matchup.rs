//! Battle Orchestrator
//!
//! Resolves free-text queries to records through the source, then hands them
//! to the pure scoring engine. Both contenders are fetched concurrently.

use std::sync::Arc;
use std::time::Instant;

use anime_data::{AnimeRecord, AnimeSource};
use battle::{leaderboard, score_battle, BattleResult, RankedEntry};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{DiscoveryError, Result};

pub struct BattleOrchestrator<S: AnimeSource + ?Sized> {
    source: Arc<S>,
}

impl<S: AnimeSource + ?Sized> BattleOrchestrator<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// The best search hit for `query`.
    pub async fn find_contender(&self, query: &str) -> Result<AnimeRecord> {
        let mut hits = self.source.search_anime(query).await?;
        debug!("{:?} matched {} title(s)", query, hits.len());
        if hits.is_empty() {
            warn!("No contender found for {:?}", query);
            return Err(DiscoveryError::NoResults(query.to_string()));
        }
        Ok(hits.swap_remove(0))
    }

    /// Look both titles up in parallel and score them against each other.
    pub async fn battle(
        &self,
        query_a: &str,
        query_b: &str,
        now: DateTime<Utc>,
    ) -> Result<BattleResult> {
        let start_time = Instant::now();

        let (a, b) = tokio::join!(self.find_contender(query_a), self.find_contender(query_b));
        let (a, b) = (a?, b?);

        let result = score_battle(&a, &b, now);
        info!(
            "{}: {} wins by {:.3} (in {:.2?})",
            result.title(),
            result.winning().record.title,
            result.margin(),
            start_time.elapsed()
        );
        Ok(result)
    }

    /// Resolve each query in order and rank the hits.
    ///
    /// Queries resolve one after another so the source's pacing is respected.
    /// A query with no hit fails the whole board.
    pub async fn leaderboard(
        &self,
        queries: &[String],
        now: DateTime<Utc>,
    ) -> Result<Vec<RankedEntry>> {
        let mut records = Vec::with_capacity(queries.len());
        for query in queries {
            let record = self.find_contender(query).await?;
            if records.iter().any(|r: &AnimeRecord| r.id == record.id) {
                debug!("{:?} resolved to an already listed title; skipping", query);
                continue;
            }
            records.push(record);
        }
        Ok(leaderboard(&records, now))
    }
}
