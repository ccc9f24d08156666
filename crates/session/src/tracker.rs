//! Shown-title tracking for one browsing session.
//!
//! `SessionState` is a plain value. Every transition consumes the old state
//! and returns the new one, so the orchestrator owns the only copy and there
//! is no hidden shared mutation. None of these operations can fail.

use anime_data::{AnimeId, FilterCriteria};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything the tracker remembers between two resets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionState {
    shown: BTreeSet<AnimeId>,
    shown_count: usize,
    exhausted: bool,
    filters: FilterCriteria,
}

impl SessionState {
    /// An empty session using the default filters
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty session using `filters`
    pub fn with_criteria(filters: FilterCriteria) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    /// Add `id` to the shown set. Idempotent: the count only moves the first
    /// time an id is seen. Ids are stored as given, negative ones included.
    #[must_use]
    pub fn record_shown(mut self, id: AnimeId) -> Self {
        if self.shown.insert(id) {
            self.shown_count += 1;
        }
        self
    }

    pub fn is_shown(&self, id: AnimeId) -> bool {
        self.shown.contains(&id)
    }

    /// Forget every shown id and clear the exhausted flag, keeping the
    /// current filters.
    #[must_use]
    pub fn reset(self) -> Self {
        Self::with_criteria(self.filters)
    }

    /// Reset and adopt new filters in one step.
    #[must_use]
    pub fn reset_with_filters(self, filters: FilterCriteria) -> Self {
        Self::with_criteria(filters)
    }

    /// Switch to `filters`. A change of criteria always resets the session so
    /// exclusions from one query never leak into another; unchanged criteria
    /// leave the state untouched.
    #[must_use]
    pub fn with_filters(self, filters: FilterCriteria) -> Self {
        if self.filters == filters {
            self
        } else {
            self.reset_with_filters(filters)
        }
    }

    /// Flag that the current filters have no unseen candidates left.
    #[must_use]
    pub fn mark_exhausted(mut self) -> Self {
        self.exhausted = true;
        self
    }

    pub fn shown_count(&self) -> usize {
        self.shown_count
    }

    pub fn shown_ids(&self) -> impl Iterator<Item = AnimeId> + '_ {
        self.shown.iter().copied()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }
}

// Free-function forms of the transitions, for callers that prefer
// `record_shown(state, id)` over method chaining.

pub fn record_shown(state: SessionState, id: AnimeId) -> SessionState {
    state.record_shown(id)
}

pub fn is_shown(state: &SessionState, id: AnimeId) -> bool {
    state.is_shown(id)
}

pub fn reset(state: SessionState) -> SessionState {
    state.reset()
}

pub fn mark_exhausted(state: SessionState) -> SessionState {
    state.mark_exhausted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anime_data::{MediaType, SortDirection};

    #[test]
    fn test_new_session_is_empty() {
        let state = SessionState::new();
        assert_eq!(state.shown_count(), 0);
        assert!(!state.is_exhausted());
        assert_eq!(state.shown_ids().count(), 0);
        assert_eq!(state.filters(), &FilterCriteria::default());
    }

    #[test]
    fn test_record_shown_is_idempotent() {
        let once = SessionState::new().record_shown(5114);
        let twice = SessionState::new().record_shown(5114).record_shown(5114);

        assert_eq!(once.shown_count(), 1);
        assert_eq!(twice.shown_count(), once.shown_count());
        assert_eq!(once, twice);
        assert!(twice.is_shown(5114));
        assert!(!twice.is_shown(1));
    }

    #[test]
    fn test_counts_distinct_ids() {
        let state = [1, 2, 2, 3, 1]
            .into_iter()
            .fold(SessionState::new(), record_shown);
        assert_eq!(state.shown_count(), 3);
        assert_eq!(state.shown_ids().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_negative_ids_are_stored_as_given() {
        let state = SessionState::new().record_shown(-7);
        assert!(is_shown(&state, -7));
        assert_eq!(state.shown_count(), 1);
    }

    #[test]
    fn test_reset_clears_everything_but_filters() {
        let filters = FilterCriteria {
            media_type: Some(MediaType::Movie),
            ..FilterCriteria::default()
        };
        let state = SessionState::with_criteria(filters.clone())
            .record_shown(1)
            .record_shown(2)
            .mark_exhausted();

        let state = reset(state);
        assert_eq!(state.shown_count(), 0);
        assert_eq!(state.shown_ids().count(), 0);
        assert!(!state.is_exhausted());
        assert_eq!(state.filters(), &filters);
    }

    #[test]
    fn test_reset_on_empty_state() {
        let state = SessionState::new().reset();
        assert_eq!(state, SessionState::new());
    }

    #[test]
    fn test_changing_filters_resets() {
        let state = SessionState::new().record_shown(1).mark_exhausted();
        let changed = FilterCriteria {
            sort: SortDirection::Asc,
            ..FilterCriteria::default()
        };

        let state = state.with_filters(changed.clone());
        assert_eq!(state.shown_count(), 0);
        assert!(!state.is_exhausted());
        assert_eq!(state.filters(), &changed);
    }

    #[test]
    fn test_same_filters_keep_history() {
        let state = SessionState::new()
            .record_shown(1)
            .with_filters(FilterCriteria::default());
        assert_eq!(state.shown_count(), 1);
        assert!(state.is_shown(1));
    }

    #[test]
    fn test_mark_exhausted() {
        let state = mark_exhausted(SessionState::new().record_shown(3));
        assert!(state.is_exhausted());
        assert_eq!(state.shown_count(), 1);
    }

    #[test]
    fn test_state_survives_json() {
        let state = SessionState::new().record_shown(10).record_shown(20);
        let json = serde_json::to_string(&state).unwrap();
        let restored: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
