//! # Session Crate
//!
//! Local browsing state for anime discovery.
//!
//! ## Components
//!
//! ### Tracker
//! `SessionState` remembers which titles were already shown under the
//! current filters so a title is never suggested twice in one session. It
//! also records when the candidate pool ran dry. Changing filters resets it.
//!
//! ### Favorites
//! An ordered, id-unique list of saved titles.
//!
//! Both are plain serializable values with pure transitions; persisting them
//! is up to the caller.
//!
//! ## Example Usage
//!
//! ```ignore
//! use session::SessionState;
//!
//! let state = SessionState::new().record_shown(5114);
//! assert!(state.is_shown(5114));
//! let state = state.reset();
//! assert_eq!(state.shown_count(), 0);
//! ```

pub mod tracker;
pub mod favorites;

// Re-export commonly used types
pub use tracker::{is_shown, mark_exhausted, record_shown, reset, SessionState};
pub use favorites::Favorites;
