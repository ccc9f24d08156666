//! Orchestration between anime sources, the session tracker and the battle
//! engine.
//!
//! The core crates (`session`, `battle`) are pure and synchronous; this crate
//! owns the async side: fetching pages, resolving queries and threading
//! session state through.

pub mod error;
pub mod explore;
pub mod matchup;

pub use error::{DiscoveryError, Result};
pub use explore::{DiscoveryOrchestrator, DEFAULT_MAX_PAGES};
pub use matchup::BattleOrchestrator;
