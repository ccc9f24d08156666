//! Session and favorites persisted as JSON between runs.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use session::{Favorites, SessionState};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const SESSION_FILE: &str = "session.json";
const FAVORITES_FILE: &str = "favorites.json";

pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The saved session, or a fresh one if nothing has been saved yet.
    pub fn load_session(&self) -> Result<SessionState> {
        self.load(SESSION_FILE)
    }

    pub fn save_session(&self, state: &SessionState) -> Result<()> {
        self.save(SESSION_FILE, state)
    }

    pub fn load_favorites(&self) -> Result<Favorites> {
        self.load(FAVORITES_FILE)
    }

    pub fn save_favorites(&self, favorites: &Favorites) -> Result<()> {
        self.save(FAVORITES_FILE, favorites)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        if !path.exists() {
            debug!("{} not found; starting empty", path.display());
            return Ok(T::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        match serde_json::from_str(&content) {
            Ok(value) => Ok(value),
            Err(e) => {
                // A corrupt state file should not lock the user out
                warn!("Ignoring unreadable {}: {}", path.display(), e);
                Ok(T::default())
            }
        }
    }

    /// Write through a temp file and rename, so a crash never leaves half a file.
    fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create state directory {:?}", self.dir))?;
        let path = self.dir.join(name);
        let tmp = self.dir.join(format!("{}.tmp", name));

        let json = serde_json::to_string_pretty(value).context("Failed to serialize state")?;
        std::fs::write(&tmp, json).with_context(|| format!("Failed to write {:?}", tmp))?;
        std::fs::rename(&tmp, &path).with_context(|| format!("Failed to replace {:?}", path))?;
        debug!("Saved {}", path.display());
        Ok(())
    }
}
