//! Configuration resolution: built-in defaults, then an optional TOML file,
//! then command-line flags. A flag given on the command line always wins.

use anyhow::{bail, Context, Result};
use discovery::DEFAULT_MAX_PAGES;
use jikan_client::JikanConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name under the platform data dir
const APP_DIR: &str = "aniepick";

/// Keys accepted in the TOML config file. Every key is optional.
///
/// ```toml
/// base_url = "https://api.jikan.moe/v4"
/// timeout_secs = 20
/// min_interval_ms = 500
/// max_pages = 3
/// state_dir = "/home/me/.aniepick"
/// ```
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
    pub min_interval_ms: Option<u64>,
    pub page_limit: Option<u32>,
    pub sfw: Option<bool>,
    pub max_pages: Option<u32>,
    pub state_dir: Option<String>,
    pub catalog: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

/// Command-line values that can override the file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub state_dir: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jikan: JikanConfig,
    pub max_pages: u32,
    pub state_dir: PathBuf,
    /// When set, run offline against this catalog dump instead of the API
    pub catalog: Option<PathBuf>,
}

impl AppConfig {
    pub fn resolve(cli: &CliOverrides, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let defaults = JikanConfig::default();

        let page_limit = file.page_limit.unwrap_or(defaults.page_limit);
        if page_limit == 0 || page_limit > 25 {
            bail!("page_limit must be between 1 and 25, got {}", page_limit);
        }

        let base_url = file.base_url.unwrap_or(defaults.base_url);
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            bail!("base_url must be an http(s) URL, got {:?}", base_url);
        }

        let jikan = JikanConfig {
            base_url,
            user_agent: file.user_agent.unwrap_or(defaults.user_agent),
            timeout: file
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            min_interval: file
                .min_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.min_interval),
            page_limit,
            sfw: file.sfw.unwrap_or(defaults.sfw),
        };

        let state_dir = match cli.state_dir.clone().or(file.state_dir.map(PathBuf::from)) {
            Some(dir) => dir,
            None => default_state_dir()?,
        };

        Ok(Self {
            jikan,
            max_pages: file.max_pages.unwrap_or(DEFAULT_MAX_PAGES).max(1),
            state_dir,
            catalog: cli.catalog.clone().or(file.catalog.map(PathBuf::from)),
        })
    }
}

fn default_state_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .context("Could not determine a data directory; pass --state-dir")
}
