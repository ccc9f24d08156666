mod config;
mod state;

use anime_data::{
    AiringStatus, AnimeCatalog, AnimeId, AnimeRecord, AnimeSource, ContentRating, EpisodeBucket,
    FilterCriteria, GenreId, MediaType, Season, SortDirection, SortField, SourceMaterial,
    UNRANKED_SENTINEL,
};
use anyhow::{bail, Context, Result};
use battle::{
    export_file_name, format_metric, share_text, BattleExport, BattleResult, MetricWinner,
    RankedEntry, Side,
};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use config::{AppConfig, CliOverrides, FileConfig};
use discovery::{BattleOrchestrator, DiscoveryOrchestrator};
use jikan_client::JikanClient;
use state::StateStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// AniePick - discover anime you haven't seen and pit titles against each other
#[derive(Parser)]
#[command(name = "aniepick")]
#[command(about = "Anime discovery and battle mode backed by the Jikan API", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Work offline from a saved search dump instead of the live API
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Where session state and favorites are kept
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show titles not yet seen this session
    Discover {
        #[command(flatten)]
        filters: FilterArgs,

        /// How many titles to show
        #[arg(long, default_value = "1")]
        count: usize,

        /// Seed the random pick for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Forget which titles have been shown
    Reset {
        /// Also go back to the default filters
        #[arg(long)]
        clear_filters: bool,
    },

    /// Show the current session's filters and progress
    Status,

    /// Search titles by name
    Search {
        query: String,

        /// Maximum results to print
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Show one title by id
    Show { id: AnimeId },

    /// List genre ids usable with `discover --genre`
    Genres,

    /// Score two titles head to head
    Battle {
        first: String,
        second: String,

        /// Write a JSON summary of the battle into this directory
        #[arg(long)]
        export: Option<PathBuf>,

        /// Print a short shareable summary
        #[arg(long)]
        share: bool,
    },

    /// Rank several titles by battle score
    Leaderboard {
        #[arg(required = true, num_args = 2..)]
        queries: Vec<String>,
    },

    /// Manage saved favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List saved favorites
    List,
    /// Save the best search hit for a query
    Add { query: String },
    /// Remove a favorite by id
    Remove { id: AnimeId },
    /// Remove every favorite
    Clear,
}

/// Filter flags for `discover`. Omitting all of them keeps the session's
/// current filters; passing any replaces them (and resets the session if they
/// differ).
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Genre id; repeat to require several (see `genres`)
    #[arg(long = "genre")]
    genres: Vec<GenreId>,

    /// tv, movie, ova, special, ona or music
    #[arg(long = "type")]
    media_type: Option<MediaType>,

    /// Minimum MAL score (0 disables)
    #[arg(long)]
    min_score: Option<f64>,

    /// airing, complete or upcoming
    #[arg(long)]
    status: Option<AiringStatus>,

    /// winter, spring, summer or fall
    #[arg(long)]
    season: Option<Season>,

    #[arg(long)]
    start_year: Option<i32>,

    #[arg(long)]
    end_year: Option<i32>,

    /// short (1-12), standard (13-26), long (27-100) or epic (101+)
    #[arg(long)]
    episodes: Option<EpisodeBucket>,

    /// g, pg, pg13, r17, r or rx
    #[arg(long)]
    rating: Option<ContentRating>,

    /// Source material, e.g. manga or light_novel
    #[arg(long)]
    source: Option<SourceMaterial>,

    #[arg(long)]
    order_by: Option<SortField>,

    /// asc or desc
    #[arg(long)]
    sort: Option<SortDirection>,
}

impl FilterArgs {
    fn is_empty(&self) -> bool {
        self.genres.is_empty()
            && self.media_type.is_none()
            && self.min_score.is_none()
            && self.status.is_none()
            && self.season.is_none()
            && self.start_year.is_none()
            && self.end_year.is_none()
            && self.episodes.is_none()
            && self.rating.is_none()
            && self.source.is_none()
            && self.order_by.is_none()
            && self.sort.is_none()
    }

    /// `None` when no filter flag was given.
    fn into_criteria(self) -> Result<Option<FilterCriteria>> {
        if self.is_empty() {
            return Ok(None);
        }
        if let (Some(start), Some(end)) = (self.start_year, self.end_year) {
            if start > end {
                bail!("--start-year {} is after --end-year {}", start, end);
            }
        }
        if let Some(min) = self.min_score {
            if !(0.0..=10.0).contains(&min) {
                bail!("--min-score must be between 0 and 10, got {}", min);
            }
        }

        let defaults = FilterCriteria::default();
        Ok(Some(FilterCriteria {
            genres: self.genres.into_iter().collect(),
            media_type: self.media_type,
            min_score: self.min_score.unwrap_or(defaults.min_score),
            status: self.status,
            season: self.season,
            start_year: self.start_year,
            end_year: self.end_year,
            episode_bucket: self.episodes,
            rating: self.rating,
            source: self.source,
            order_by: self.order_by.unwrap_or(defaults.order_by),
            sort: self.sort.unwrap_or(defaults.sort),
        }))
    }
}

/// Where anime metadata comes from for this run
enum Backend {
    Live(Arc<JikanClient>),
    Offline(Arc<AnimeCatalog>),
}

impl Backend {
    fn open(config: &AppConfig) -> Result<Self> {
        match &config.catalog {
            Some(path) => {
                let start = Instant::now();
                let catalog = AnimeCatalog::load_from_file(path)
                    .with_context(|| format!("Failed to load catalog {:?}", path))?;
                println!(
                    "{} Loaded {} titles in {:?}",
                    "✓".green(),
                    catalog.len(),
                    start.elapsed()
                );
                Ok(Backend::Offline(Arc::new(catalog)))
            }
            None => {
                let client = JikanClient::new(config.jikan.clone())
                    .context("Failed to create Jikan client")?;
                Ok(Backend::Live(Arc::new(client)))
            }
        }
    }

    fn source(&self) -> Arc<dyn AnimeSource> {
        match self {
            Backend::Live(client) => client.clone(),
            Backend::Offline(catalog) => catalog.clone(),
        }
    }

    async fn lookup(&self, id: AnimeId) -> Result<AnimeRecord> {
        match self {
            Backend::Live(client) => Ok(client.anime_by_id(id).await?),
            Backend::Offline(catalog) => catalog
                .get(id)
                .cloned()
                .with_context(|| format!("Anime {} is not in the catalog", id)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let file_config = cli.config.as_deref().map(FileConfig::load).transpose()?;
    let overrides = CliOverrides {
        state_dir: cli.state_dir.clone(),
        catalog: cli.catalog.clone(),
    };
    let config = AppConfig::resolve(&overrides, file_config)?;
    let store = StateStore::new(&config.state_dir);

    // Commands that never touch a source
    match cli.command {
        Commands::Reset { clear_filters } => return handle_reset(&store, clear_filters),
        Commands::Status => return handle_status(&store),
        Commands::Favorites {
            action: FavoritesAction::List,
        } => return handle_favorites_list(&store),
        Commands::Favorites {
            action: FavoritesAction::Remove { id },
        } => return handle_favorites_remove(&store, id),
        Commands::Favorites {
            action: FavoritesAction::Clear,
        } => return handle_favorites_clear(&store),
        _ => {}
    }

    let backend = Backend::open(&config)?;

    match cli.command {
        Commands::Discover {
            filters,
            count,
            seed,
        } => handle_discover(&backend, &store, &config, filters, count, seed).await?,
        Commands::Search { query, limit } => handle_search(&backend, &query, limit).await?,
        Commands::Show { id } => handle_show(&backend, id).await?,
        Commands::Genres => handle_genres(&backend).await?,
        Commands::Battle {
            first,
            second,
            export,
            share,
        } => handle_battle(&backend, &first, &second, export.as_deref(), share).await?,
        Commands::Leaderboard { queries } => handle_leaderboard(&backend, &queries).await?,
        Commands::Favorites {
            action: FavoritesAction::Add { query },
        } => handle_favorites_add(&backend, &store, &query).await?,
        Commands::Reset { .. } | Commands::Status | Commands::Favorites { .. } => {}
    }

    Ok(())
}

/// Handle the 'discover' command
async fn handle_discover(
    backend: &Backend,
    store: &StateStore,
    config: &AppConfig,
    filters: FilterArgs,
    count: usize,
    seed: Option<u64>,
) -> Result<()> {
    if count == 0 {
        bail!("--count must be at least 1");
    }

    let mut state = store.load_session()?;
    if let Some(criteria) = filters.into_criteria()? {
        let before = state.shown_count();
        state = state.with_filters(criteria);
        if before > 0 && state.shown_count() == 0 {
            println!("{}", "Filters changed; starting a new session.".yellow());
        }
    }

    let mut orchestrator =
        DiscoveryOrchestrator::new(backend.source()).with_max_pages(config.max_pages);
    if let Some(seed) = seed {
        orchestrator = orchestrator.with_seed(seed);
    }

    let (state, picks) = orchestrator
        .next_batch(state, count)
        .await
        .context("Discovery failed")?;
    store.save_session(&state)?;

    if picks.is_empty() {
        println!(
            "{} Nothing new matches these filters ({} shown this session). Run `aniepick reset` to start over.",
            "✗".red(),
            state.shown_count()
        );
        return Ok(());
    }

    for (i, record) in picks.iter().enumerate() {
        print_record(i + 1, record);
    }
    println!(
        "{}",
        format!("{} shown this session", state.shown_count()).dimmed()
    );
    Ok(())
}

/// Handle the 'reset' command
fn handle_reset(store: &StateStore, clear_filters: bool) -> Result<()> {
    let state = store.load_session()?;
    let shown = state.shown_count();
    let state = if clear_filters {
        state.reset_with_filters(FilterCriteria::default())
    } else {
        state.reset()
    };
    store.save_session(&state)?;
    println!("{} Session reset ({} titles forgotten)", "✓".green(), shown);
    Ok(())
}

/// Handle the 'status' command
fn handle_status(store: &StateStore) -> Result<()> {
    let state = store.load_session()?;
    let filters = state.filters();

    println!("{}", "Session".bold().blue());
    println!("{}Shown: {}", "• ".green(), state.shown_count());
    println!(
        "{}Exhausted: {}",
        "• ".green(),
        if state.is_exhausted() { "yes" } else { "no" }
    );
    println!("{}", "Filters".bold().blue());
    println!("{}{:?}", "• ".cyan(), filters);
    println!("{}State dir: {}", "• ".cyan(), store.dir().display());
    Ok(())
}

/// Handle the 'search' command
async fn handle_search(backend: &Backend, query: &str, limit: usize) -> Result<()> {
    let results = backend
        .source()
        .search_anime(query)
        .await
        .context("Search failed")?;

    println!("{}", format!("Search results for '{}':", query).bold().blue());
    if results.is_empty() {
        println!("  (no matches)");
    }
    for (i, record) in results.iter().take(limit).enumerate() {
        println!(
            "{}. [{}] {} - score {} - {}",
            (i + 1).to_string().green(),
            record.id,
            record.title,
            format_metric(record.score_or_zero(), battle::MetricFormat::Plain),
            record
                .media_type
                .map(|t| t.to_string())
                .unwrap_or_else(|| "?".to_string())
        );
    }
    Ok(())
}

/// Handle the 'show' command
async fn handle_show(backend: &Backend, id: AnimeId) -> Result<()> {
    let record = backend.lookup(id).await?;
    print_record(1, &record);
    if let Some(synopsis) = &record.synopsis {
        println!("\n{}", synopsis);
    }
    Ok(())
}

/// Handle the 'genres' command
async fn handle_genres(backend: &Backend) -> Result<()> {
    let genres = backend
        .source()
        .genres()
        .await
        .context("Failed to fetch genres")?;
    println!("{}", "Genres:".bold().blue());
    for genre in genres {
        println!("  {:>4}  {}", genre.id.to_string().green(), genre.name);
    }
    Ok(())
}

/// Handle the 'battle' command
async fn handle_battle(
    backend: &Backend,
    first: &str,
    second: &str,
    export_dir: Option<&Path>,
    share: bool,
) -> Result<()> {
    let orchestrator = BattleOrchestrator::new(backend.source());
    let now = chrono::Utc::now();
    let result = orchestrator
        .battle(first, second, now)
        .await
        .context("Battle failed")?;

    print_battle(&result);

    if let Some(dir) = export_dir {
        let export = BattleExport::from_result(&result);
        let path = dir.join(export_file_name(&export));
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export directory {:?}", dir))?;
        std::fs::write(&path, export.to_json_pretty()?)
            .with_context(|| format!("Failed to write {:?}", path))?;
        println!("{} Exported to {}", "✓".green(), path.display());
    }

    if share {
        println!("\n{}", share_text(&result));
    }
    Ok(())
}

/// Handle the 'leaderboard' command
async fn handle_leaderboard(backend: &Backend, queries: &[String]) -> Result<()> {
    let orchestrator = BattleOrchestrator::new(backend.source());
    let board = orchestrator
        .leaderboard(queries, chrono::Utc::now())
        .await
        .context("Leaderboard failed")?;
    print_leaderboard(&board);
    Ok(())
}

fn handle_favorites_list(store: &StateStore) -> Result<()> {
    let favorites = store.load_favorites()?;
    if favorites.is_empty() {
        println!("No favorites yet. Add one with `aniepick favorites add <title>`.");
        return Ok(());
    }
    println!("{}", format!("Favorites ({})", favorites.len()).bold().blue());
    for (i, record) in favorites.iter().enumerate() {
        print_record(i + 1, record);
    }
    Ok(())
}

async fn handle_favorites_add(backend: &Backend, store: &StateStore, query: &str) -> Result<()> {
    let record = BattleOrchestrator::new(backend.source())
        .find_contender(query)
        .await?;
    let favorites = store.load_favorites()?;
    if favorites.contains(record.id) {
        println!("{} is already a favorite", record.title);
        return Ok(());
    }
    let title = record.title.clone();
    store.save_favorites(&favorites.add(record))?;
    println!("{} Added {}", "✓".green(), title);
    Ok(())
}

fn handle_favorites_remove(store: &StateStore, id: AnimeId) -> Result<()> {
    let favorites = store.load_favorites()?;
    let Some(title) = favorites.get(id).map(|r| r.title.clone()) else {
        bail!("Anime {} is not in favorites", id);
    };
    store.save_favorites(&favorites.remove(id))?;
    println!("{} Removed {}", "✓".green(), title);
    Ok(())
}

fn handle_favorites_clear(store: &StateStore) -> Result<()> {
    let favorites = store.load_favorites()?;
    let count = favorites.len();
    store.save_favorites(&favorites.clear())?;
    println!("{} Cleared {} favorites", "✓".green(), count);
    Ok(())
}

/// One title as a compact block
fn print_record(position: usize, record: &AnimeRecord) {
    let year = record
        .air_start_year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "?".to_string());
    println!(
        "{}. {} ({}) [{}]",
        position.to_string().green(),
        record.title.bold(),
        year,
        record.id
    );
    if let Some(alt) = record.alternate_title() {
        println!("   {}", alt.dimmed());
    }
    let rank = match record.rank_or_sentinel() {
        UNRANKED_SENTINEL => "unranked".to_string(),
        rank => format!("#{}", rank),
    };
    println!(
        "   {} | {} eps | score {} | {}",
        record
            .media_type
            .map(|t| t.to_string())
            .unwrap_or_else(|| "?".to_string()),
        record
            .episodes
            .map(|e| e.to_string())
            .unwrap_or_else(|| "?".to_string()),
        format_metric(record.score_or_zero(), battle::MetricFormat::Plain),
        rank
    );
    let genres = record.genre_names();
    if !genres.is_empty() {
        println!("   {}", genres.join(", ").cyan());
    }
}

/// Comparison table, scores and winner
fn print_battle(result: &BattleResult) {
    let a = &result.side_a;
    let b = &result.side_b;

    println!("{}", result.title().bold().blue());
    println!(
        "{:<18} {:>16} {:>16}",
        "", truncate(&a.record.title, 16), truncate(&b.record.title, 16)
    );
    for row in &result.comparisons {
        let value_a = format_metric(row.value_a, row.format);
        let value_b = format_metric(row.value_b, row.format);
        let (value_a, value_b) = match row.winner {
            MetricWinner::A => (value_a.green().bold(), value_b.normal()),
            MetricWinner::B => (value_a.normal(), value_b.green().bold()),
            MetricWinner::Tie => (value_a.normal(), value_b.normal()),
        };
        println!("{:<18} {:>16} {:>16}", row.name, value_a, value_b);
    }
    println!(
        "{:<18} {:>16.3} {:>16.3}",
        "Battle score",
        a.battle_score(),
        b.battle_score()
    );

    let winner = result.winning();
    let label = match result.winner {
        Side::A => "left",
        Side::B => "right",
    };
    println!(
        "\n🏆 {} wins ({} side, margin {:.3})",
        winner.record.title.bold().green(),
        label,
        result.margin()
    );
}

fn print_leaderboard(board: &[RankedEntry]) {
    println!("{}", "Leaderboard".bold().blue());
    for entry in board {
        println!(
            "{}. {} - {:.3} (base {:.3}, quality {:.3})",
            entry.position.to_string().green(),
            entry.record.title,
            entry.breakdown.total,
            entry.breakdown.base,
            entry.breakdown.quality
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('…');
        out
    }
}
