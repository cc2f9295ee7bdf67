use anyhow::Result;
use clap::Parser;
use euphony_recommend::Config;
use std::path::PathBuf;

mod commands;
mod tui;

#[derive(Debug, Parser)]
#[command(name = "euphony", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the track catalog CSV (default: ~/.local/share/euphony/tracks_features.csv)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Recommend songs similar to a set of seed songs
    ///
    /// Seeds can be given as arguments, read from a file, or fetched from a
    /// Spotify playlist; all three sources may be combined. Each seed is
    /// matched against catalog track names, first exactly and then by
    /// substring, ignoring case. A seed like "Yesterday - The Beatles" is
    /// matched on the part before " - ".
    ///
    /// For every matched seed, the nearest catalog tracks by audio features
    /// are collected. Tracks that are near several seeds rank first. At
    /// most ten tracks are returned.
    ///
    /// Output:
    /// - The seeds, marked with how each one matched
    /// - A table of recommendations with duration and a Spotify search link
    ///
    /// Playlist fetching needs Spotify credentials; see 'euphony config'.
    Recommend {
        /// Seed songs ("Title" or "Title - Artist")
        seeds: Vec<String>,

        /// Read seeds from a file (.json array, or one seed per line)
        #[arg(long)]
        seeds_file: Option<PathBuf>,

        /// Spotify playlist URL or URI to use as seeds
        #[arg(long)]
        playlist: Option<String>,

        /// Neighbors fetched per seed before merging (default: from config)
        #[arg(long)]
        per_seed: Option<usize>,

        /// Browse the results in an interactive view
        #[arg(long, conflicts_with = "json")]
        tui: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the songs closest to a single song
    Similar {
        /// Song title ("Title" or "Title - Artist")
        title: String,

        /// Number of neighbors to show
        #[arg(short, long, default_value_t = 10)]
        k: usize,
    },
    /// Show which catalog track a reference resolves to
    Resolve {
        /// Song title ("Title" or "Title - Artist")
        reference: String,
    },
    /// Show catalog, normalization, and index statistics
    Catalog,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print one value, or the whole config file when no key is given
    Get {
        /// Config key (e.g. tree_count)
        key: Option<String>,
    },
    /// Set a value in the config file
    Set {
        /// Config key (e.g. spotify_client_id)
        key: String,
        /// New value
        value: String,
    },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file if it does not exist
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { action } => run_config(action),
        command => {
            let config = match cli.catalog {
                Some(path) => Config::load_with_catalog_path(path)?,
                None => Config::load()?,
            };
            run_command(command, &config).await
        }
    }
}

fn run_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => commands::config::show_config(),
        ConfigAction::Get { key } => commands::config::get_config(key),
        ConfigAction::Set { key, value } => commands::config::set_config(&key, &value),
        ConfigAction::Path => commands::config::show_path(),
        ConfigAction::Example => commands::config::show_example(),
        ConfigAction::Init => commands::config::init_config(),
    }
}

async fn run_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Recommend {
            seeds,
            seeds_file,
            playlist,
            per_seed,
            tui,
            json,
        } => {
            let request = commands::RecommendRequest {
                seeds,
                seeds_file,
                playlist,
                per_seed,
                tui,
                json,
            };
            commands::run_recommend(config, request).await
        }
        Commands::Similar { title, k } => commands::show_similar(config, &title, k),
        Commands::Resolve { reference } => commands::show_resolution(config, &reference),
        Commands::Catalog => commands::show_catalog(config),
        Commands::Config { action } => run_config(action),
    }
}
