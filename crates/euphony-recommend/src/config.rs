use anyhow::{Context, Result};
use confyg::{env, Confygery};
use euphony_search::{IndexParams, Metric};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for euphony.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (EUPH_* prefix)
/// 3. Config file (~/.config/euphony/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the track catalog CSV.
    ///
    /// Can be set via:
    /// - CLI: --catalog /path/to/tracks.csv
    /// - ENV: EUPH_CATALOG_PATH
    /// - Config: catalog_path = "/path/to/tracks.csv"
    /// - Default: ~/.local/share/euphony/tracks_features.csv
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Distance metric for the index ("euclidean" or "manhattan").
    #[serde(default)]
    pub metric: Metric,

    /// Number of trees in the index forest.
    #[serde(default = "default_tree_count")]
    pub tree_count: usize,

    /// Largest number of tracks per index leaf.
    #[serde(default = "default_leaf_size")]
    pub leaf_size: usize,

    /// Seed for index construction. Same seed, same catalog, same answers.
    #[serde(default = "default_index_seed")]
    pub index_seed: u64,

    /// Neighbors fetched per seed song before merging.
    #[serde(default = "default_per_seed_k")]
    pub per_seed_k: usize,

    /// Spotify client ID (required for playlist fetching).
    ///
    /// Can be set via:
    /// - ENV: EUPH_SPOTIFY_CLIENT_ID
    /// - Config: spotify_client_id = "..."
    #[serde(default)]
    pub spotify_client_id: Option<String>,

    /// Spotify client secret (required for playlist fetching).
    ///
    /// Can be set via:
    /// - ENV: EUPH_SPOTIFY_CLIENT_SECRET
    /// - Config: spotify_client_secret = "..."
    #[serde(default)]
    pub spotify_client_secret: Option<String>,

    /// Upper bound on a whole playlist fetch, retries included.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            metric: Metric::default(),
            tree_count: default_tree_count(),
            leaf_size: default_leaf_size(),
            index_seed: default_index_seed(),
            per_seed_k: default_per_seed_k(),
            spotify_client_id: None,
            spotify_client_secret: None,
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/euphony/config.toml
    /// Reads environment variables with EUPH_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("euph");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration with a custom catalog path.
    ///
    /// This is used when the --catalog CLI flag is provided.
    pub fn load_with_catalog_path(catalog_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.catalog_path = catalog_path;
        Ok(config)
    }

    /// Index build parameters derived from this configuration.
    #[must_use]
    pub fn index_params(&self) -> IndexParams {
        IndexParams {
            metric: self.metric,
            tree_count: self.tree_count,
            leaf_size: self.leaf_size,
            seed: self.index_seed,
            search_k: None,
        }
    }

    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn default_catalog_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("euphony")
        .join("tracks_features.csv")
}

const fn default_tree_count() -> usize {
    10
}

const fn default_leaf_size() -> usize {
    16
}

const fn default_index_seed() -> u64 {
    42
}

const fn default_per_seed_k() -> usize {
    20
}

const fn default_fetch_timeout_secs() -> u64 {
    30
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/euphony/config.toml
/// - macOS: ~/Library/Application Support/euphony/config.toml
/// - Windows: %APPDATA%\euphony\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("euphony")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Euphony Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (EUPH_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Path to the track catalog (CSV with name, artists, and audio feature columns)
#
# Can also be set via:
# - CLI: euphony --catalog /custom/tracks.csv recommend ...
# - Environment: EUPH_CATALOG_PATH=/custom/tracks.csv
#
# Default: Platform-specific data directory
#catalog_path = "/path/to/tracks_features.csv"

# Index construction. The same seed over the same catalog always yields
# the same recommendations.
#metric = "euclidean"
#tree_count = 10
#leaf_size = 16
#index_seed = 42

# Neighbors fetched per seed song before merging
#per_seed_k = 20

# Spotify credentials for fetching playlists
#
# Create an app at: https://developer.spotify.com/dashboard
#
# Can also be set via:
# - Environment: EUPH_SPOTIFY_CLIENT_ID / EUPH_SPOTIFY_CLIENT_SECRET
spotify_client_id = "your-client-id-here"
spotify_client_secret = "your-client-secret-here"

# Upper bound in seconds on a playlist fetch, retries included
#fetch_timeout_secs = 30
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
