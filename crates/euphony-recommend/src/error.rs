//! Error types for recommendation and playlist fetching.

use thiserror::Error;

/// Errors raised while building or querying the recommender.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// The catalog could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(#[from] euphony_core::Error),

    /// Normalization or index search failed.
    #[error("search error: {0}")]
    Search(#[from] euphony_search::SearchError),
}

/// Convenience alias for recommender results.
pub type RecommendResult<T> = std::result::Result<T, RecommendError>;

/// Errors that can occur while fetching a seed playlist.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The playlist reference is not a recognizable playlist URL or URI.
    #[error("invalid playlist URL '{0}'; expected https://open.spotify.com/playlist/<id>")]
    InvalidPlaylistUrl(String),

    /// Client credentials are not configured.
    #[error("missing {source_name} credentials")]
    MissingCredentials { source_name: String },

    /// The service rejected the credentials.
    #[error("authentication with {source_name} failed: {message}")]
    Auth {
        source_name: String,
        message: String,
    },

    /// An HTTP request returned an error status.
    #[error("HTTP error from {source_name}: {message}")]
    Http {
        source_name: String,
        message: String,
    },

    /// The service returned a rate-limit response.
    #[error("rate limited by {source_name}")]
    RateLimited { source_name: String },

    /// The playlist does not exist or is not visible.
    #[error("playlist not found at {source_name}: {playlist_id}")]
    NotFound {
        playlist_id: String,
        source_name: String,
    },

    /// A response could not be parsed.
    #[error("parse error from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The fetch did not finish in time.
    #[error("playlist fetch timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

impl FetchError {
    /// Returns `true` when the error is transient and the fetch may
    /// succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { .. } | Self::RateLimited { .. } => true,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Convenience alias for fetch results.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Errors raised while reading a seed file.
#[derive(Debug, Error)]
pub enum SeedFileError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON seed file: {0}")]
    Json(#[from] serde_json::Error),
}
