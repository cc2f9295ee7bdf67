//! Recommendation service for euphony.
//!
//! Resolves seed songs against the catalog, queries the index for each,
//! and merges the neighbor lists by frequency. Also fetches seed
//! playlists from Spotify and loads configuration.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod merge;
pub mod playlist;
pub mod recommender;
pub mod resolve;
pub mod seeds;

pub use config::Config;
pub use error::{FetchError, FetchResult, RecommendError, RecommendResult, SeedFileError};
pub use merge::{merge, MAX_RECOMMENDATIONS};
pub use playlist::{fetch_playlist, parse_playlist_id, search_link, PlaylistSource, SpotifyClient};
pub use recommender::{
    Outcome, RecommendReport, Recommender, SimilarTracks, DEFAULT_PER_SEED_K,
};
pub use resolve::{MatchKind, Resolution, SongResolver};
pub use seeds::read_seed_file;
