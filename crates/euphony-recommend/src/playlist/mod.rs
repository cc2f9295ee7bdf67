//! Seed playlists from external services.
//!
//! A [`PlaylistSource`] turns a playlist ID into seed songs. Callers go
//! through [`fetch_playlist`], which parses the playlist reference,
//! retries transient failures with exponential backoff, and bounds the
//! whole exchange with a timeout.

pub mod resilience;
pub mod spotify;

use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use euphony_core::model::SeedSong;
use reqwest::Url;

use crate::error::{FetchError, FetchResult};

pub use spotify::SpotifyClient;

/// Attempts after the first before a transient failure is returned.
const MAX_RETRIES: usize = 3;

const SPOTIFY_SEARCH_BASE: &str = "https://open.spotify.com/search/";

/// A service that can list the songs of a playlist.
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Human-readable service name used in errors and logs.
    fn name(&self) -> &str;

    /// Fetch every song of the playlist with the given ID, in playlist
    /// order. An empty playlist is `Ok(vec![])`.
    async fn fetch(&self, playlist_id: &str) -> FetchResult<Vec<SeedSong>>;
}

/// Fetch a playlist by URL or URI.
///
/// Transient errors (see [`FetchError::is_transient`]) are retried with
/// exponential backoff. The whole call, retries included, must finish
/// within `timeout`.
///
/// # Errors
/// Returns [`FetchError::InvalidPlaylistUrl`] for an unrecognized
/// reference, [`FetchError::Timeout`] when time runs out, or the last
/// error from the source.
pub async fn fetch_playlist<S>(
    source: &S,
    playlist: &str,
    timeout: Duration,
) -> FetchResult<Vec<SeedSong>>
where
    S: PlaylistSource + ?Sized,
{
    let playlist_id = parse_playlist_id(playlist)?;
    log::info!("Fetching playlist {} from {}", playlist_id, source.name());

    let attempt = || source.fetch(&playlist_id);
    let retrying = attempt
        .retry(
            ExponentialBuilder::default()
                .with_min_delay(Duration::from_millis(200))
                .with_max_times(MAX_RETRIES),
        )
        .when(FetchError::is_transient)
        .notify(|err: &FetchError, delay: Duration| {
            log::warn!(
                "Playlist fetch from {} failed ({}), retrying in {:?}",
                source.name(),
                err,
                delay
            );
        });

    match tokio::time::timeout(timeout, retrying).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout {
            seconds: timeout.as_secs(),
        }),
    }
}

/// Extract the playlist ID from a playlist URL or URI.
///
/// Accepts `https://open.spotify.com/playlist/<id>` (optionally with a
/// locale segment and query string) and `spotify:playlist:<id>`.
///
/// # Errors
/// Returns [`FetchError::InvalidPlaylistUrl`] for anything else.
pub fn parse_playlist_id(playlist: &str) -> FetchResult<String> {
    let trimmed = playlist.trim();
    let invalid = || FetchError::InvalidPlaylistUrl(trimmed.to_string());

    let id = if let Some(id) = trimmed.strip_prefix("spotify:playlist:") {
        id.to_string()
    } else {
        let url = Url::parse(trimmed).map_err(|_| invalid())?;
        if url.host_str() != Some("open.spotify.com") {
            return Err(invalid());
        }
        let mut segments = url.path_segments().ok_or_else(invalid)?;
        segments
            .by_ref()
            .find(|segment| *segment == "playlist")
            .ok_or_else(invalid)?;
        segments.next().ok_or_else(invalid)?.to_string()
    };

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid());
    }
    Ok(id)
}

/// A Spotify search link for a song title.
#[must_use]
pub fn search_link(title: &str) -> String {
    Url::parse(SPOTIFY_SEARCH_BASE)
        .ok()
        .and_then(|mut url| {
            url.path_segments_mut().ok()?.pop_if_empty().push(title);
            Some(url.to_string())
        })
        .unwrap_or_else(|| SPOTIFY_SEARCH_BASE.to_string())
}
