//! Spotify Web API playlist source.
//!
//! Authenticates with the client-credentials flow, then pages through
//! `/v1/playlists/{id}/tracks` following each page's `next` link.

use std::time::Duration;

use async_trait::async_trait;
use euphony_core::model::SeedSong;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use crate::config::Config;
use crate::error::{FetchError, FetchResult};
use crate::playlist::resilience::RateLimiter;
use crate::playlist::PlaylistSource;

const SOURCE_NAME: &str = "Spotify";
const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";
const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Tracks requested per page (the API maximum).
const PAGE_LIMIT: &str = "100";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// One page of a playlist's tracks.
#[derive(Debug, Deserialize)]
struct TracksPage {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    /// Null for removed or unavailable tracks.
    track: Option<SpotifyTrack>,
}

#[derive(Debug, Deserialize)]
struct SpotifyTrack {
    #[serde(default)]
    name: String,
    #[serde(default)]
    artists: Vec<SpotifyArtist>,
    duration_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtist {
    name: String,
}

impl From<SpotifyTrack> for SeedSong {
    fn from(track: SpotifyTrack) -> Self {
        let artist = track
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            title: Some(track.name),
            artist: (!artist.is_empty()).then_some(artist),
            duration_ms: track.duration_ms,
        }
    }
}

fn page_songs(page: TracksPage) -> Vec<SeedSong> {
    page.items
        .into_iter()
        .filter_map(|item| item.track)
        .map(SeedSong::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Spotify Web API client.
///
/// Wraps a [`reqwest::Client`] with a user-agent and a 30-second timeout.
/// Requests are paced by a [`RateLimiter`].
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    client_id: String,
    client_secret: String,
    api_base: String,
    token_url: String,
    rate_limiter: RateLimiter,
}

impl SpotifyClient {
    /// Create a client from application credentials.
    ///
    /// # Errors
    /// Returns [`FetchError::MissingCredentials`] when either credential is
    /// blank, or an error if the HTTP client cannot be built.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> FetchResult<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        if client_id.trim().is_empty() || client_secret.trim().is_empty() {
            return Err(FetchError::MissingCredentials {
                source_name: SOURCE_NAME.to_string(),
            });
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("euphony/0.1.0 (https://github.com/oxur/euphony)")
            .build()?;

        Ok(Self {
            http,
            client_id,
            client_secret,
            api_base: SPOTIFY_API_BASE.to_string(),
            token_url: SPOTIFY_TOKEN_URL.to_string(),
            rate_limiter: RateLimiter::new(5),
        })
    }

    /// Create a client from the configured credentials.
    ///
    /// # Errors
    /// Returns [`FetchError::MissingCredentials`] when the configuration
    /// lacks either credential.
    pub fn from_config(config: &Config) -> FetchResult<Self> {
        match (&config.spotify_client_id, &config.spotify_client_secret) {
            (Some(id), Some(secret)) => Self::new(id.as_str(), secret.as_str()),
            _ => Err(FetchError::MissingCredentials {
                source_name: SOURCE_NAME.to_string(),
            }),
        }
    }

    /// Point the client at other endpoints, such as a local test server.
    #[must_use]
    pub fn with_endpoints(
        mut self,
        api_base: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        self.api_base = api_base.into();
        self.token_url = token_url.into();
        self
    }

    async fn access_token(&self) -> FetchResult<String> {
        self.rate_limiter.acquire().await;

        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if matches!(
            response.status(),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED
        ) {
            return Err(FetchError::Auth {
                source_name: SOURCE_NAME.to_string(),
                message: format!("token request rejected ({})", response.status()),
            });
        }
        let response = check_status(response, "")?;

        let token: TokenResponse = response.json().await.map_err(|e| FetchError::Parse {
            source_name: SOURCE_NAME.to_string(),
            message: e.to_string(),
        })?;
        Ok(token.access_token)
    }

    async fn tracks_page(
        &self,
        url: &str,
        token: &str,
        playlist_id: &str,
    ) -> FetchResult<TracksPage> {
        self.rate_limiter.acquire().await;

        let response = self.http.get(url).bearer_auth(token).send().await?;
        let response = check_status(response, playlist_id)?;

        response.json().await.map_err(|e| FetchError::Parse {
            source_name: SOURCE_NAME.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl PlaylistSource for SpotifyClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch(&self, playlist_id: &str) -> FetchResult<Vec<SeedSong>> {
        let token = self.access_token().await?;

        let mut songs = Vec::new();
        let first = reqwest::Url::parse_with_params(
            &format!("{}/playlists/{}/tracks", self.api_base, playlist_id),
            &[("limit", PAGE_LIMIT)],
        )
        .map_err(|e| FetchError::InvalidPlaylistUrl(e.to_string()))?;
        let mut next = Some(first.to_string());

        while let Some(url) = next {
            let page = self.tracks_page(&url, &token, playlist_id).await?;
            next = page.next.clone();
            songs.extend(page_songs(page));
        }

        log::info!(
            "Fetched {} tracks from {} playlist {}",
            songs.len(),
            SOURCE_NAME,
            playlist_id
        );
        Ok(songs)
    }
}

/// Map an error status to the matching [`FetchError`].
fn check_status(response: Response, playlist_id: &str) -> FetchResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(match status {
        StatusCode::NOT_FOUND => FetchError::NotFound {
            playlist_id: playlist_id.to_string(),
            source_name: SOURCE_NAME.to_string(),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FetchError::Auth {
            source_name: SOURCE_NAME.to_string(),
            message: status.to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited {
            source_name: SOURCE_NAME.to_string(),
        },
        _ => FetchError::Http {
            source_name: SOURCE_NAME.to_string(),
            message: status.to_string(),
        },
    })
}
