//! Spotify Web API client
//!
//! Implements every collaborator trait in [`crate::types`] against the
//! Spotify Web API using a caller-supplied bearer token. Requests are spaced
//! by a minimum interval; there is no retry policy.

use crate::types::{
    parse_release_year, ArtistLookup, ArtistProfile, ArtistRef, CatalogSearch, CreatedPlaylist,
    NewPlaylist, PlaylistDetails, PlaylistReader, PlaylistWriter, RecommendationSeeds, Recommender,
    ServiceError, TimeRange, TrackRecord, UserHistory, UserLibrary,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use songlens_common::config::SpotifyConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const SPOTIFY_BASE_URL: &str = "https://api.spotify.com/v1";
const USER_AGENT: &str = "songlens/0.1.0";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MIN_INTERVAL_MS: u64 = 100;
const DEFAULT_MARKET: &str = "US";

// ============================================================================
// Wire types (Spotify JSON, private to this client)
// ============================================================================

#[derive(Debug, Deserialize)]
struct Paging<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: Paging<WireTrack>,
}

#[derive(Debug, Deserialize)]
struct TopTracksResponse {
    #[serde(default)]
    tracks: Vec<WireTrack>,
}

#[derive(Debug, Deserialize)]
struct SavedTrackItem {
    track: WireTrack,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireArtistRef {
    id: Option<String>,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct WireAlbum {
    #[serde(default)]
    name: String,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireTrack {
    id: Option<String>,
    name: String,
    #[serde(default)]
    artists: Vec<WireArtistRef>,
    #[serde(default)]
    album: WireAlbum,
    #[serde(default)]
    popularity: u32,
    #[serde(default)]
    explicit: bool,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    external_urls: ExternalUrls,
}

#[derive(Debug, Default, Deserialize)]
struct Followers {
    total: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct WireArtist {
    id: String,
    name: String,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    popularity: u32,
    #[serde(default)]
    followers: Followers,
    #[serde(default)]
    external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
}

#[derive(Debug, Deserialize)]
struct WirePlaylist {
    id: String,
    name: String,
    #[serde(default)]
    external_urls: ExternalUrls,
}

#[derive(Debug, Default, Deserialize)]
struct WireOwner {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    // null for removed or unavailable items
    track: Option<WireTrack>,
}

#[derive(Debug, Default, Deserialize)]
struct PlaylistItems {
    #[serde(default)]
    total: u32,
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
struct WirePlaylistDetails {
    id: String,
    name: String,
    description: Option<String>,
    #[serde(default)]
    owner: WireOwner,
    #[serde(default)]
    followers: Followers,
    #[serde(default)]
    external_urls: ExternalUrls,
    #[serde(default)]
    tracks: PlaylistItems,
}

#[derive(Debug, Deserialize)]
struct RecommendationsResponse {
    #[serde(default)]
    tracks: Vec<WireTrack>,
}

#[derive(Debug, Serialize)]
struct AddItemsBody<'a> {
    uris: &'a [String],
}

impl From<WireTrack> for TrackRecord {
    fn from(track: WireTrack) -> Self {
        // Local files carry no catalog id; their URI is still unique
        let id = track.id.unwrap_or_else(|| track.uri.clone());
        let release_year = track
            .album
            .release_date
            .as_deref()
            .and_then(parse_release_year);

        TrackRecord {
            id,
            name: track.name,
            artists: track
                .artists
                .into_iter()
                .map(|a| ArtistRef {
                    id: a.id,
                    name: a.name,
                })
                .collect(),
            album: track.album.name,
            popularity: track.popularity,
            explicit: track.explicit,
            release_year,
            uri: track.uri,
            external_url: track.external_urls.spotify,
        }
    }
}

impl From<WireArtist> for ArtistProfile {
    fn from(artist: WireArtist) -> Self {
        ArtistProfile {
            id: artist.id,
            name: artist.name,
            genres: artist.genres,
            popularity: artist.popularity,
            followers: artist.followers.total.unwrap_or(0),
            external_url: artist.external_urls.spotify,
        }
    }
}

impl From<WirePlaylistDetails> for PlaylistDetails {
    fn from(playlist: WirePlaylistDetails) -> Self {
        PlaylistDetails {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description,
            owner: playlist.owner.display_name,
            total_tracks: playlist.tracks.total,
            followers: playlist.followers.total.unwrap_or(0),
            external_url: playlist.external_urls.spotify,
            tracks: playlist
                .tracks
                .items
                .into_iter()
                .filter_map(|item| item.track)
                .map(TrackRecord::from)
                .collect(),
        }
    }
}

// ============================================================================
// Rate limiting
// ============================================================================

/// Enforces a minimum interval between consecutive requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Map a non-success HTTP status to a collaborator error
fn status_error(status: StatusCode, body: String, path: &str) -> ServiceError {
    match status {
        StatusCode::UNAUTHORIZED => ServiceError::Unauthorized(if body.is_empty() {
            "access token rejected".to_string()
        } else {
            body
        }),
        StatusCode::NOT_FOUND => ServiceError::NotFound(path.to_string()),
        StatusCode::TOO_MANY_REQUESTS => ServiceError::RateLimitExceeded,
        other => ServiceError::Api(other.as_u16(), body),
    }
}

// ============================================================================
// Client
// ============================================================================

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
    base_url: String,
    access_token: String,
    request_timeout: Duration,
    market: String,
}

impl SpotifyClient {
    /// Client against the public API with default timeouts
    pub fn new(access_token: impl Into<String>) -> Result<Self, ServiceError> {
        Self::with_options(
            SPOTIFY_BASE_URL,
            access_token,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            DEFAULT_MIN_INTERVAL_MS,
            DEFAULT_MARKET,
        )
    }

    /// Client built from the `[spotify]` config section
    pub fn from_config(
        config: &SpotifyConfig,
        access_token: impl Into<String>,
    ) -> Result<Self, ServiceError> {
        Self::with_options(
            &config.api_base_url,
            access_token,
            Duration::from_secs(config.request_timeout_secs),
            config.min_request_interval_ms,
            &config.market,
        )
    }

    pub fn with_options(
        base_url: &str,
        access_token: impl Into<String>,
        request_timeout: Duration,
        min_request_interval_ms: u64,
        market: &str,
    ) -> Result<Self, ServiceError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(min_request_interval_ms)),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            request_timeout,
            market: market.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> ServiceError {
        if e.is_timeout() {
            ServiceError::Timeout(self.request_timeout)
        } else {
            ServiceError::Network(e.to_string())
        }
    }

    async fn check_status(
        response: reqwest::Response,
        path: &str,
    ) -> Result<reqwest::Response, ServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        tracing::debug!(path = %path, status = status.as_u16(), "Spotify request failed");
        Err(status_error(status, error_text, path))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ServiceError> {
        self.rate_limiter.wait().await;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "Querying Spotify API");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let response = Self::check_status(response, path).await?;

        response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ServiceError> {
        self.rate_limiter.wait().await;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "Posting to Spotify API");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        Self::check_status(response, path).await
    }
}

#[async_trait::async_trait]
impl CatalogSearch for SpotifyClient {
    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, ServiceError> {
        let response: SearchResponse = self
            .get_json(
                "/search",
                &[
                    ("q", query.to_string()),
                    ("type", "track".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        Ok(response.tracks.items.into_iter().map(TrackRecord::from).collect())
    }
}

#[async_trait::async_trait]
impl ArtistLookup for SpotifyClient {
    async fn artist(&self, artist_id: &str) -> Result<ArtistProfile, ServiceError> {
        let artist: WireArtist = self
            .get_json(&format!("/artists/{}", artist_id), &[])
            .await?;
        Ok(artist.into())
    }

    async fn artist_top_tracks(&self, artist_id: &str) -> Result<Vec<TrackRecord>, ServiceError> {
        let response: TopTracksResponse = self
            .get_json(
                &format!("/artists/{}/top-tracks", artist_id),
                &[("market", self.market.clone())],
            )
            .await?;
        Ok(response.tracks.into_iter().map(TrackRecord::from).collect())
    }
}

#[async_trait::async_trait]
impl UserHistory for SpotifyClient {
    async fn top_tracks(
        &self,
        limit: u32,
        time_range: TimeRange,
    ) -> Result<Vec<TrackRecord>, ServiceError> {
        let page: Paging<WireTrack> = self
            .get_json(
                "/me/top/tracks",
                &[
                    ("limit", limit.to_string()),
                    ("time_range", time_range.to_string()),
                ],
            )
            .await?;
        Ok(page.items.into_iter().map(TrackRecord::from).collect())
    }

    async fn top_artists(
        &self,
        limit: u32,
        time_range: TimeRange,
    ) -> Result<Vec<ArtistProfile>, ServiceError> {
        let page: Paging<WireArtist> = self
            .get_json(
                "/me/top/artists",
                &[
                    ("limit", limit.to_string()),
                    ("time_range", time_range.to_string()),
                ],
            )
            .await?;
        Ok(page.items.into_iter().map(ArtistProfile::from).collect())
    }
}

#[async_trait::async_trait]
impl UserLibrary for SpotifyClient {
    async fn saved_tracks(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<TrackRecord>, ServiceError> {
        let page: Paging<SavedTrackItem> = self
            .get_json(
                "/me/tracks",
                &[("limit", limit.to_string()), ("offset", offset.to_string())],
            )
            .await?;
        Ok(page
            .items
            .into_iter()
            .map(|item| TrackRecord::from(item.track))
            .collect())
    }
}

#[async_trait::async_trait]
impl PlaylistWriter for SpotifyClient {
    async fn current_user_id(&self) -> Result<String, ServiceError> {
        let user: WireUser = self.get_json("/me", &[]).await?;
        Ok(user.id)
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        playlist: &NewPlaylist,
    ) -> Result<CreatedPlaylist, ServiceError> {
        let path = format!("/users/{}/playlists", user_id);
        let response = self.post_json(&path, playlist).await?;
        let created: WirePlaylist = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        tracing::info!(playlist_id = %created.id, name = %created.name, "Created Spotify playlist");

        Ok(CreatedPlaylist {
            id: created.id,
            name: created.name,
            url: created.external_urls.spotify,
        })
    }

    async fn add_items(&self, playlist_id: &str, uris: &[String]) -> Result<(), ServiceError> {
        let path = format!("/playlists/{}/tracks", playlist_id);
        self.post_json(&path, &AddItemsBody { uris }).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl PlaylistReader for SpotifyClient {
    async fn playlist(&self, playlist_id: &str) -> Result<PlaylistDetails, ServiceError> {
        let playlist: WirePlaylistDetails = self
            .get_json(
                &format!("/playlists/{}", playlist_id),
                &[("market", self.market.clone())],
            )
            .await?;
        Ok(playlist.into())
    }
}

#[async_trait::async_trait]
impl Recommender for SpotifyClient {
    async fn recommendations(
        &self,
        seeds: &RecommendationSeeds,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, ServiceError> {
        let mut query = vec![("limit", limit.to_string())];
        for (key, values) in [
            ("seed_tracks", &seeds.tracks),
            ("seed_artists", &seeds.artists),
            ("seed_genres", &seeds.genres),
        ] {
            if !values.is_empty() {
                query.push((key, values.join(",")));
            }
        }

        let response: RecommendationsResponse = self.get_json("/recommendations", &query).await?;
        Ok(response.tracks.into_iter().map(TrackRecord::from).collect())
    }
}
