//! Core types and collaborator trait definitions
//!
//! The engine never talks to the network directly. Every external call goes
//! through one of the collaborator traits below, so aggregators can be driven
//! by the Spotify client in production and by in-memory fakes in tests.
//!
//! # Collaborators
//! 1. [`CatalogSearch`] - relevance-ordered track search
//! 2. [`ArtistLookup`] - artist metadata (genres) and top tracks
//! 3. [`UserHistory`] - caller's top tracks / top artists
//! 4. [`UserLibrary`] - caller's saved tracks, paginated
//! 5. [`PlaylistWriter`] - playlist creation and item insertion
//! 6. [`PlaylistReader`] - existing playlist metadata and items
//! 7. [`Recommender`] - seed-based track recommendations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Input
// ============================================================================

/// Caller-supplied song descriptor, before resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongDescriptor {
    /// Song name (required, non-empty)
    pub song_name: String,
    /// Artist name (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_name: Option<String>,
}

impl SongDescriptor {
    pub fn new(song_name: impl Into<String>, artist_name: Option<&str>) -> Self {
        Self {
            song_name: song_name.into(),
            artist_name: artist_name.map(str::to_string),
        }
    }

    /// Artist filter, treating an empty string as absent
    pub fn artist(&self) -> Option<&str> {
        self.artist_name.as_deref().filter(|a| !a.is_empty())
    }

    /// Catalog search query: `name`, or `name artist:<artist>`
    pub fn search_query(&self) -> String {
        match self.artist() {
            Some(artist) => format!("{} artist:{}", self.song_name, artist),
            None => self.song_name.clone(),
        }
    }
}

// ============================================================================
// Catalog records
// ============================================================================

/// Artist credit on a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    /// Catalog artist id (absent for local/unlinked credits)
    pub id: Option<String>,
    pub name: String,
}

impl ArtistRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
        }
    }
}

/// Canonical resolved track
///
/// Created from the catalog's best match for a descriptor and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Catalog track id
    pub id: String,
    /// Canonical track name
    pub name: String,
    /// Credited artists, in catalog order
    pub artists: Vec<ArtistRef>,
    /// Album name
    pub album: String,
    /// Popularity (0-100)
    pub popularity: u32,
    /// Explicit lyrics flag
    pub explicit: bool,
    /// Year parsed from the album release date
    pub release_year: Option<i32>,
    /// Catalog URI (used for playlist writes)
    pub uri: String,
    /// Public web URL
    pub external_url: Option<String>,
}

impl TrackRecord {
    /// Credited artist names, in catalog order
    pub fn artist_names(&self) -> Vec<String> {
        self.artists.iter().map(|a| a.name.clone()).collect()
    }
}

/// Year from an ISO-style release date (`"1999"`, `"1999-06"`, `"1999-06-01"`)
///
/// Returns `None` for empty or unparsable dates.
pub fn parse_release_year(release_date: &str) -> Option<i32> {
    release_date
        .split('-')
        .next()
        .map(str::trim)
        .filter(|y| !y.is_empty())
        .and_then(|y| y.parse().ok())
}

/// Artist metadata from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistProfile {
    pub id: String,
    pub name: String,
    /// Genre tags, in catalog order
    pub genres: Vec<String>,
    pub popularity: u32,
    pub followers: u64,
    pub external_url: Option<String>,
}

/// Listening-history window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    ShortTerm,
    #[default]
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short_term" => Ok(TimeRange::ShortTerm),
            "medium_term" => Ok(TimeRange::MediumTerm),
            "long_term" => Ok(TimeRange::LongTerm),
            other => Err(format!("Unknown time range: {}", other)),
        }
    }
}

/// Playlist creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPlaylist {
    pub name: String,
    pub public: bool,
    pub description: String,
}

/// Playlist returned by the write collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedPlaylist {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
}

/// Existing playlist as read from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistDetails {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Owner display name
    pub owner: Option<String>,
    /// Item count reported by the catalog, unavailable items included
    pub total_tracks: u32,
    pub followers: u64,
    pub external_url: Option<String>,
    /// Playable tracks of the first item page
    pub tracks: Vec<TrackRecord>,
}

/// Recommendation seeds: catalog track ids, artist ids and genre names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSeeds {
    #[serde(default)]
    pub tracks: Vec<String>,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl RecommendationSeeds {
    /// Seeds accepted per kind
    pub const MAX_PER_KIND: usize = 5;

    /// Copy keeping the first [`Self::MAX_PER_KIND`] non-blank seeds of each kind
    pub fn truncated(&self) -> Self {
        fn first(seeds: &[String]) -> Vec<String> {
            seeds
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .take(RecommendationSeeds::MAX_PER_KIND)
                .map(str::to_string)
                .collect()
        }

        Self {
            tracks: first(&self.tracks),
            artists: first(&self.artists),
            genres: first(&self.genres),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty() && self.artists.is_empty() && self.genres.is_empty()
    }
}

// ============================================================================
// Collaborator errors
// ============================================================================

/// Collaborator call errors
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

// ============================================================================
// Collaborator traits
// ============================================================================

/// Relevance-ordered track search; an empty list means no match
#[async_trait::async_trait]
pub trait CatalogSearch: Send + Sync {
    async fn search_tracks(&self, query: &str, limit: u32)
        -> Result<Vec<TrackRecord>, ServiceError>;
}

/// Artist metadata lookup
#[async_trait::async_trait]
pub trait ArtistLookup: Send + Sync {
    async fn artist(&self, artist_id: &str) -> Result<ArtistProfile, ServiceError>;

    async fn artist_top_tracks(&self, artist_id: &str) -> Result<Vec<TrackRecord>, ServiceError>;
}

/// Caller's listening history
#[async_trait::async_trait]
pub trait UserHistory: Send + Sync {
    async fn top_tracks(
        &self,
        limit: u32,
        time_range: TimeRange,
    ) -> Result<Vec<TrackRecord>, ServiceError>;

    async fn top_artists(
        &self,
        limit: u32,
        time_range: TimeRange,
    ) -> Result<Vec<ArtistProfile>, ServiceError>;
}

/// Caller's saved-track library
#[async_trait::async_trait]
pub trait UserLibrary: Send + Sync {
    /// One page of saved tracks; a page shorter than `limit` is the last one
    async fn saved_tracks(&self, limit: u32, offset: u32)
        -> Result<Vec<TrackRecord>, ServiceError>;
}

/// Playlist write path
#[async_trait::async_trait]
pub trait PlaylistWriter: Send + Sync {
    async fn current_user_id(&self) -> Result<String, ServiceError>;

    async fn create_playlist(
        &self,
        user_id: &str,
        playlist: &NewPlaylist,
    ) -> Result<CreatedPlaylist, ServiceError>;

    /// Append items; callers send at most 100 URIs per call
    async fn add_items(&self, playlist_id: &str, uris: &[String]) -> Result<(), ServiceError>;
}

/// Playlist read path
#[async_trait::async_trait]
pub trait PlaylistReader: Send + Sync {
    async fn playlist(&self, playlist_id: &str) -> Result<PlaylistDetails, ServiceError>;
}

/// Seed-based recommendations
#[async_trait::async_trait]
pub trait Recommender: Send + Sync {
    async fn recommendations(
        &self,
        seeds: &RecommendationSeeds,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, ServiceError>;
}
