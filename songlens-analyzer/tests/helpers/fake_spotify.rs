//! In-memory stand-in for every collaborator trait
//!
//! Search answers come from a query → track table, artist lookups from an
//! id → profile table. Every call is recorded so tests can assert on call
//! counts and batching.

use songlens_analyzer::types::{
    ArtistLookup, ArtistProfile, ArtistRef, CatalogSearch, CreatedPlaylist, NewPlaylist,
    PlaylistDetails, PlaylistReader, PlaylistWriter, RecommendationSeeds, Recommender,
    ServiceError, TimeRange, TrackRecord, UserHistory, UserLibrary,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// Recorded collaborator calls
#[derive(Debug, Default, Clone)]
pub struct CallLog {
    pub searches: Vec<String>,
    pub artist_lookups: Vec<String>,
    pub history_calls: usize,
    pub saved_pages: Vec<(u32, u32)>,
    pub created_playlists: Vec<(String, NewPlaylist)>,
    pub added_batches: Vec<(String, Vec<String>)>,
    pub playlist_reads: Vec<String>,
    pub recommendation_requests: Vec<(RecommendationSeeds, u32)>,
}

#[derive(Default)]
pub struct FakeSpotify {
    tracks: HashMap<String, TrackRecord>,
    artists: HashMap<String, ArtistProfile>,
    failing_artists: HashSet<String>,
    slow_queries: HashSet<String>,
    unauthorized: bool,
    top_tracks: Vec<TrackRecord>,
    top_artists: Vec<ArtistProfile>,
    saved: Vec<TrackRecord>,
    existing_playlists: HashMap<String, PlaylistDetails>,
    recommended: Vec<TrackRecord>,
    calls: Mutex<CallLog>,
}

impl FakeSpotify {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` (as composed by the resolver) with `track`
    pub fn with_track(mut self, query: &str, track: TrackRecord) -> Self {
        self.tracks.insert(query.to_string(), track);
        self
    }

    pub fn with_artist(mut self, id: &str, name: &str, genres: &[&str]) -> Self {
        self.artists.insert(id.to_string(), artist_profile(id, name, genres));
        self
    }

    /// Artist lookups for `id` fail with a server error
    pub fn with_failing_artist(mut self, id: &str) -> Self {
        self.failing_artists.insert(id.to_string());
        self
    }

    /// Searches for `query` never answer within any sane deadline
    pub fn with_slow_query(mut self, query: &str) -> Self {
        self.slow_queries.insert(query.to_string());
        self
    }

    /// Every call is rejected with 401
    pub fn unauthorized(mut self) -> Self {
        self.unauthorized = true;
        self
    }

    pub fn with_history(mut self, top_tracks: Vec<TrackRecord>, top_artists: Vec<ArtistProfile>) -> Self {
        self.top_tracks = top_tracks;
        self.top_artists = top_artists;
        self
    }

    pub fn with_saved(mut self, saved: Vec<TrackRecord>) -> Self {
        self.saved = saved;
        self
    }

    /// Existing playlist served by the read path
    pub fn with_playlist(mut self, playlist: PlaylistDetails) -> Self {
        self.existing_playlists.insert(playlist.id.clone(), playlist);
        self
    }

    /// Tracks returned, up to the limit, for any recommendation request
    pub fn with_recommendations(mut self, tracks: Vec<TrackRecord>) -> Self {
        self.recommended = tracks;
        self
    }

    pub fn calls(&self) -> CallLog {
        self.calls.lock().unwrap().clone()
    }

    fn check_auth(&self) -> Result<(), ServiceError> {
        if self.unauthorized {
            Err(ServiceError::Unauthorized("The access token expired".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl CatalogSearch for FakeSpotify {
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<TrackRecord>, ServiceError> {
        self.calls.lock().unwrap().searches.push(query.to_string());
        self.check_auth()?;

        if self.slow_queries.contains(query) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }

        Ok(self
            .tracks
            .get(query)
            .cloned()
            .into_iter()
            .take(limit as usize)
            .collect())
    }
}

#[async_trait::async_trait]
impl ArtistLookup for FakeSpotify {
    async fn artist(&self, artist_id: &str) -> Result<ArtistProfile, ServiceError> {
        self.calls.lock().unwrap().artist_lookups.push(artist_id.to_string());
        self.check_auth()?;

        if self.failing_artists.contains(artist_id) {
            return Err(ServiceError::Api(500, "internal error".to_string()));
        }

        self.artists
            .get(artist_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("/artists/{}", artist_id)))
    }

    async fn artist_top_tracks(&self, artist_id: &str) -> Result<Vec<TrackRecord>, ServiceError> {
        self.check_auth()?;
        Ok(self
            .tracks
            .values()
            .filter(|t| t.artists.iter().any(|a| a.id.as_deref() == Some(artist_id)))
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl UserHistory for FakeSpotify {
    async fn top_tracks(&self, limit: u32, _time_range: TimeRange) -> Result<Vec<TrackRecord>, ServiceError> {
        self.calls.lock().unwrap().history_calls += 1;
        self.check_auth()?;
        Ok(self.top_tracks.iter().take(limit as usize).cloned().collect())
    }

    async fn top_artists(
        &self,
        limit: u32,
        _time_range: TimeRange,
    ) -> Result<Vec<ArtistProfile>, ServiceError> {
        self.calls.lock().unwrap().history_calls += 1;
        self.check_auth()?;
        Ok(self.top_artists.iter().take(limit as usize).cloned().collect())
    }
}

#[async_trait::async_trait]
impl UserLibrary for FakeSpotify {
    async fn saved_tracks(&self, limit: u32, offset: u32) -> Result<Vec<TrackRecord>, ServiceError> {
        self.calls.lock().unwrap().saved_pages.push((limit, offset));
        self.check_auth()?;
        Ok(self
            .saved
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl PlaylistWriter for FakeSpotify {
    async fn current_user_id(&self) -> Result<String, ServiceError> {
        self.check_auth()?;
        Ok("listener".to_string())
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        playlist: &NewPlaylist,
    ) -> Result<CreatedPlaylist, ServiceError> {
        self.check_auth()?;
        let mut calls = self.calls.lock().unwrap();
        calls
            .created_playlists
            .push((user_id.to_string(), playlist.clone()));
        let id = format!("pl{}", calls.created_playlists.len());
        Ok(CreatedPlaylist {
            url: Some(format!("https://open.spotify.com/playlist/{}", id)),
            id,
            name: playlist.name.clone(),
        })
    }

    async fn add_items(&self, playlist_id: &str, uris: &[String]) -> Result<(), ServiceError> {
        self.check_auth()?;
        self.calls
            .lock()
            .unwrap()
            .added_batches
            .push((playlist_id.to_string(), uris.to_vec()));
        Ok(())
    }
}

#[async_trait::async_trait]
impl PlaylistReader for FakeSpotify {
    async fn playlist(&self, playlist_id: &str) -> Result<PlaylistDetails, ServiceError> {
        self.calls.lock().unwrap().playlist_reads.push(playlist_id.to_string());
        self.check_auth()?;
        self.existing_playlists
            .get(playlist_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("/playlists/{}", playlist_id)))
    }
}

#[async_trait::async_trait]
impl Recommender for FakeSpotify {
    async fn recommendations(
        &self,
        seeds: &RecommendationSeeds,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, ServiceError> {
        self.calls
            .lock()
            .unwrap()
            .recommendation_requests
            .push((seeds.clone(), limit));
        self.check_auth()?;
        Ok(self.recommended.iter().take(limit as usize).cloned().collect())
    }
}

// ============================================================================
// Fixture builders
// ============================================================================

/// Track credited to `artists` (`(id, name)` pairs)
pub fn track(id: &str, name: &str, artists: &[(&str, &str)], explicit: bool, year: Option<i32>) -> TrackRecord {
    TrackRecord {
        id: id.to_string(),
        name: name.to_string(),
        artists: artists
            .iter()
            .map(|(artist_id, artist_name)| ArtistRef::new(*artist_id, *artist_name))
            .collect(),
        album: format!("{} (Album)", name),
        popularity: 50,
        explicit,
        release_year: year,
        uri: format!("spotify:track:{}", id),
        external_url: Some(format!("https://open.spotify.com/track/{}", id)),
    }
}

pub fn artist_profile(id: &str, name: &str, genres: &[&str]) -> ArtistProfile {
    ArtistProfile {
        id: id.to_string(),
        name: name.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        popularity: 60,
        followers: 1000,
        external_url: Some(format!("https://open.spotify.com/artist/{}", id)),
    }
}
