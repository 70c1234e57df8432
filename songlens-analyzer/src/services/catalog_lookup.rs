//! Free-text track search, recommendations and artist info

use super::call_with_timeout;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::types::{ArtistLookup, CatalogSearch, RecommendationSeeds, Recommender, TrackRecord};
use serde::Serialize;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
pub const MAX_SEARCH_LIMIT: u32 = 50;
pub const DEFAULT_RECOMMENDATION_LIMIT: u32 = 20;
pub const MAX_RECOMMENDATION_LIMIT: u32 = 100;
const ARTIST_TOP_TRACKS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSearchResult {
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    pub id: String,
    pub uri: String,
    pub popularity: u32,
    pub external_url: Option<String>,
}

impl From<TrackRecord> for TrackSearchResult {
    fn from(track: TrackRecord) -> Self {
        Self {
            artists: track.artist_names(),
            name: track.name,
            album: track.album,
            id: track.id,
            uri: track.uri,
            popularity: track.popularity,
            external_url: track.external_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopTrackSummary {
    pub name: String,
    pub album: String,
    pub popularity: u32,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistInfoReport {
    pub name: String,
    pub genres: Vec<String>,
    pub popularity: u32,
    pub followers: u64,
    pub top_tracks: Vec<TopTrackSummary>,
    pub external_url: Option<String>,
}

/// Clamp a caller-supplied limit into 1..=50, defaulting to 10
pub fn clamp_search_limit(limit: Option<u32>) -> u32 {
    limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT)
}

/// Relevance-ordered catalog search
pub async fn search_tracks(
    catalog: &dyn CatalogSearch,
    query: &str,
    limit: Option<u32>,
    call_timeout: Duration,
) -> AnalyzerResult<Vec<TrackSearchResult>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AnalyzerError::InvalidInput(
            "query must not be empty".to_string(),
        ));
    }

    let limit = clamp_search_limit(limit);
    let tracks = call_with_timeout(call_timeout, catalog.search_tracks(query, limit)).await?;

    info!(query = %query, limit, results = tracks.len(), "Track search complete");

    Ok(tracks.into_iter().map(TrackSearchResult::from).collect())
}

pub fn clamp_recommendation_limit(limit: Option<u32>) -> u32 {
    limit
        .unwrap_or(DEFAULT_RECOMMENDATION_LIMIT)
        .clamp(1, MAX_RECOMMENDATION_LIMIT)
}

/// Tracks recommended from up to five seeds of each kind
///
/// At least one seed is required.
pub async fn recommendations(
    recommender: &dyn Recommender,
    seeds: &RecommendationSeeds,
    limit: Option<u32>,
    call_timeout: Duration,
) -> AnalyzerResult<Vec<TrackSearchResult>> {
    let seeds = seeds.truncated();
    if seeds.is_empty() {
        return Err(AnalyzerError::InvalidInput(
            "at least one seed track, artist or genre is required".to_string(),
        ));
    }

    let limit = clamp_recommendation_limit(limit);
    let tracks =
        call_with_timeout(call_timeout, recommender.recommendations(&seeds, limit)).await?;

    info!(
        seed_tracks = seeds.tracks.len(),
        seed_artists = seeds.artists.len(),
        seed_genres = seeds.genres.len(),
        limit,
        results = tracks.len(),
        "Recommendations retrieved"
    );

    Ok(tracks.into_iter().map(TrackSearchResult::from).collect())
}

/// Artist profile plus its top tracks
pub async fn artist_info(
    lookup: &dyn ArtistLookup,
    artist_id: &str,
    call_timeout: Duration,
) -> AnalyzerResult<ArtistInfoReport> {
    let artist_id = artist_id.trim();
    if artist_id.is_empty() {
        return Err(AnalyzerError::InvalidInput(
            "artist_id must not be empty".to_string(),
        ));
    }

    let profile = call_with_timeout(call_timeout, lookup.artist(artist_id)).await?;
    let top_tracks = call_with_timeout(call_timeout, lookup.artist_top_tracks(artist_id)).await?;

    info!(artist = %profile.name, top_tracks = top_tracks.len(), "Artist info retrieved");

    Ok(ArtistInfoReport {
        name: profile.name,
        genres: profile.genres,
        popularity: profile.popularity,
        followers: profile.followers,
        top_tracks: top_tracks
            .into_iter()
            .take(ARTIST_TOP_TRACKS)
            .map(|t| TopTrackSummary {
                name: t.name,
                album: t.album,
                popularity: t.popularity,
                id: t.id,
            })
            .collect(),
        external_url: profile.external_url,
    })
}
