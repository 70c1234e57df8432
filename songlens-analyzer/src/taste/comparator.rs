//! Collection vs. listening history
//!
//! Name matching is case-insensitive. A track can be both a favorite track
//! and by a favorite artist; it then counts towards both match totals, so
//! `match_percentage` is clamped to 100.

use crate::analysis::classification::alignment_label;
use crate::analysis::round_to;
use crate::error::AnalyzerResult;
use crate::services::{call_with_timeout, ArtistGenreCache, ResolvedCollection};
use crate::types::{ArtistProfile, TimeRange, TrackRecord, UserHistory};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::time::Duration;
use tracing::debug;

/// Examples listed per insight or match list
pub const MAX_EXAMPLES: usize = 5;

/// Favorites derived from the caller's top tracks and top artists
#[derive(Debug, Clone, Default)]
pub struct TasteProfile {
    track_names: HashSet<String>,
    artist_names: HashSet<String>,
    genres: BTreeSet<String>,
}

impl TasteProfile {
    pub fn from_history(top_tracks: &[TrackRecord], top_artists: &[ArtistProfile]) -> Self {
        Self {
            track_names: top_tracks.iter().map(|t| t.name.to_lowercase()).collect(),
            artist_names: top_artists.iter().map(|a| a.name.to_lowercase()).collect(),
            genres: top_artists
                .iter()
                .flat_map(|a| a.genres.iter().cloned())
                .collect(),
        }
    }

    /// Fetch top tracks and top artists for `time_range`
    pub async fn fetch(
        history: &dyn UserHistory,
        limit: u32,
        time_range: TimeRange,
        call_timeout: Duration,
    ) -> AnalyzerResult<Self> {
        let top_tracks = call_with_timeout(call_timeout, history.top_tracks(limit, time_range)).await?;
        let top_artists =
            call_with_timeout(call_timeout, history.top_artists(limit, time_range)).await?;

        debug!(
            top_tracks = top_tracks.len(),
            top_artists = top_artists.len(),
            time_range = %time_range,
            "Fetched listening history"
        );

        Ok(Self::from_history(&top_tracks, &top_artists))
    }

    pub fn is_favorite_track(&self, track: &TrackRecord) -> bool {
        self.track_names.contains(&track.name.to_lowercase())
    }

    pub fn is_favorite_artist(&self, track: &TrackRecord) -> bool {
        track
            .artists
            .iter()
            .any(|a| self.artist_names.contains(&a.name.to_lowercase()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TasteSong {
    pub name: String,
    pub artists: Vec<String>,
    pub is_favorite_track: bool,
    pub is_favorite_artist: bool,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongRef {
    pub name: String,
    pub artists: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TasteSummary {
    pub alignment: String,
    pub match_percentage: f64,
    pub total_analyzed: usize,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TasteMatches {
    pub favorite_tracks_count: usize,
    pub favorite_artists_count: usize,
    pub non_matching_count: usize,
    pub favorite_tracks: Vec<TasteSong>,
    pub favorite_artists: Vec<TasteSong>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TasteOverlaps {
    pub artist_overlap: usize,
    pub genre_overlap: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TasteInsights {
    /// Favorite genres absent from the collection
    pub missing_from_your_taste: Vec<String>,
    /// Collection genres absent from the favorites
    pub new_genres_in_collection: Vec<String>,
    pub songs_to_explore: Vec<SongRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TasteReport {
    pub summary: TasteSummary,
    pub matches: TasteMatches,
    pub overlaps: TasteOverlaps,
    pub insights: TasteInsights,
}

pub async fn compare_taste(
    collection: &ResolvedCollection,
    cache: &mut ArtistGenreCache,
    profile: &TasteProfile,
) -> AnalyzerResult<TasteReport> {
    let mut favorite_tracks: Vec<TasteSong> = Vec::new();
    let mut favorite_artists: Vec<TasteSong> = Vec::new();
    let mut non_matching: Vec<TasteSong> = Vec::new();
    let mut collection_artists: HashSet<String> = HashSet::new();
    let mut collection_genres: BTreeSet<String> = BTreeSet::new();

    for track in &collection.tracks {
        let genres = cache.track_genres(track).await?;
        collection_genres.extend(genres.iter().cloned());
        collection_artists.extend(track.artists.iter().map(|a| a.name.to_lowercase()));

        let song = TasteSong {
            name: track.name.clone(),
            artists: track.artist_names(),
            is_favorite_track: profile.is_favorite_track(track),
            is_favorite_artist: profile.is_favorite_artist(track),
            genres: genres.into_iter().collect(),
        };

        match (song.is_favorite_track, song.is_favorite_artist) {
            (false, false) => non_matching.push(song),
            (true, true) => {
                favorite_tracks.push(song.clone());
                favorite_artists.push(song);
            }
            (true, false) => favorite_tracks.push(song),
            (false, true) => favorite_artists.push(song),
        }
    }

    let total_analyzed = collection.tracks.len();
    let match_percentage = if total_analyzed == 0 {
        0.0
    } else {
        ((favorite_tracks.len() + favorite_artists.len()) as f64 / total_analyzed as f64 * 100.0)
            .min(100.0)
    };

    let artist_overlap = collection_artists.intersection(&profile.artist_names).count();
    let genre_overlap = collection_genres.intersection(&profile.genres).count();

    let missing_from_your_taste = profile
        .genres
        .difference(&collection_genres)
        .take(MAX_EXAMPLES)
        .cloned()
        .collect();
    let new_genres_in_collection = collection_genres
        .difference(&profile.genres)
        .take(MAX_EXAMPLES)
        .cloned()
        .collect();

    let songs_to_explore = non_matching
        .iter()
        .take(MAX_EXAMPLES)
        .map(|s| SongRef {
            name: s.name.clone(),
            artists: s.artists.clone(),
        })
        .collect();

    let favorite_tracks_count = favorite_tracks.len();
    let favorite_artists_count = favorite_artists.len();
    favorite_tracks.truncate(MAX_EXAMPLES);
    favorite_artists.truncate(MAX_EXAMPLES);

    Ok(TasteReport {
        summary: TasteSummary {
            alignment: alignment_label(match_percentage).to_string(),
            match_percentage: round_to(match_percentage, 1),
            total_analyzed,
            errors: collection.error_messages(),
        },
        matches: TasteMatches {
            favorite_tracks_count,
            favorite_artists_count,
            non_matching_count: non_matching.len(),
            favorite_tracks,
            favorite_artists,
        },
        overlaps: TasteOverlaps {
            artist_overlap,
            genre_overlap,
        },
        insights: TasteInsights {
            missing_from_your_taste,
            new_genres_in_collection,
            songs_to_explore,
        },
    })
}
