//! Genre frequency distribution
//!
//! Genres are counted once per artist occurrence: a track by two artists who
//! share a genre contributes two tags to that genre.

use super::classification::{dominant_style, genre_spread_label};
use super::{percentage, round_to, FrequencyTable};
use crate::error::AnalyzerResult;
use crate::services::{ArtistGenreCache, ResolvedCollection};
use serde::Serialize;
use std::collections::BTreeSet;

/// Number of genres listed in `top_genres`
pub const TOP_GENRES: usize = 15;

const UNKNOWN_GENRE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreSummary {
    pub total_songs_analyzed: usize,
    pub unique_genres: usize,
    pub dominant_style: String,
    pub genre_diversity: String,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreShare {
    pub genre: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreDistribution {
    pub total_genre_tags: usize,
    pub average_genres_per_song: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackGenres {
    pub name: String,
    pub artists: Vec<String>,
    /// Distinct and sorted; `["Unknown"]` when no artist has genres
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreReport {
    pub summary: GenreSummary,
    pub top_genres: Vec<GenreShare>,
    pub genre_distribution: GenreDistribution,
    pub tracks_with_genres: Vec<TrackGenres>,
}

pub async fn analyze_genres(
    collection: &ResolvedCollection,
    cache: &mut ArtistGenreCache,
) -> AnalyzerResult<GenreReport> {
    let mut table: FrequencyTable<String> = FrequencyTable::new();
    let mut tracks_with_genres = Vec::with_capacity(collection.tracks.len());

    for track in &collection.tracks {
        let mut track_genres = BTreeSet::new();

        for artist in &track.artists {
            for genre in cache.genres_of(artist).await? {
                table.add(&genre);
                track_genres.insert(genre);
            }
        }

        let genres = if track_genres.is_empty() {
            vec![UNKNOWN_GENRE.to_string()]
        } else {
            track_genres.into_iter().collect()
        };

        tracks_with_genres.push(TrackGenres {
            name: track.name.clone(),
            artists: track.artist_names(),
            genres,
        });
    }

    let ranked = table.ranked();
    let total_genre_tags = table.total();
    let unique_genres = table.len();

    let top_genres = ranked
        .iter()
        .take(TOP_GENRES)
        .map(|(genre, count)| GenreShare {
            genre: genre.clone(),
            count: *count,
            percentage: round_to(percentage(*count, total_genre_tags), 1),
        })
        .collect();

    let average_genres_per_song = if tracks_with_genres.is_empty() {
        0.0
    } else {
        round_to(
            total_genre_tags as f64 / tracks_with_genres.len() as f64,
            1,
        )
    };

    Ok(GenreReport {
        summary: GenreSummary {
            total_songs_analyzed: tracks_with_genres.len(),
            unique_genres,
            dominant_style: dominant_style(ranked.first().map(|(g, _)| g.as_str())),
            genre_diversity: genre_spread_label(unique_genres).to_string(),
            errors: collection.error_messages(),
        },
        top_genres,
        genre_distribution: GenreDistribution {
            total_genre_tags,
            average_genres_per_song,
        },
        tracks_with_genres,
    })
}
