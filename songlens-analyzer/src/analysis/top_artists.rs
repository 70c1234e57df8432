//! Most frequent artists in a collection

use super::{percentage, round_to, FrequencyTable};
use crate::services::ResolvedCollection;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Share of appearances above which the top artist dominates
const FOCUSED_THRESHOLD: f64 = 40.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopArtistsSummary {
    pub total_songs_analyzed: usize,
    pub unique_artists: usize,
    pub top_artist: Option<String>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistShare {
    pub artist: String,
    pub song_count: usize,
    pub percentage: f64,
    pub songs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopArtistsReport {
    pub summary: TopArtistsSummary,
    pub top_artists: Vec<ArtistShare>,
    pub distribution_type: String,
}

/// "Focused" when one artist dominates, "Balanced" when counts are spread
/// over many distinct values, "Varied" otherwise
fn distribution_type(top_percentage: Option<f64>, counts: &[usize]) -> &'static str {
    if top_percentage.map_or(false, |p| p > FOCUSED_THRESHOLD) {
        return "Focused";
    }

    let distinct_counts = counts.iter().collect::<HashSet<_>>().len();
    if distinct_counts as f64 > counts.len() as f64 * 0.5 {
        "Balanced"
    } else {
        "Varied"
    }
}

/// Rank artists by the number of tracks crediting them, keeping `top_n`
pub fn top_artists(collection: &ResolvedCollection, top_n: usize) -> TopArtistsReport {
    let mut table: FrequencyTable<String> = FrequencyTable::new();
    let mut songs: HashMap<String, Vec<String>> = HashMap::new();

    for track in &collection.tracks {
        let mut credited = HashSet::new();
        for artist in &track.artists {
            if !credited.insert(artist.name.as_str()) {
                continue;
            }
            table.add(&artist.name);
            songs
                .entry(artist.name.clone())
                .or_default()
                .push(track.name.clone());
        }
    }

    let total_appearances = table.total();
    let top: Vec<ArtistShare> = table
        .ranked()
        .into_iter()
        .take(top_n)
        .map(|(artist, count)| ArtistShare {
            songs: songs.remove(&artist).unwrap_or_default(),
            percentage: round_to(percentage(count, total_appearances), 1),
            song_count: count,
            artist,
        })
        .collect();

    let counts: Vec<usize> = table.counts().collect();
    let distribution = distribution_type(top.first().map(|a| a.percentage), &counts);

    TopArtistsReport {
        summary: TopArtistsSummary {
            total_songs_analyzed: collection.tracks.len(),
            unique_artists: table.len(),
            top_artist: top.first().map(|a| a.artist.clone()),
            errors: collection.error_messages(),
        },
        top_artists: top,
        distribution_type: distribution.to_string(),
    }
}
