//! Explicit-content ratio

use super::classification::explicitness_rating;
use super::{percentage, round_to};
use crate::services::ResolvedCollection;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentEntry {
    pub name: String,
    pub artists: Vec<String>,
    pub explicit: bool,
    pub popularity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplicitnessSummary {
    pub total_songs_analyzed: usize,
    pub explicit_songs_count: usize,
    pub clean_songs_count: usize,
    pub explicit_percentage: f64,
    pub rating: String,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplicitnessReport {
    pub summary: ExplicitnessSummary,
    pub explicit_songs: Vec<ContentEntry>,
    pub clean_songs: Vec<ContentEntry>,
}

/// Partition resolved tracks by the explicit flag
pub fn analyze_explicitness(collection: &ResolvedCollection) -> ExplicitnessReport {
    let (explicit, clean): (Vec<_>, Vec<_>) = collection
        .tracks
        .iter()
        .map(|t| ContentEntry {
            name: t.name.clone(),
            artists: t.artist_names(),
            explicit: t.explicit,
            popularity: t.popularity,
        })
        .partition(|entry| entry.explicit);

    let total = explicit.len() + clean.len();
    let explicit_percentage = percentage(explicit.len(), total);

    ExplicitnessReport {
        summary: ExplicitnessSummary {
            total_songs_analyzed: total,
            explicit_songs_count: explicit.len(),
            clean_songs_count: clean.len(),
            explicit_percentage: round_to(explicit_percentage, 1),
            rating: explicitness_rating(explicit_percentage).to_string(),
            errors: collection.error_messages(),
        },
        explicit_songs: explicit,
        clean_songs: clean,
    }
}
