//! Artist, genre, popularity and era diversity

use super::classification::{
    artist_diversity_label, diversity_level, era_label, genre_variety_label, popularity_label,
};
use super::round_to;
use crate::error::AnalyzerResult;
use crate::services::{ArtistGenreCache, ResolvedCollection};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiversitySummary {
    pub diversity_level: String,
    pub total_songs: usize,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistDiversity {
    pub unique_artists: usize,
    pub total_artist_appearances: usize,
    pub diversity_score: f64,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreDiversity {
    pub unique_genres: usize,
    /// Sorted
    pub genres: Vec<String>,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularityDistribution {
    pub average_popularity: f64,
    pub range: u32,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EraDistribution {
    pub year_range: i32,
    pub earliest: Option<i32>,
    pub latest: Option<i32>,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiversityTrack {
    pub name: String,
    pub artists: Vec<String>,
    pub popularity: u32,
    pub release_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiversityReport {
    pub summary: DiversitySummary,
    pub artist_diversity: ArtistDiversity,
    pub genre_diversity: GenreDiversity,
    pub popularity_distribution: PopularityDistribution,
    pub era_distribution: EraDistribution,
    pub tracks: Vec<DiversityTrack>,
}

/// Compute diversity metrics; genres come from `cache`
pub async fn analyze_diversity(
    collection: &ResolvedCollection,
    cache: &mut ArtistGenreCache,
) -> AnalyzerResult<DiversityReport> {
    let mut appearances: Vec<&str> = Vec::new();
    let mut genres: BTreeSet<String> = BTreeSet::new();
    let mut popularities: Vec<u32> = Vec::new();
    let mut years: Vec<i32> = Vec::new();
    let mut tracks = Vec::with_capacity(collection.tracks.len());

    for track in &collection.tracks {
        appearances.extend(track.artists.iter().map(|a| a.name.as_str()));
        genres.extend(cache.track_genres(track).await?);
        popularities.push(track.popularity);
        years.extend(track.release_year);

        tracks.push(DiversityTrack {
            name: track.name.clone(),
            artists: track.artist_names(),
            popularity: track.popularity,
            release_year: track.release_year,
        });
    }

    let unique_artists = appearances.iter().collect::<HashSet<_>>().len();
    let artist_diversity = if appearances.is_empty() {
        0.0
    } else {
        unique_artists as f64 / appearances.len() as f64
    };

    let average_popularity = if popularities.is_empty() {
        0.0
    } else {
        popularities.iter().map(|&p| p as f64).sum::<f64>() / popularities.len() as f64
    };
    let popularity_range = match (popularities.iter().max(), popularities.iter().min()) {
        (Some(max), Some(min)) => max - min,
        _ => 0,
    };

    let earliest = years.iter().copied().min();
    let latest = years.iter().copied().max();
    let year_range = match (earliest, latest) {
        (Some(e), Some(l)) => l - e,
        _ => 0,
    };

    let unique_genres = genres.len();

    Ok(DiversityReport {
        summary: DiversitySummary {
            diversity_level: diversity_level(artist_diversity, unique_genres).to_string(),
            total_songs: tracks.len(),
            errors: collection.error_messages(),
        },
        artist_diversity: ArtistDiversity {
            unique_artists,
            total_artist_appearances: appearances.len(),
            diversity_score: round_to(artist_diversity, 3),
            interpretation: artist_diversity_label(artist_diversity).to_string(),
        },
        genre_diversity: GenreDiversity {
            unique_genres,
            genres: genres.into_iter().collect(),
            interpretation: genre_variety_label(unique_genres).to_string(),
        },
        popularity_distribution: PopularityDistribution {
            average_popularity: round_to(average_popularity, 1),
            range: popularity_range,
            interpretation: popularity_label(average_popularity).to_string(),
        },
        era_distribution: EraDistribution {
            year_range,
            earliest,
            latest,
            interpretation: era_label(year_range, earliest).to_string(),
        },
        tracks,
    })
}
