//! Balanced subset selection
//!
//! Three strategies draw at most `target_size` tracks so that one attribute
//! is represented as evenly as possible:
//!
//! - **genre**: round-robin over genre buckets in a shuffled order. A track
//!   sits in every bucket it has a genre for (no genre → `"Unknown"`).
//! - **artist**: one shuffled pass, admitting at most two tracks per
//!   artist set (sorted artist names as one composite key).
//! - **era**: round-robin over decade buckets in ascending order. Tracks
//!   without a release year are never selected.
//!
//! Every strategy de-duplicates by catalog track id and stops when the
//! target is reached or all buckets are exhausted.

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::services::{ArtistGenreCache, ResolvedCollection};
use crate::types::{CreatedPlaylist, TrackRecord};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

/// Tracks admitted per artist set under the artist criterion
pub const MAX_PER_ARTIST_SET: usize = 2;

const UNKNOWN_GENRE: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BalanceCriteria {
    #[default]
    Genre,
    Artist,
    Era,
}

impl BalanceCriteria {
    pub fn as_str(self) -> &'static str {
        match self {
            BalanceCriteria::Genre => "genre",
            BalanceCriteria::Artist => "artist",
            BalanceCriteria::Era => "era",
        }
    }
}

impl fmt::Display for BalanceCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BalanceCriteria {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "genre" => Ok(BalanceCriteria::Genre),
            "artist" => Ok(BalanceCriteria::Artist),
            "era" => Ok(BalanceCriteria::Era),
            other => Err(AnalyzerError::InvalidInput(format!(
                "Unknown balance criteria '{}' (expected genre, artist or era)",
                other
            ))),
        }
    }
}

/// Resolved track enriched with its genres and release year
#[derive(Debug, Clone)]
pub struct SelectionCandidate {
    pub track: TrackRecord,
    /// Distinct genres across the track's artists, sorted
    pub genres: Vec<String>,
    pub year: Option<i32>,
}

impl SelectionCandidate {
    fn artist_key(&self) -> Vec<String> {
        let mut names = self.track.artist_names();
        names.sort();
        names
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedTrack {
    pub name: String,
    pub artists: Vec<String>,
    pub genres: Vec<String>,
    pub year: Option<i32>,
    pub id: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionSummary {
    pub balance_criteria: String,
    pub source_songs: usize,
    pub selected_songs: usize,
    pub target_size: usize,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalancedSelectionReport {
    pub summary: SelectionSummary,
    pub balanced_selection: Vec<SelectedTrack>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_created: Option<CreatedPlaylist>,
}

impl BalancedSelectionReport {
    /// Catalog URIs of the selected tracks, in selection order
    pub fn uris(&self) -> Vec<String> {
        self.balanced_selection.iter().map(|t| t.uri.clone()).collect()
    }
}

/// Attach genres (via `cache`) and release years to every resolved track
pub async fn build_candidates(
    collection: &ResolvedCollection,
    cache: &mut ArtistGenreCache,
) -> AnalyzerResult<Vec<SelectionCandidate>> {
    let mut candidates = Vec::with_capacity(collection.tracks.len());
    for track in &collection.tracks {
        let genres = cache.track_genres(track).await?.into_iter().collect();
        candidates.push(SelectionCandidate {
            year: track.release_year,
            genres,
            track: track.clone(),
        });
    }
    Ok(candidates)
}

/// Pick candidate indices under `criteria`
pub fn select_balanced<R: Rng + ?Sized>(
    candidates: &[SelectionCandidate],
    target_size: usize,
    criteria: BalanceCriteria,
    rng: &mut R,
) -> Vec<usize> {
    match criteria {
        BalanceCriteria::Genre => select_by_genre(candidates, target_size, rng),
        BalanceCriteria::Artist => select_by_artist(candidates, target_size, rng),
        BalanceCriteria::Era => select_by_era(candidates, target_size),
    }
}

fn select_by_genre<R: Rng + ?Sized>(
    candidates: &[SelectionCandidate],
    target_size: usize,
    rng: &mut R,
) -> Vec<usize> {
    let mut buckets: Vec<(&str, VecDeque<usize>)> = Vec::new();
    let mut bucket_index: HashMap<&str, usize> = HashMap::new();

    for (i, candidate) in candidates.iter().enumerate() {
        let genres: Vec<&str> = if candidate.genres.is_empty() {
            vec![UNKNOWN_GENRE]
        } else {
            candidate.genres.iter().map(String::as_str).collect()
        };

        for genre in genres {
            let slot = *bucket_index.entry(genre).or_insert_with(|| {
                buckets.push((genre, VecDeque::new()));
                buckets.len() - 1
            });
            buckets[slot].1.push_back(i);
        }
    }

    buckets.shuffle(rng);
    let mut queues: Vec<VecDeque<usize>> = buckets.into_iter().map(|(_, q)| q).collect();
    round_robin(candidates, &mut queues, target_size)
}

fn select_by_artist<R: Rng + ?Sized>(
    candidates: &[SelectionCandidate],
    target_size: usize,
    rng: &mut R,
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.shuffle(rng);

    let mut admitted: HashMap<Vec<String>, usize> = HashMap::new();
    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut selected = Vec::new();

    for i in order {
        if selected.len() >= target_size {
            break;
        }

        let candidate = &candidates[i];
        let count = admitted.entry(candidate.artist_key()).or_insert(0);
        if *count >= MAX_PER_ARTIST_SET || seen_ids.contains(candidate.track.id.as_str()) {
            continue;
        }

        *count += 1;
        seen_ids.insert(candidate.track.id.as_str());
        selected.push(i);
    }

    selected
}

fn select_by_era(candidates: &[SelectionCandidate], target_size: usize) -> Vec<usize> {
    let mut decades: BTreeMap<i32, VecDeque<usize>> = BTreeMap::new();
    for (i, candidate) in candidates.iter().enumerate() {
        if let Some(year) = candidate.year {
            decades
                .entry(year.div_euclid(10) * 10)
                .or_default()
                .push_back(i);
        }
    }

    let mut queues: Vec<VecDeque<usize>> = decades.into_values().collect();
    round_robin(candidates, &mut queues, target_size)
}

/// Cycle over `queues`, taking the front of each non-empty one in turn
fn round_robin(
    candidates: &[SelectionCandidate],
    queues: &mut [VecDeque<usize>],
    target_size: usize,
) -> Vec<usize> {
    let goal = target_size.min(candidates.len());
    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut selected = Vec::with_capacity(goal);

    if queues.is_empty() {
        return selected;
    }

    let mut cursor = 0;
    while selected.len() < goal {
        if queues.iter().all(VecDeque::is_empty) {
            break;
        }

        if let Some(i) = queues[cursor % queues.len()].pop_front() {
            if seen_ids.insert(candidates[i].track.id.as_str()) {
                selected.push(i);
            }
        }
        cursor += 1;
    }

    selected
}

/// Assemble the report for the chosen indices
pub fn selection_report(
    collection: &ResolvedCollection,
    candidates: &[SelectionCandidate],
    selected: &[usize],
    target_size: usize,
    criteria: BalanceCriteria,
) -> BalancedSelectionReport {
    let balanced_selection: Vec<SelectedTrack> = selected
        .iter()
        .map(|&i| {
            let c = &candidates[i];
            SelectedTrack {
                name: c.track.name.clone(),
                artists: c.track.artist_names(),
                genres: c.genres.clone(),
                year: c.year,
                id: c.track.id.clone(),
                uri: c.track.uri.clone(),
            }
        })
        .collect();

    BalancedSelectionReport {
        summary: SelectionSummary {
            balance_criteria: criteria.to_string(),
            source_songs: candidates.len(),
            selected_songs: balanced_selection.len(),
            target_size,
            errors: collection.error_messages(),
        },
        balanced_selection,
        playlist_created: None,
    }
}
