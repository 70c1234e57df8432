//! Metric aggregators over a resolved collection
//!
//! Each aggregator consumes the output of one resolution pass (and, where
//! genres are needed, a per-invocation [`ArtistGenreCache`]) and produces a
//! serializable report. Percentages are rounded to one decimal place.
//!
//! [`ArtistGenreCache`]: crate::services::ArtistGenreCache

pub mod classification;
pub mod diversity;
pub mod explicitness;
pub mod genres;
pub mod playlist_stats;
pub mod top_artists;

pub use diversity::{analyze_diversity, DiversityReport};
pub use explicitness::{analyze_explicitness, ExplicitnessReport};
pub use genres::{analyze_genres, GenreReport};
pub use playlist_stats::{analyze_playlist, PlaylistAnalysisReport};
pub use top_artists::{top_artists, TopArtistsReport};

use std::collections::HashMap;
use std::hash::Hash;

/// Round half away from zero to `decimals` places
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `part / whole * 100`, 0 when `whole` is 0
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Occurrence counter that remembers first-seen order
///
/// [`FrequencyTable::ranked`] sorts by descending count with a stable sort,
/// so ties keep the order in which keys were first seen.
#[derive(Debug, Clone)]
pub(crate) struct FrequencyTable<K> {
    entries: Vec<(K, usize)>,
    index: HashMap<K, usize>,
}

impl<K: Clone + Eq + Hash> FrequencyTable<K> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn add(&mut self, key: &K) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key.clone(), 1));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|(_, count)| *count)
    }

    pub fn ranked(&self) -> Vec<(K, usize)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}
