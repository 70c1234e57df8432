//! Per-invocation artist genre cache
//!
//! Keyed by artist name. The first request for a name performs one artist
//! lookup; later requests are served from memory. A failed or timed-out
//! lookup caches an empty genre list, so the artist is never looked up twice
//! in the same run. Only an authentication failure propagates.

use super::call_with_timeout;
use crate::error::AnalyzerResult;
use crate::types::{ArtistLookup, ArtistRef, ServiceError, TrackRecord};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct ArtistGenreCache {
    lookup: Arc<dyn ArtistLookup>,
    call_timeout: Duration,
    entries: HashMap<String, Vec<String>>,
}

impl ArtistGenreCache {
    pub fn new(lookup: Arc<dyn ArtistLookup>, call_timeout: Duration) -> Self {
        Self {
            lookup,
            call_timeout,
            entries: HashMap::new(),
        }
    }

    /// Genres of one credited artist, in catalog order
    pub async fn genres_of(&mut self, artist: &ArtistRef) -> AnalyzerResult<Vec<String>> {
        if let Some(genres) = self.entries.get(&artist.name) {
            return Ok(genres.clone());
        }

        let genres = match artist.id.as_deref() {
            Some(id) if !id.is_empty() => self.fetch(id, &artist.name).await?,
            _ => {
                debug!(artist = %artist.name, "Artist has no catalog id, no genres");
                Vec::new()
            }
        };

        self.entries.insert(artist.name.clone(), genres.clone());
        Ok(genres)
    }

    /// Distinct genres across all artists of a track
    pub async fn track_genres(&mut self, track: &TrackRecord) -> AnalyzerResult<BTreeSet<String>> {
        let mut genres = BTreeSet::new();
        for artist in &track.artists {
            genres.extend(self.genres_of(artist).await?);
        }
        Ok(genres)
    }

    /// Number of cached artists
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    async fn fetch(&self, artist_id: &str, artist_name: &str) -> AnalyzerResult<Vec<String>> {
        match call_with_timeout(self.call_timeout, self.lookup.artist(artist_id)).await {
            Ok(profile) => {
                debug!(
                    artist = %artist_name,
                    genre_count = profile.genres.len(),
                    "Fetched artist genres"
                );
                Ok(profile.genres)
            }
            Err(e @ ServiceError::Unauthorized(_)) => Err(e.into()),
            Err(e) => {
                warn!(
                    artist = %artist_name,
                    artist_id = %artist_id,
                    error = %e,
                    "Artist lookup failed, using empty genre set"
                );
                Ok(Vec::new())
            }
        }
    }
}
