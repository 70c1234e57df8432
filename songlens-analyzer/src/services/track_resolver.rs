//! Descriptor → canonical track resolution
//!
//! One catalog search (limit 1) per descriptor. A descriptor with no match,
//! or whose search exceeds the call deadline, becomes a [`ResolutionError`]
//! and processing continues. Any other collaborator fault aborts the
//! invocation. No caching: identical descriptors are searched twice.

use super::call_with_timeout;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::types::{CatalogSearch, ServiceError, SongDescriptor, TrackRecord};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Unmatched descriptor, carrying the composed search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionError {
    pub query: String,
    pub timed_out: bool,
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.timed_out {
            write!(f, "Timed out: {}", self.query)
        } else {
            write!(f, "Not found: {}", self.query)
        }
    }
}

/// Per-descriptor outcome
#[derive(Debug, Clone)]
pub enum Resolution {
    Resolved(TrackRecord),
    Unresolved(ResolutionError),
}

/// Resolved tracks in input order, plus one error per unresolved descriptor
#[derive(Debug, Clone, Default)]
pub struct ResolvedCollection {
    pub tracks: Vec<TrackRecord>,
    pub errors: Vec<ResolutionError>,
}

impl ResolvedCollection {
    /// Rendered errors, `None` when every descriptor resolved
    pub fn error_messages(&self) -> Option<Vec<String>> {
        if self.errors.is_empty() {
            None
        } else {
            Some(self.errors.iter().map(ToString::to_string).collect())
        }
    }

    pub fn total(&self) -> usize {
        self.tracks.len() + self.errors.len()
    }
}

/// Reject an empty list or a descriptor without a song name
pub fn validate_descriptors(songs: &[SongDescriptor]) -> AnalyzerResult<()> {
    if songs.is_empty() {
        return Err(AnalyzerError::InvalidInput(
            "songs list must not be empty".to_string(),
        ));
    }

    if let Some(index) = songs.iter().position(|s| s.song_name.trim().is_empty()) {
        return Err(AnalyzerError::InvalidInput(format!(
            "songs[{}].song_name must not be empty",
            index
        )));
    }

    Ok(())
}

/// Track resolver over a catalog search collaborator
pub struct TrackResolver {
    catalog: Arc<dyn CatalogSearch>,
    call_timeout: Duration,
}

impl TrackResolver {
    pub fn new(catalog: Arc<dyn CatalogSearch>, call_timeout: Duration) -> Self {
        Self {
            catalog,
            call_timeout,
        }
    }

    /// Resolve one descriptor to the catalog's best match
    pub async fn resolve(&self, descriptor: &SongDescriptor) -> AnalyzerResult<Resolution> {
        let query = descriptor.search_query();
        debug!(query = %query, "Resolving song");

        let result = call_with_timeout(
            self.call_timeout,
            self.catalog.search_tracks(&query, 1),
        )
        .await;

        match result {
            Ok(mut matches) => {
                if matches.is_empty() {
                    debug!(query = %query, "No catalog match");
                    Ok(Resolution::Unresolved(ResolutionError {
                        query,
                        timed_out: false,
                    }))
                } else {
                    Ok(Resolution::Resolved(matches.swap_remove(0)))
                }
            }
            Err(ServiceError::Timeout(limit)) => {
                warn!(query = %query, timeout = ?limit, "Catalog search timed out");
                Ok(Resolution::Unresolved(ResolutionError {
                    query,
                    timed_out: true,
                }))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve every descriptor, in input order
    pub async fn resolve_all(&self, songs: &[SongDescriptor]) -> AnalyzerResult<ResolvedCollection> {
        validate_descriptors(songs)?;

        let mut collection = ResolvedCollection::default();
        for descriptor in songs {
            match self.resolve(descriptor).await? {
                Resolution::Resolved(track) => collection.tracks.push(track),
                Resolution::Unresolved(error) => collection.errors.push(error),
            }
        }

        debug!(
            requested = songs.len(),
            resolved = collection.tracks.len(),
            unresolved = collection.errors.len(),
            "Resolution complete"
        );

        Ok(collection)
    }
}
