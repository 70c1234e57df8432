//! External-service plumbing
//!
//! - `spotify_client`: HTTP binding of the collaborator traits
//! - `track_resolver`: descriptor → canonical track
//! - `genre_cache`: per-invocation artist genre memo
//! - `catalog_lookup`: free-text search, recommendations and artist info

pub mod catalog_lookup;
pub mod genre_cache;
pub mod spotify_client;
pub mod track_resolver;

pub use catalog_lookup::{ArtistInfoReport, TopTrackSummary, TrackSearchResult};
pub use genre_cache::ArtistGenreCache;
pub use spotify_client::SpotifyClient;
pub use track_resolver::{
    validate_descriptors, Resolution, ResolutionError, ResolvedCollection, TrackResolver,
};

use crate::types::ServiceError;
use std::future::Future;
use std::time::Duration;

/// Run one collaborator call under an explicit deadline
///
/// An elapsed deadline is reported as [`ServiceError::Timeout`], the same
/// variant the HTTP client uses for its own transport timeout.
pub(crate) async fn call_with_timeout<T, F>(limit: Duration, call: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ServiceError::Timeout(limit)),
    }
}
