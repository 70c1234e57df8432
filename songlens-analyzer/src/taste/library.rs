//! Which collection tracks are not yet in the caller's saved library

use crate::analysis::{percentage, round_to};
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::services::{call_with_timeout, ResolvedCollection};
use crate::types::UserLibrary;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryTrack {
    pub name: String,
    pub artists: Vec<String>,
    pub id: String,
    pub uri: String,
    pub url: Option<String>,
    pub popularity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibrarySummary {
    pub total_songs_checked: usize,
    pub missing_from_library: usize,
    pub already_saved: usize,
    pub missing_percentage: f64,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingReport {
    pub summary: LibrarySummary,
    pub missing_songs: Vec<LibraryTrack>,
    pub already_saved_songs: Vec<LibraryTrack>,
}

/// Collect the ids of every saved track
///
/// Pages are requested until one comes back empty or shorter than
/// `page_size`.
pub async fn saved_track_ids(
    library: &dyn UserLibrary,
    page_size: u32,
    call_timeout: Duration,
) -> AnalyzerResult<HashSet<String>> {
    if page_size == 0 {
        return Err(AnalyzerError::InvalidInput(
            "library page size must be at least 1".to_string(),
        ));
    }

    let mut ids = HashSet::new();
    let mut offset = 0u32;
    let mut pages = 0usize;

    loop {
        let page = call_with_timeout(call_timeout, library.saved_tracks(page_size, offset)).await?;
        if page.is_empty() {
            break;
        }

        pages += 1;
        let short_page = page.len() < page_size as usize;
        ids.extend(page.into_iter().map(|t| t.id));

        if short_page {
            break;
        }
        offset += page_size;
    }

    debug!(saved = ids.len(), pages, "Fetched saved library");
    Ok(ids)
}

/// Partition resolved tracks into saved / missing
pub fn find_missing(collection: &ResolvedCollection, saved_ids: &HashSet<String>) -> MissingReport {
    let (already_saved, missing): (Vec<_>, Vec<_>) = collection
        .tracks
        .iter()
        .map(|t| LibraryTrack {
            name: t.name.clone(),
            artists: t.artist_names(),
            id: t.id.clone(),
            uri: t.uri.clone(),
            url: t.external_url.clone(),
            popularity: t.popularity,
        })
        .partition(|t| saved_ids.contains(&t.id));

    let checked = missing.len() + already_saved.len();

    MissingReport {
        summary: LibrarySummary {
            total_songs_checked: checked,
            missing_from_library: missing.len(),
            already_saved: already_saved.len(),
            missing_percentage: round_to(percentage(missing.len(), checked), 1),
            errors: collection.error_messages(),
        },
        missing_songs: missing,
        already_saved_songs: already_saved,
    }
}
