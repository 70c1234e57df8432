//! Playlist write path
//!
//! Creating a playlist is three collaborator steps: look up the current user,
//! create the playlist, then append track URIs in batches. Any failure is
//! fatal; a playlist that was already created is not rolled back.

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::services::call_with_timeout;
use crate::services::ResolvedCollection;
use crate::types::{CreatedPlaylist, NewPlaylist, PlaylistWriter};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Upper bound on URIs per add-items call
pub const MAX_ITEMS_PER_REQUEST: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistInfo {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
    pub public: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistSummary {
    pub total_requested: usize,
    pub songs_added: usize,
    pub not_found: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddedSong {
    pub name: String,
    pub artists: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistCreationReport {
    pub success: bool,
    pub playlist: PlaylistInfo,
    pub summary: PlaylistSummary,
    pub added_songs: Vec<AddedSong>,
    pub not_found_queries: Option<Vec<String>>,
}

/// Create a playlist for the current user and fill it with `uris`
pub async fn publish_playlist(
    writer: &dyn PlaylistWriter,
    playlist: &NewPlaylist,
    uris: &[String],
    call_timeout: Duration,
) -> AnalyzerResult<CreatedPlaylist> {
    if playlist.name.trim().is_empty() {
        return Err(AnalyzerError::InvalidInput(
            "playlist_name must not be empty".to_string(),
        ));
    }

    let user_id = call_with_timeout(call_timeout, writer.current_user_id()).await?;
    let created = call_with_timeout(call_timeout, writer.create_playlist(&user_id, playlist)).await?;

    for (batch_number, batch) in uris.chunks(MAX_ITEMS_PER_REQUEST).enumerate() {
        debug!(
            playlist_id = %created.id,
            batch = batch_number,
            size = batch.len(),
            "Adding playlist items"
        );
        call_with_timeout(call_timeout, writer.add_items(&created.id, batch)).await?;
    }

    info!(
        playlist_id = %created.id,
        name = %created.name,
        tracks = uris.len(),
        "Playlist published"
    );

    Ok(created)
}

/// Publish every resolved track of `collection` as a new playlist
pub async fn create_playlist_from(
    collection: &ResolvedCollection,
    writer: &dyn PlaylistWriter,
    playlist: &NewPlaylist,
    call_timeout: Duration,
) -> AnalyzerResult<PlaylistCreationReport> {
    let uris: Vec<String> = collection.tracks.iter().map(|t| t.uri.clone()).collect();
    let created = publish_playlist(writer, playlist, &uris, call_timeout).await?;

    let not_found: Vec<String> = collection.errors.iter().map(|e| e.query.clone()).collect();

    Ok(PlaylistCreationReport {
        success: true,
        playlist: PlaylistInfo {
            id: created.id,
            name: created.name,
            url: created.url,
            public: playlist.public,
        },
        summary: PlaylistSummary {
            total_requested: collection.total(),
            songs_added: uris.len(),
            not_found: not_found.len(),
        },
        added_songs: collection
            .tracks
            .iter()
            .map(|t| AddedSong {
                name: t.name.clone(),
                artists: t.artist_names(),
            })
            .collect(),
        not_found_queries: if not_found.is_empty() {
            None
        } else {
            Some(not_found)
        },
    })
}
