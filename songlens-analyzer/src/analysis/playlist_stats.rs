//! Popularity and explicit-content stats of an existing playlist

use super::{percentage, round_to};
use crate::types::PlaylistDetails;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistStats {
    pub average_popularity: f64,
    pub explicit_songs: usize,
    pub explicit_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistAnalysisReport {
    pub name: String,
    pub description: Option<String>,
    pub owner: Option<String>,
    pub total_tracks: u32,
    pub followers: u64,
    pub stats: PlaylistStats,
    pub external_url: Option<String>,
}

/// Stats over the playlist's playable tracks; all zero when there are none
pub fn analyze_playlist(playlist: &PlaylistDetails) -> PlaylistAnalysisReport {
    let tracks = &playlist.tracks;
    let explicit_songs = tracks.iter().filter(|t| t.explicit).count();
    let average_popularity = if tracks.is_empty() {
        0.0
    } else {
        tracks.iter().map(|t| f64::from(t.popularity)).sum::<f64>() / tracks.len() as f64
    };

    PlaylistAnalysisReport {
        name: playlist.name.clone(),
        description: playlist.description.clone(),
        owner: playlist.owner.clone(),
        total_tracks: playlist.total_tracks,
        followers: playlist.followers,
        stats: PlaylistStats {
            average_popularity: round_to(average_popularity, 1),
            explicit_songs,
            explicit_percentage: round_to(percentage(explicit_songs, tracks.len()), 1),
        },
        external_url: playlist.external_url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrackRecord;

    fn track(popularity: u32, explicit: bool) -> TrackRecord {
        TrackRecord {
            id: format!("t{}", popularity),
            name: "Song".to_string(),
            artists: Vec::new(),
            album: String::new(),
            popularity,
            explicit,
            release_year: None,
            uri: String::new(),
            external_url: None,
        }
    }

    fn playlist(tracks: Vec<TrackRecord>) -> PlaylistDetails {
        PlaylistDetails {
            id: "pl".to_string(),
            name: "Mix".to_string(),
            description: None,
            owner: Some("Listener".to_string()),
            total_tracks: tracks.len() as u32 + 1,
            followers: 3,
            external_url: None,
            tracks,
        }
    }

    #[test]
    fn test_stats_round_to_one_decimal() {
        let report = analyze_playlist(&playlist(vec![
            track(50, true),
            track(61, false),
            track(70, false),
        ]));

        // 181 / 3 = 60.33
        assert_eq!(report.stats.average_popularity, 60.3);
        assert_eq!(report.stats.explicit_songs, 1);
        assert_eq!(report.stats.explicit_percentage, 33.3);
        assert_eq!(report.total_tracks, 4);
    }

    #[test]
    fn test_empty_playlist_stats_are_zero() {
        let report = analyze_playlist(&playlist(Vec::new()));

        assert_eq!(report.stats.average_popularity, 0.0);
        assert_eq!(report.stats.explicit_percentage, 0.0);
        assert_eq!(report.owner.as_deref(), Some("Listener"));
    }
}
