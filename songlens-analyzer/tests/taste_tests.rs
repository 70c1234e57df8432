//! Taste Comparison & Library Check Integration Tests

mod helpers;

use helpers::{analyzer_with, artist_profile, song, track, FakeSpotify};
use songlens_analyzer::types::TrackRecord;
use songlens_analyzer::AnalyzerError;
use std::sync::Arc;

fn taste_fake() -> FakeSpotify {
    FakeSpotify::new()
        // Favorite track, not by a favorite artist
        .with_track("Loved", track("1", "Loved", &[("s", "Stranger")], false, None))
        // By a favorite artist
        .with_track("Fan Pick", track("2", "Fan Pick", &[("r", "Regular")], false, None))
        // Both at once
        .with_track("Anthem", track("3", "Anthem", &[("r", "Regular")], false, None))
        // Neither
        .with_track("Fresh", track("4", "Fresh", &[("n", "Newcomer")], false, None))
        .with_track("Other", track("5", "Other", &[("n", "Newcomer")], false, None))
        .with_artist("s", "Stranger", &["ambient"])
        .with_artist("r", "Regular", &["synthpop", "new wave"])
        .with_artist("n", "Newcomer", &["hyperpop"])
        .with_history(
            vec![
                track("x1", "LOVED", &[("q", "Someone")], false, None),
                track("x2", "anthem", &[("r", "Regular")], false, None),
            ],
            vec![
                artist_profile("r", "regular", &["synthpop", "new wave"]),
                artist_profile("k", "Known", &["post-punk", "darkwave"]),
            ],
        )
}

#[tokio::test]
async fn test_taste_classification_and_union_property() {
    let fake = Arc::new(taste_fake());
    let analyzer = analyzer_with(fake.clone());

    let songs: Vec<_> = ["Loved", "Fan Pick", "Anthem", "Fresh", "Other", "Missing"]
        .iter()
        .map(|n| song(n, None))
        .collect();
    let report = analyzer.compare_taste(&songs).await.unwrap();

    assert_eq!(report.summary.total_analyzed, 5);
    assert_eq!(report.matches.favorite_tracks_count, 2);
    assert_eq!(report.matches.favorite_artists_count, 2);
    assert_eq!(report.matches.non_matching_count, 2);

    // non_matching == total - |favorite tracks ∪ favorite artists|; Anthem is in both
    let mut union: Vec<&str> = report
        .matches
        .favorite_tracks
        .iter()
        .chain(report.matches.favorite_artists.iter())
        .map(|s| s.name.as_str())
        .collect();
    union.sort();
    union.dedup();
    assert_eq!(union.len(), 3);
    assert_eq!(
        report.matches.non_matching_count,
        report.summary.total_analyzed - union.len()
    );

    // (2 + 2) / 5
    assert_eq!(report.summary.match_percentage, 80.0);
    assert!(report.summary.alignment.starts_with("Strong Match"));
    assert_eq!(report.summary.errors, Some(vec!["Not found: Missing".to_string()]));

    assert_eq!(report.overlaps.artist_overlap, 1);
    assert_eq!(report.overlaps.genre_overlap, 2);
    assert_eq!(
        report.insights.missing_from_your_taste,
        vec!["darkwave", "post-punk"]
    );
    assert_eq!(
        report.insights.new_genres_in_collection,
        vec!["ambient", "hyperpop"]
    );
    let explore: Vec<&str> = report
        .insights
        .songs_to_explore
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(explore, vec!["Fresh", "Other"]);

    let anthem = &report.matches.favorite_tracks[1];
    assert!(anthem.is_favorite_track && anthem.is_favorite_artist);
    assert_eq!(anthem.genres, vec!["new wave", "synthpop"]);

    assert_eq!(fake.calls().history_calls, 2);
}

#[tokio::test]
async fn test_match_percentage_is_clamped() {
    // Every track is both a favorite track and by a favorite artist
    let fake = FakeSpotify::new()
        .with_track("Anthem", track("3", "Anthem", &[("r", "Regular")], false, None))
        .with_history(
            vec![track("x", "Anthem", &[("r", "Regular")], false, None)],
            vec![artist_profile("r", "Regular", &[])],
        );
    let analyzer = analyzer_with(Arc::new(fake));

    let report = analyzer.compare_taste(&[song("Anthem", None)]).await.unwrap();

    assert_eq!(report.matches.favorite_tracks_count, 1);
    assert_eq!(report.matches.favorite_artists_count, 1);
    assert_eq!(report.summary.match_percentage, 100.0);
}

#[tokio::test]
async fn test_taste_with_nothing_resolved() {
    let fake = Arc::new(taste_fake());
    let analyzer = analyzer_with(fake);

    let report = analyzer.compare_taste(&[song("Nope", None)]).await.unwrap();

    assert_eq!(report.summary.total_analyzed, 0);
    assert_eq!(report.summary.match_percentage, 0.0);
    assert!(report.summary.alignment.starts_with("Low Match"));
    assert_eq!(report.overlaps.artist_overlap, 0);
    assert_eq!(report.insights.missing_from_your_taste.len(), 4);
}

#[tokio::test]
async fn test_taste_invalid_input_skips_history() {
    let fake = Arc::new(taste_fake());
    let analyzer = analyzer_with(fake.clone());

    let result = analyzer.compare_taste(&[]).await;

    assert!(matches!(result, Err(AnalyzerError::InvalidInput(_))));
    assert_eq!(fake.calls().history_calls, 0);
}

fn saved_library(count: usize) -> Vec<TrackRecord> {
    (0..count)
        .map(|i| track(&format!("s{}", i), &format!("Saved {}", i), &[("a", "A")], false, None))
        .collect()
}

#[tokio::test]
async fn test_library_pagination_stops_on_short_page() {
    let fake = FakeSpotify::new()
        .with_saved(saved_library(120))
        .with_track("Saved 7", track("s7", "Saved 7", &[("a", "A")], false, None))
        .with_track("Saved 119", track("s119", "Saved 119", &[("a", "A")], false, None))
        .with_track("Fresh", track("f", "Fresh", &[("a", "A")], false, None));
    let fake = Arc::new(fake);
    let analyzer = analyzer_with(fake.clone());

    let report = analyzer
        .find_missing(&[
            song("Saved 7", None),
            song("Fresh", None),
            song("Saved 119", None),
            song("Gone", None),
        ])
        .await
        .unwrap();

    assert_eq!(fake.calls().saved_pages, vec![(50, 0), (50, 50), (50, 100)]);
    assert_eq!(report.summary.total_songs_checked, 3);
    assert_eq!(report.summary.already_saved, 2);
    assert_eq!(report.summary.missing_from_library, 1);
    assert_eq!(report.summary.missing_percentage, 33.3);
    assert_eq!(report.missing_songs[0].id, "f");
    assert_eq!(
        report.missing_songs[0].url.as_deref(),
        Some("https://open.spotify.com/track/f")
    );
    assert_eq!(report.summary.errors, Some(vec!["Not found: Gone".to_string()]));
}

#[tokio::test]
async fn test_library_pagination_stops_on_empty_page() {
    let fake = FakeSpotify::new()
        .with_saved(saved_library(100))
        .with_track("Fresh", track("f", "Fresh", &[("a", "A")], false, None));
    let fake = Arc::new(fake);
    let analyzer = analyzer_with(fake.clone());

    let report = analyzer.find_missing(&[song("Fresh", None)]).await.unwrap();

    assert_eq!(fake.calls().saved_pages, vec![(50, 0), (50, 50), (50, 100)]);
    assert_eq!(report.summary.missing_percentage, 100.0);
}

#[tokio::test]
async fn test_library_check_with_empty_library() {
    let fake = FakeSpotify::new()
        .with_track("Fresh", track("f", "Fresh", &[("a", "A")], false, None));
    let fake = Arc::new(fake);
    let analyzer = analyzer_with(fake.clone());

    let report = analyzer.find_missing(&[song("Fresh", None)]).await.unwrap();

    assert_eq!(fake.calls().saved_pages.len(), 1);
    assert_eq!(report.summary.already_saved, 0);
    assert_eq!(report.summary.missing_from_library, 1);
    assert!(report.summary.errors.is_none());
}
