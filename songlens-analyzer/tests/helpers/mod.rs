//! Shared test utilities for songlens-analyzer

#![allow(dead_code, unused_imports)]

pub mod fake_spotify;
pub mod log_capture;

pub use fake_spotify::{artist_profile, track, CallLog, FakeSpotify};
pub use log_capture::{capture_logs, LogCapture};

use rand::rngs::StdRng;
use rand::SeedableRng;
use songlens_analyzer::{Analyzer, AnalyzerSettings, Services, SongDescriptor};
use std::sync::Arc;
use std::time::Duration;

/// Seeded analyzer over `fake`, with a short call deadline
pub fn analyzer_with(fake: Arc<FakeSpotify>) -> Analyzer {
    let settings = AnalyzerSettings {
        call_timeout: Duration::from_secs(2),
        ..AnalyzerSettings::default()
    };
    Analyzer::with_rng(Services::uniform(fake), settings, StdRng::seed_from_u64(1234))
}

pub fn song(name: &str, artist: Option<&str>) -> SongDescriptor {
    SongDescriptor::new(name, artist)
}
