//! songlens-analyzer: catalog resolution and collection analytics
//!
//! Resolves free-form song descriptors against the Spotify catalog and
//! reports on the resulting collection: explicit content, diversity, genre
//! and artist distributions, balanced subsets, and comparisons with the
//! caller's own listening history. It also summarizes existing playlists
//! and fetches seeded recommendations.
//!
//! Entry point is [`Analyzer`]; collaborators are injected through
//! [`Services`] so every operation can run against in-memory fakes.

pub mod analysis;
pub mod analyzer;
pub mod error;
pub mod selection;
pub mod services;
pub mod taste;
pub mod types;

pub use analyzer::{Analyzer, AnalyzerSettings, Services};
pub use error::{AnalyzerError, AnalyzerResult};
pub use types::SongDescriptor;
