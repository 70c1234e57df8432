//! Analyzer facade
//!
//! Owns the injected collaborators and the random source. Every operation
//! builds a fresh resolver and genre cache, so nothing mutable is shared
//! between invocations and one `Analyzer` can serve concurrent callers.

use crate::analysis::{
    self, DiversityReport, ExplicitnessReport, GenreReport, PlaylistAnalysisReport,
    TopArtistsReport,
};
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::selection::{self, BalanceCriteria, BalancedSelectionReport, PlaylistCreationReport};
use crate::services::catalog_lookup::{self, ArtistInfoReport, TrackSearchResult};
use crate::services::{
    call_with_timeout, validate_descriptors, ArtistGenreCache, SpotifyClient, TrackResolver,
};
use crate::taste::{self, MissingReport, TasteProfile, TasteReport};
use crate::types::{
    ArtistLookup, CatalogSearch, NewPlaylist, PlaylistReader, PlaylistWriter,
    RecommendationSeeds, Recommender, SongDescriptor, TimeRange, UserHistory, UserLibrary,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use songlens_common::config::{resolve_access_token, TomlConfig};
use songlens_common::Error as CommonError;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;

/// Collaborator bundle injected into the analyzer
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<dyn CatalogSearch>,
    pub artists: Arc<dyn ArtistLookup>,
    pub history: Arc<dyn UserHistory>,
    pub library: Arc<dyn UserLibrary>,
    pub playlists: Arc<dyn PlaylistWriter>,
    pub playlist_reader: Arc<dyn PlaylistReader>,
    pub recommender: Arc<dyn Recommender>,
}

impl Services {
    /// Use one implementation for every collaborator role
    pub fn uniform<T>(service: Arc<T>) -> Self
    where
        T: CatalogSearch
            + ArtistLookup
            + UserHistory
            + UserLibrary
            + PlaylistWriter
            + PlaylistReader
            + Recommender
            + 'static,
    {
        Self {
            catalog: service.clone(),
            artists: service.clone(),
            history: service.clone(),
            library: service.clone(),
            playlists: service.clone(),
            playlist_reader: service.clone(),
            recommender: service,
        }
    }

    pub fn from_client(client: Arc<SpotifyClient>) -> Self {
        Self::uniform(client)
    }
}

/// Per-operation defaults and limits
#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    /// Deadline for each collaborator call
    pub call_timeout: Duration,
    pub default_target_size: usize,
    pub default_top_n: usize,
    pub taste_time_range: TimeRange,
    pub taste_limit: u32,
    pub library_page_size: u32,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(10),
            default_target_size: 30,
            default_top_n: 10,
            taste_time_range: TimeRange::MediumTerm,
            taste_limit: 50,
            library_page_size: 50,
        }
    }
}

impl AnalyzerSettings {
    /// Settings from the `[spotify]` and `[analysis]` sections
    ///
    /// A zero call timeout, page size, target size or top N is a `Config`
    /// error.
    pub fn from_config(config: &TomlConfig) -> AnalyzerResult<Self> {
        let taste_time_range = config
            .analysis
            .taste_time_range
            .parse::<TimeRange>()
            .map_err(CommonError::Config)?;

        for (key, value) in [
            ("spotify.call_timeout_secs", config.spotify.call_timeout_secs),
            ("analysis.library_page_size", u64::from(config.analysis.library_page_size)),
            ("analysis.default_target_size", config.analysis.default_target_size as u64),
            ("analysis.default_top_n", config.analysis.default_top_n as u64),
        ] {
            if value == 0 {
                return Err(CommonError::Config(format!("{} must be at least 1", key)).into());
            }
        }

        Ok(Self {
            call_timeout: Duration::from_secs(config.spotify.call_timeout_secs),
            default_target_size: config.analysis.default_target_size,
            default_top_n: config.analysis.default_top_n,
            taste_time_range,
            taste_limit: config.analysis.taste_limit.clamp(1, 50),
            library_page_size: config.analysis.library_page_size,
        })
    }
}

pub struct Analyzer {
    services: Services,
    settings: AnalyzerSettings,
    rng: Mutex<StdRng>,
}

impl Analyzer {
    /// Analyzer with an entropy-seeded random source
    pub fn new(services: Services, settings: AnalyzerSettings) -> Self {
        Self::with_rng(services, settings, StdRng::from_entropy())
    }

    pub fn with_rng(services: Services, settings: AnalyzerSettings, rng: StdRng) -> Self {
        Self {
            services,
            settings,
            rng: Mutex::new(rng),
        }
    }

    /// Analyzer backed by the Spotify client described in `config`
    ///
    /// Fails when no access token is configured.
    pub fn from_config(config: &TomlConfig) -> AnalyzerResult<Self> {
        let token = resolve_access_token(config)?;
        let client = SpotifyClient::from_config(&config.spotify, token)?;
        let settings = AnalyzerSettings::from_config(config)?;

        let rng = match config.analysis.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            api_base_url = %client.base_url(),
            call_timeout = ?settings.call_timeout,
            seeded = config.analysis.rng_seed.is_some(),
            "Analyzer configured"
        );

        Ok(Self::with_rng(Services::from_client(Arc::new(client)), settings, rng))
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    fn resolver(&self) -> TrackResolver {
        TrackResolver::new(self.services.catalog.clone(), self.settings.call_timeout)
    }

    fn genre_cache(&self) -> ArtistGenreCache {
        ArtistGenreCache::new(self.services.artists.clone(), self.settings.call_timeout)
    }

    pub async fn analyze_explicitness(
        &self,
        songs: &[SongDescriptor],
    ) -> AnalyzerResult<ExplicitnessReport> {
        let collection = self.resolver().resolve_all(songs).await?;
        let report = analysis::analyze_explicitness(&collection);

        info!(
            resolved = report.summary.total_songs_analyzed,
            explicit_percentage = report.summary.explicit_percentage,
            "Explicitness analysis complete"
        );
        Ok(report)
    }

    pub async fn analyze_diversity(&self, songs: &[SongDescriptor]) -> AnalyzerResult<DiversityReport> {
        let collection = self.resolver().resolve_all(songs).await?;
        let mut cache = self.genre_cache();
        let report = analysis::analyze_diversity(&collection, &mut cache).await?;

        info!(
            resolved = report.summary.total_songs,
            level = %report.summary.diversity_level,
            artists_looked_up = cache.len(),
            "Diversity analysis complete"
        );
        Ok(report)
    }

    pub async fn analyze_genres(&self, songs: &[SongDescriptor]) -> AnalyzerResult<GenreReport> {
        let collection = self.resolver().resolve_all(songs).await?;
        let mut cache = self.genre_cache();
        let report = analysis::analyze_genres(&collection, &mut cache).await?;

        info!(
            resolved = report.summary.total_songs_analyzed,
            unique_genres = report.summary.unique_genres,
            dominant_style = %report.summary.dominant_style,
            "Genre analysis complete"
        );
        Ok(report)
    }

    pub async fn top_artists(
        &self,
        songs: &[SongDescriptor],
        top_n: Option<usize>,
    ) -> AnalyzerResult<TopArtistsReport> {
        let top_n = top_n.unwrap_or(self.settings.default_top_n);
        if top_n == 0 {
            return Err(AnalyzerError::InvalidInput(
                "top_n must be at least 1".to_string(),
            ));
        }

        let collection = self.resolver().resolve_all(songs).await?;
        let report = analysis::top_artists(&collection, top_n);

        info!(
            resolved = report.summary.total_songs_analyzed,
            unique_artists = report.summary.unique_artists,
            "Top artist analysis complete"
        );
        Ok(report)
    }

    /// Balanced subset, optionally published as a private playlist
    pub async fn balanced_selection(
        &self,
        songs: &[SongDescriptor],
        target_size: Option<usize>,
        balance_criteria: Option<&str>,
        playlist_name: Option<&str>,
    ) -> AnalyzerResult<BalancedSelectionReport> {
        let criteria = match balance_criteria {
            Some(raw) => raw.parse::<BalanceCriteria>()?,
            None => BalanceCriteria::default(),
        };
        let target_size = target_size.unwrap_or(self.settings.default_target_size);
        if target_size == 0 {
            return Err(AnalyzerError::InvalidInput(
                "target_size must be at least 1".to_string(),
            ));
        }

        let collection = self.resolver().resolve_all(songs).await?;
        let mut cache = self.genre_cache();
        let candidates = selection::build_candidates(&collection, &mut cache).await?;

        let selected = {
            let mut rng = self
                .rng
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            selection::select_balanced(&candidates, target_size, criteria, &mut *rng)
        };

        let mut report =
            selection::selection_report(&collection, &candidates, &selected, target_size, criteria);

        if let Some(name) = playlist_name.filter(|n| !n.trim().is_empty()) {
            let playlist = NewPlaylist {
                name: name.to_string(),
                public: false,
                description: format!("Balanced by {}", criteria),
            };
            let created = selection::publish_playlist(
                self.services.playlists.as_ref(),
                &playlist,
                &report.uris(),
                self.settings.call_timeout,
            )
            .await?;
            report.playlist_created = Some(created);
        }

        info!(
            criteria = %criteria,
            source = report.summary.source_songs,
            selected = report.summary.selected_songs,
            target = target_size,
            "Balanced selection complete"
        );
        Ok(report)
    }

    pub async fn compare_taste(&self, songs: &[SongDescriptor]) -> AnalyzerResult<TasteReport> {
        validate_descriptors(songs)?;

        let profile = TasteProfile::fetch(
            self.services.history.as_ref(),
            self.settings.taste_limit,
            self.settings.taste_time_range,
            self.settings.call_timeout,
        )
        .await?;

        let collection = self.resolver().resolve_all(songs).await?;
        let mut cache = self.genre_cache();
        let report = taste::compare_taste(&collection, &mut cache, &profile).await?;

        info!(
            resolved = report.summary.total_analyzed,
            match_percentage = report.summary.match_percentage,
            "Taste comparison complete"
        );
        Ok(report)
    }

    pub async fn find_missing(&self, songs: &[SongDescriptor]) -> AnalyzerResult<MissingReport> {
        validate_descriptors(songs)?;

        let saved = taste::saved_track_ids(
            self.services.library.as_ref(),
            self.settings.library_page_size,
            self.settings.call_timeout,
        )
        .await?;

        let collection = self.resolver().resolve_all(songs).await?;
        let report = taste::find_missing(&collection, &saved);

        info!(
            checked = report.summary.total_songs_checked,
            missing = report.summary.missing_from_library,
            "Library check complete"
        );
        Ok(report)
    }

    /// Resolve `songs`, then publish every match as a new playlist
    pub async fn create_playlist(
        &self,
        playlist_name: &str,
        songs: &[SongDescriptor],
        description: Option<&str>,
        public: bool,
    ) -> AnalyzerResult<PlaylistCreationReport> {
        if playlist_name.trim().is_empty() {
            return Err(AnalyzerError::InvalidInput(
                "playlist_name must not be empty".to_string(),
            ));
        }

        let collection = self.resolver().resolve_all(songs).await?;
        let playlist = NewPlaylist {
            name: playlist_name.to_string(),
            public,
            description: description.unwrap_or_default().to_string(),
        };

        let report = selection::create_playlist_from(
            &collection,
            self.services.playlists.as_ref(),
            &playlist,
            self.settings.call_timeout,
        )
        .await?;

        info!(
            playlist_id = %report.playlist.id,
            added = report.summary.songs_added,
            not_found = report.summary.not_found,
            "Playlist creation complete"
        );
        Ok(report)
    }

    pub async fn search_tracks(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> AnalyzerResult<Vec<TrackSearchResult>> {
        catalog_lookup::search_tracks(
            self.services.catalog.as_ref(),
            query,
            limit,
            self.settings.call_timeout,
        )
        .await
    }

    pub async fn recommendations(
        &self,
        seeds: &RecommendationSeeds,
        limit: Option<u32>,
    ) -> AnalyzerResult<Vec<TrackSearchResult>> {
        catalog_lookup::recommendations(
            self.services.recommender.as_ref(),
            seeds,
            limit,
            self.settings.call_timeout,
        )
        .await
    }

    /// Popularity and explicit-content stats of an existing playlist
    pub async fn analyze_playlist(&self, playlist_id: &str) -> AnalyzerResult<PlaylistAnalysisReport> {
        let playlist_id = playlist_id.trim();
        if playlist_id.is_empty() {
            return Err(AnalyzerError::InvalidInput(
                "playlist_id must not be empty".to_string(),
            ));
        }

        let playlist = call_with_timeout(
            self.settings.call_timeout,
            self.services.playlist_reader.playlist(playlist_id),
        )
        .await?;
        let report = analysis::analyze_playlist(&playlist);

        info!(
            playlist_id = %playlist_id,
            tracks = playlist.tracks.len(),
            explicit_percentage = report.stats.explicit_percentage,
            "Playlist analysis complete"
        );
        Ok(report)
    }

    pub async fn artist_info(&self, artist_id: &str) -> AnalyzerResult<ArtistInfoReport> {
        catalog_lookup::artist_info(
            self.services.artists.as_ref(),
            artist_id,
            self.settings.call_timeout,
        )
        .await
    }
}
