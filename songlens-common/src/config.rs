//! Configuration loading and resolution
//!
//! Configuration comes from three tiers, highest priority first:
//! 1. Environment variables (`SONGLENS_*`)
//! 2. TOML config file (`~/.config/songlens/config.toml` or an explicit path)
//! 3. Compiled defaults
//!
//! A missing TOML file is not an error: a warning is logged and compiled
//! defaults are used. A TOML file that exists but cannot be parsed is.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable holding the Spotify bearer access token
pub const ENV_ACCESS_TOKEN: &str = "SONGLENS_SPOTIFY_TOKEN";

/// Environment variable overriding the Spotify Web API base URL
pub const ENV_API_URL: &str = "SONGLENS_SPOTIFY_API_URL";

/// Environment variable overriding the configured log level
pub const ENV_LOG_LEVEL: &str = "SONGLENS_LOG_LEVEL";

const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// External catalog service settings
    #[serde(default)]
    pub spotify: SpotifyConfig,

    /// Aggregation and selection defaults
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Spotify Web API client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpotifyConfig {
    /// API base URL, without trailing slash
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Bearer access token. Obtaining it is the caller's business.
    #[serde(default)]
    pub access_token: Option<String>,

    /// HTTP client timeout for a single request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Minimum interval between two requests, in milliseconds
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Timeout applied by the analyzer around each collaborator call, in seconds
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Market used for artist top-track lookups
    #[serde(default = "default_market")]
    pub market: String,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            access_token: None,
            request_timeout_secs: default_request_timeout_secs(),
            min_request_interval_ms: default_min_request_interval_ms(),
            call_timeout_secs: default_call_timeout_secs(),
            market: default_market(),
        }
    }
}

/// Defaults for aggregation, selection and taste comparison
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Balanced selection size when the caller gives none
    #[serde(default = "default_target_size")]
    pub default_target_size: usize,

    /// Top-artist report length when the caller gives none
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Listening-history window (`short_term`, `medium_term`, `long_term`)
    #[serde(default = "default_taste_time_range")]
    pub taste_time_range: String,

    /// Number of top tracks / top artists fetched for taste comparison (max 50)
    #[serde(default = "default_taste_limit")]
    pub taste_limit: u32,

    /// Page size used when walking the saved-track library
    #[serde(default = "default_library_page_size")]
    pub library_page_size: u32,

    /// Fixed seed for selection shuffles. Unset means non-deterministic.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_target_size: default_target_size(),
            default_top_n: default_top_n(),
            taste_time_range: default_taste_time_range(),
            taste_limit: default_taste_limit(),
            library_page_size: default_library_page_size(),
            rng_seed: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_min_request_interval_ms() -> u64 {
    100
}

fn default_call_timeout_secs() -> u64 {
    10
}

fn default_market() -> String {
    "US".to_string()
}

fn default_target_size() -> usize {
    30
}

fn default_top_n() -> usize {
    10
}

fn default_taste_time_range() -> String {
    "medium_term".to_string()
}

fn default_taste_limit() -> u32 {
    50
}

fn default_library_page_size() -> u32 {
    50
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Platform config file location (`<config dir>/songlens/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("songlens").join("config.toml"))
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed for {}: {}", path.display(), e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed for {}: {}", path.display(), e)))
}

/// Load configuration with graceful degradation, then apply environment overrides
///
/// `path` of `None` means the platform default location. A missing file yields
/// compiled defaults plus a warning.
pub fn load_config(path: Option<&Path>) -> Result<TomlConfig> {
    let path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path(),
    };

    let mut config = match path {
        Some(ref p) if p.exists() => {
            let config = load_toml_config(p)?;
            info!("Loaded TOML configuration from {}", p.display());
            config
        }
        Some(ref p) => {
            warn!("Config file {} not found, using compiled defaults", p.display());
            TomlConfig::default()
        }
        None => {
            warn!("Could not determine config directory, using compiled defaults");
            TomlConfig::default()
        }
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

/// Overlay `SONGLENS_*` environment variables onto a loaded config
pub fn apply_env_overrides(config: &mut TomlConfig) {
    if let Ok(url) = std::env::var(ENV_API_URL) {
        if is_valid_key(&url) {
            info!("Spotify API base URL overridden from environment");
            config.spotify.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
    }

    if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
        if is_valid_key(&level) {
            config.logging.level = level.trim().to_string();
        }
    }
}

/// Resolve the Spotify access token
///
/// **Priority:** ENV → TOML
pub fn resolve_access_token(config: &TomlConfig) -> Result<String> {
    let env_token = std::env::var(ENV_ACCESS_TOKEN).ok().filter(|t| is_valid_key(t));
    let toml_token = config
        .spotify
        .access_token
        .as_ref()
        .filter(|t| is_valid_key(t));

    if env_token.is_some() && toml_token.is_some() {
        warn!(
            "Spotify access token found in both environment and TOML. Using environment (highest priority)."
        );
    }

    if let Some(token) = env_token {
        info!("Spotify access token loaded from environment variable");
        return Ok(token.trim().to_string());
    }

    if let Some(token) = toml_token {
        info!("Spotify access token loaded from TOML config");
        return Ok(token.trim().to_string());
    }

    Err(Error::Config(format!(
        "Spotify access token not configured. Please configure using one of:\n\
         1. Environment: {}=your-token\n\
         2. TOML config: ~/.config/songlens/config.toml ([spotify] access_token = \"your-token\")",
        ENV_ACCESS_TOKEN
    )))
}

/// Validate a configured secret or URL (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
