//! File locations and API settings.
//!
//! Nothing in the library reads a global path: the cache and the credential
//! resolver take their locations from an [`AppPaths`], so callers (and tests)
//! can point them anywhere.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory under the user's home holding config and cache.
pub const APP_DIR_NAME: &str = ".dataforseo-skill";

/// Environment variable checked for the API key.
pub const API_KEY_ENV: &str = "DATAFORSEO_API_KEY";

/// Default DataForSEO endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://api.dataforseo.com";

/// How long cached keyword research stays valid.
pub const CACHE_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Where the credential config file and the keyword cache live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// JSON file holding `{"api_key": ...}`.
    pub config_file: PathBuf,
    /// Directory with one JSON file per cached query.
    pub cache_dir: PathBuf,
}

impl AppPaths {
    /// Lay out config and cache under `root`.
    pub fn under<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self { config_file: root.join("config.json"), cache_dir: root.join("cache") }
    }

    /// `~/.dataforseo-skill/{config.json,cache}`, or relative to the working
    /// directory when no home directory is known.
    pub fn default_location() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::under(home.join(APP_DIR_NAME))
    }

    /// Replace the config file location.
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = path.as_ref().to_path_buf();
        self
    }

    /// Replace the cache directory.
    pub fn with_cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = path.as_ref().to_path_buf();
        self
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::default_location()
    }
}

/// Settings for calls to the DataForSEO API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Endpoint root, without a trailing slash.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Google Ads location code (2840 = United States).
    pub location_code: u32,
    /// Language code for keyword metrics.
    pub language_code: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: 30,
            location_code: 2840,
            language_code: "en".to_string(),
        }
    }
}
