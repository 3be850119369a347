use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides `omdb.api_key`
pub const API_KEY_ENV: &str = "OMDB_API_KEY";
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY";
pub const DEFAULT_STORAGE_KEY: &str = "watched";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout; the API itself never gives up on a slow request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Queries shorter than this (after trimming) clear the results instead of searching
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Single key the watched list is stored under
    #[serde(default = "default_storage_key")]
    pub key: String,
    /// Overrides the platform data directory
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Storage keys name a single file: ASCII letters, digits, `-`, `_` and `.`,
/// not starting with a dot
pub fn is_valid_storage_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn default_base_url() -> String {
    "http://www.omdbapi.com/".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_min_query_len() -> usize {
    3
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: API_KEY_PLACEHOLDER.to_string(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: default_min_query_len(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
            dir: None,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file if present, fall back to defaults, then apply
    /// environment overrides
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        let config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            Self::default()
        };
        Ok(config.with_api_key_override(std::env::var(API_KEY_ENV).ok()))
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn with_api_key_override(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.omdb.api_key = key;
        }
        self
    }

    pub fn is_api_key_configured(&self) -> bool {
        let key = self.omdb.api_key.trim();
        !key.is_empty() && key != API_KEY_PLACEHOLDER
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.is_api_key_configured() {
            return Err(anyhow::anyhow!(
                "OMDb api_key is not configured (run `popcorn config api-key` or set {})",
                API_KEY_ENV
            ));
        }

        if !self.omdb.base_url.starts_with("http://") && !self.omdb.base_url.starts_with("https://") {
            return Err(anyhow::anyhow!("Invalid OMDb base_url: {}", self.omdb.base_url));
        }

        if self.omdb.timeout_secs == 0 {
            return Err(anyhow::anyhow!("timeout_secs must be greater than zero"));
        }

        if self.search.min_query_len == 0 {
            return Err(anyhow::anyhow!("min_query_len must be at least 1"));
        }

        if self.storage.key.trim().is_empty() {
            return Err(anyhow::anyhow!("storage key cannot be empty"));
        }

        if !is_valid_storage_key(&self.storage.key) {
            return Err(anyhow::anyhow!(
                "Invalid storage key '{}': use letters, digits, '-', '_' or '.'",
                self.storage.key
            ));
        }

        Ok(())
    }
}
