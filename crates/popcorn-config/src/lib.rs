pub mod config;
pub mod paths;

pub use config::{is_valid_storage_key, Config, OmdbConfig, SearchConfig, StorageConfig, API_KEY_ENV, API_KEY_PLACEHOLDER, DEFAULT_STORAGE_KEY};
pub use paths::{PathManager, container_base_path};
