pub mod config;
pub mod interactive;
pub mod prompts;
pub mod rate;
pub mod search;
pub mod show;
pub mod watched;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use popcorn_config::{Config, PathManager};
use popcorn_core::{App, FileStore, KeyValueStore, RequestHandle, WatchlistStore};
use popcorn_sources::OmdbClient;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Where the CLI reads its config and keeps its data for this invocation
pub struct Session {
    config_file: PathBuf,
    paths: PathManager,
}

impl Session {
    /// An explicit config path roots the data directory next to it
    pub fn new(config_path: Option<PathBuf>) -> Self {
        match config_path {
            Some(path) => {
                let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
                Self {
                    config_file: path,
                    paths: PathManager::with_base(&base),
                }
            }
            None => {
                let paths = PathManager::default();
                Self {
                    config_file: paths.config_file(),
                    paths,
                }
            }
        }
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn load_config(&self) -> Result<Config> {
        Config::load_or_default(&self.config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", self.config_file.display(), e))
    }

    pub fn storage_dir(&self, config: &Config) -> PathBuf {
        config
            .storage
            .dir
            .clone()
            .unwrap_or_else(|| self.paths.storage_dir())
    }

    fn open_store(&self, config: &Config) -> Result<Arc<dyn KeyValueStore>> {
        let dir = self.storage_dir(config);
        debug!("Using storage directory {}", dir.display());
        let store = FileStore::new(dir.clone())
            .map_err(|e| eyre!("Failed to open storage at {}: {}", dir.display(), e))?;
        Ok(Arc::new(store))
    }

    /// The watched list alone; needs no API key
    pub async fn open_watchlist(&self) -> Result<WatchlistStore> {
        let config = self.load_config()?;
        let store = self.open_store(&config)?;
        Ok(WatchlistStore::load(store, config.storage.key.clone()).await)
    }

    pub async fn open_app(&self) -> Result<App> {
        let config = self.load_config()?;
        config.validate().map_err(|e| eyre!("{}", e))?;

        let catalog = OmdbClient::new(&config.omdb)
            .map_err(|e| eyre!("Failed to create OMDb client: {}", e))?;
        let store = self.open_store(&config)?;
        Ok(App::from_config(&config, Arc::new(catalog), store).await)
    }
}

/// Wait for a request while showing a spinner in human mode
pub async fn wait_for(handle: RequestHandle, message: &str, output: &crate::output::Output) {
    let spinner = crate::spinner::Spinner::start(message, output);
    handle.settled().await;
    spinner.finish();
}
