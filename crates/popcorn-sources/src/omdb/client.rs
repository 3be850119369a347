use crate::error::CatalogError;
use crate::omdb::api;
use crate::traits::MovieCatalog;
use async_trait::async_trait;
use popcorn_config::OmdbConfig;
use popcorn_models::{MovieDetail, SearchResult};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(config: &OmdbConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("popcorn/", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!(
            base_url = config.base_url.as_str(),
            timeout_secs = config.timeout_secs,
            "OMDb client ready"
        );

        Ok(Self {
            client: Arc::new(client),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MovieCatalog for OmdbClient {
    fn source_name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError> {
        api::search_movies(&self.client, &self.base_url, &self.api_key, query).await
    }

    async fn get_detail(&self, id: &str) -> Result<MovieDetail, CatalogError> {
        api::get_movie(&self.client, &self.base_url, &self.api_key, id).await
    }
}
