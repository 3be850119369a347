use async_trait::async_trait;
use popcorn_models::{MovieDetail, SearchResult, WatchedEntry};
use popcorn_sources::{CatalogError, MovieCatalog};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

pub fn watched_entry(id: &str, imdb_rating: f64, user_rating: u8) -> WatchedEntry {
    WatchedEntry {
        id: id.to_string(),
        title: format!("Movie {}", id),
        year: "2010".to_string(),
        poster_url: format!("https://img.example.com/{}.jpg", id),
        imdb_rating,
        runtime_minutes: 120,
        user_rating,
        rating_revision_count: 1,
        added_at: None,
    }
}

pub fn search_result(id: &str, title: &str) -> SearchResult {
    SearchResult {
        id: id.to_string(),
        title: title.to_string(),
        year: "2010".to_string(),
        poster_url: format!("https://img.example.com/{}.jpg", id),
    }
}

pub fn movie_detail(id: &str, title: &str) -> MovieDetail {
    MovieDetail {
        id: id.to_string(),
        title: title.to_string(),
        year: "2010".to_string(),
        poster_url: format!("https://img.example.com/{}.jpg", id),
        runtime_minutes: Some(148),
        imdb_rating: Some(8.8),
        plot: "A thief who steals secrets through dreams.".to_string(),
        released: "16 Jul 2010".to_string(),
        actors: "Leonardo DiCaprio".to_string(),
        director: "Christopher Nolan".to_string(),
        genre: "Sci-Fi".to_string(),
    }
}

/// Scripted catalog; lookups for gated keys wait until the gate is notified
#[derive(Default)]
pub struct FakeCatalog {
    results: HashMap<String, Vec<SearchResult>>,
    details: HashMap<String, MovieDetail>,
    failing: HashSet<String>,
    gates: HashMap<String, Arc<Notify>>,
    calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, query: &str, results: Vec<SearchResult>) -> Self {
        self.results.insert(query.to_string(), results);
        self
    }

    pub fn with_detail(mut self, detail: MovieDetail) -> Self {
        self.details.insert(detail.id.clone(), detail);
        self
    }

    /// Lookups for `key` fail with an HTTP 500
    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    pub fn gated(mut self, key: &str) -> Self {
        self.gates.insert(key.to_string(), Arc::new(Notify::new()));
        self
    }

    pub fn gate(&self, key: &str) -> Arc<Notify> {
        Arc::clone(&self.gates[key])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self, key: &str) -> Result<(), CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = self.gates.get(key) {
            gate.notified().await;
        }
        if self.failing.contains(key) {
            return Err(CatalogError::Http {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MovieCatalog for FakeCatalog {
    fn source_name(&self) -> &str {
        "fake"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError> {
        self.enter(query).await?;
        self.results
            .get(query)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("Movie not found!"))
    }

    async fn get_detail(&self, id: &str) -> Result<MovieDetail, CatalogError> {
        self.enter(id).await?;
        self.details
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("Incorrect IMDb ID."))
    }
}
