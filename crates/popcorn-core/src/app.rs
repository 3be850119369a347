use crate::detail::DetailFetcher;
use crate::rating::InvalidRating;
use crate::request::RequestHandle;
use crate::search::SearchController;
use crate::storage::{KeyValueStore, StorageError};
use crate::view::{DetailView, ViewObserver};
use crate::watchlist::{AddOutcome, WatchlistStore};
use chrono::Utc;
use popcorn_config::Config;
use popcorn_models::{WatchedEntry, WatchedSummary};
use popcorn_sources::MovieCatalog;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No movie is open")]
    NoOpenView,

    #[error("Pick a rating before adding the movie")]
    NoRating,

    #[error("Movie details are not loaded yet")]
    DetailNotLoaded,

    #[error("You already rated this movie {rating}")]
    AlreadyWatched { id: String, rating: u8 },

    #[error("Can't add \"{title}\": its {field} is missing from the movie details")]
    IncompleteDetail { title: String, field: &'static str },

    #[error(transparent)]
    InvalidRating(#[from] InvalidRating),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Application state shared by the three components
///
/// The search controller, detail fetcher and watchlist never talk to each
/// other directly; the app hands state between them (selected id, query,
/// watched list) and owns the open detail view.
pub struct App {
    search: SearchController,
    detail: DetailFetcher,
    watchlist: WatchlistStore,
    view: Option<DetailView>,
    observers: Vec<Arc<dyn ViewObserver>>,
}

impl App {
    pub fn new(catalog: Arc<dyn MovieCatalog>, watchlist: WatchlistStore, min_query_len: usize) -> Self {
        Self {
            search: SearchController::new(Arc::clone(&catalog), min_query_len),
            detail: DetailFetcher::new(catalog),
            watchlist,
            view: None,
            observers: Vec::new(),
        }
    }

    /// Build from configuration, loading the watched list from `store`
    pub async fn from_config(
        config: &Config,
        catalog: Arc<dyn MovieCatalog>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let watchlist = WatchlistStore::load(store, config.storage.key.clone()).await;
        info!(
            source = catalog.source_name(),
            watched = watchlist.len(),
            "Session started"
        );
        Self::new(catalog, watchlist, config.search.min_query_len)
    }

    /// Register hooks for every detail view opened from now on
    pub fn add_observer(&mut self, observer: Arc<dyn ViewObserver>) {
        self.observers.push(observer);
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn detail(&self) -> &DetailFetcher {
        &self.detail
    }

    pub fn watchlist(&self) -> &WatchlistStore {
        &self.watchlist
    }

    pub fn watched(&self) -> &[WatchedEntry] {
        self.watchlist.entries()
    }

    pub fn summary(&self) -> WatchedSummary {
        self.watchlist.summary()
    }

    pub fn view(&self) -> Option<&DetailView> {
        self.view.as_ref()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.view.as_ref().map(|v| v.id())
    }

    /// A query that triggers a search also closes the open movie
    pub fn set_query(&mut self, query: &str) -> Option<RequestHandle> {
        if self.search.is_search_query(query) {
            self.close();
        }
        self.search.set_query(query)
    }

    /// Open a movie; selecting the movie that is already open closes it
    pub fn select(&mut self, id: &str) -> Option<RequestHandle> {
        if self.selected_id() == Some(id) {
            self.close();
            return None;
        }

        self.close();
        let handle = self.detail.fetch(id);
        self.view = Some(DetailView::open(id, self.observers.clone(), self.detail.subscribe()));
        Some(handle)
    }

    pub fn close(&mut self) {
        if let Some(view) = self.view.take() {
            drop(view);
            self.detail.clear();
        }
    }

    /// Rating the user gave the open movie, if it's already in the watched list
    pub fn watched_rating(&self) -> Option<u8> {
        self.selected_id()
            .and_then(|id| self.watchlist.get(id))
            .map(|e| e.user_rating)
    }

    /// Set the star rating on the open movie; returns the revision count so far
    pub fn rate(&mut self, rating: u8) -> Result<u32, AppError> {
        if let Some(existing) = self.watched_rating() {
            let id = self.selected_id().unwrap_or_default().to_string();
            return Err(AppError::AlreadyWatched { id, rating: existing });
        }

        let view = self.view.as_mut().ok_or(AppError::NoOpenView)?;
        view.rating_mut().set(rating)?;
        Ok(view.rating().revisions())
    }

    /// Commit the open movie and its rating to the watched list, then close it
    pub async fn add_watched(&mut self) -> Result<WatchedEntry, AppError> {
        let view = self.view.as_ref().ok_or(AppError::NoOpenView)?;
        if let Some(existing) = self.watchlist.get(view.id()) {
            return Err(AppError::AlreadyWatched {
                id: existing.id.clone(),
                rating: existing.user_rating,
            });
        }

        let user_rating = view.rating().rating().ok_or(AppError::NoRating)?;
        let state = self.detail.state();
        let detail = state.detail_for(view.id()).ok_or(AppError::DetailNotLoaded)?;

        let runtime_minutes = detail.runtime_minutes.ok_or_else(|| AppError::IncompleteDetail {
            title: detail.title.clone(),
            field: "runtime",
        })?;
        let imdb_rating = detail.imdb_rating.ok_or_else(|| AppError::IncompleteDetail {
            title: detail.title.clone(),
            field: "IMDb rating",
        })?;

        let entry = WatchedEntry {
            id: view.id().to_string(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster_url: detail.poster_url.clone(),
            imdb_rating,
            runtime_minutes,
            user_rating,
            rating_revision_count: view.rating().revisions(),
            added_at: Some(Utc::now()),
        };

        match self.watchlist.add(entry.clone()).await? {
            AddOutcome::Added => {}
            AddOutcome::AlreadyWatched => {
                return Err(AppError::AlreadyWatched {
                    id: entry.id,
                    rating: entry.user_rating,
                });
            }
        }

        self.close();
        Ok(entry)
    }

    pub async fn remove_watched(&mut self, id: &str) -> Result<bool, AppError> {
        Ok(self.watchlist.remove(id).await?)
    }
}
