use crate::request::{run_cancellable, RequestHandle, RequestSlot};
use popcorn_models::SearchResult;
use popcorn_sources::{CatalogError, MovieCatalog};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// What the display layer renders for the search pane
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub loading: bool,
    pub error: Option<String>,
    /// Request whose outcome this state is waiting for (or last applied)
    pub request_id: Option<u64>,
}

/// Owns the query and the single outstanding search request
///
/// Each call to [`set_query`](Self::set_query) supersedes the previous one:
/// the earlier request is cancelled and its outcome, should it still arrive,
/// is discarded. State changes are published on a watch channel.
///
/// Issuing a request spawns onto the current Tokio runtime.
pub struct SearchController {
    catalog: Arc<dyn MovieCatalog>,
    min_query_len: usize,
    slot: RequestSlot,
    state: Arc<watch::Sender<SearchState>>,
}

impl SearchController {
    pub fn new(catalog: Arc<dyn MovieCatalog>, min_query_len: usize) -> Self {
        let (tx, _rx) = watch::channel(SearchState::default());
        Self {
            catalog,
            min_query_len,
            slot: RequestSlot::new(),
            state: Arc::new(tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn min_query_len(&self) -> usize {
        self.min_query_len
    }

    /// Whether `query` is long enough to trigger a lookup
    pub fn is_search_query(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.min_query_len
    }

    /// Evaluate a new query value
    ///
    /// Short queries clear the results and return `None` without touching
    /// the network.
    pub fn set_query(&mut self, query: &str) -> Option<RequestHandle> {
        if !self.is_search_query(query) {
            self.slot.cancel();
            self.state.send_modify(|s| {
                s.query = query.to_string();
                s.results.clear();
                s.error = None;
                s.loading = false;
                s.request_id = None;
            });
            return None;
        }

        let (id, token) = self.slot.issue();
        self.state.send_modify(|s| {
            s.query = query.to_string();
            s.loading = true;
            s.error = None;
            s.request_id = Some(id);
        });

        let catalog = Arc::clone(&self.catalog);
        let state = Arc::clone(&self.state);
        let task_token = token.clone();
        let lookup = query.trim().to_string();

        let task = tokio::spawn(async move {
            let Some(outcome) = run_cancellable(&task_token, catalog.search(&lookup)).await else {
                debug!(request_id = id, query = lookup.as_str(), "Search superseded");
                return;
            };

            let (results, error) = match outcome {
                Ok(results) if results.is_empty() => {
                    (Vec::new(), Some(CatalogError::NotFound { reason: None }))
                }
                Ok(results) => (results, None),
                Err(e) => (Vec::new(), Some(e)),
            };

            let applied = state.send_if_modified(|s| {
                if task_token.is_cancelled() || s.request_id != Some(id) {
                    return false;
                }
                s.loading = false;
                s.results = results;
                s.error = error.as_ref().map(|e| e.to_string());
                true
            });

            if !applied {
                debug!(request_id = id, "Discarding stale search outcome");
                return;
            }

            match error {
                Some(e) if e.is_not_found() => {
                    debug!(query = lookup.as_str(), "No movies matched");
                }
                Some(e) => {
                    warn!(query = lookup.as_str(), error = ?e, "Search failed");
                }
                None => {
                    debug!(request_id = id, query = lookup.as_str(), "Search results applied");
                }
            }
        });

        Some(RequestHandle::new(id, token, task))
    }

    /// Cancel any outstanding search and stop reporting it as loading
    pub fn cancel(&mut self) {
        self.slot.cancel();
        self.state.send_if_modified(|s| {
            let changed = s.loading;
            s.loading = false;
            s.request_id = None;
            changed
        });
    }
}
