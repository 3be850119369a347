use crate::request::{run_cancellable, RequestHandle, RequestSlot};
use popcorn_models::MovieDetail;
use popcorn_sources::MovieCatalog;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    pub id: Option<String>,
    pub detail: Option<MovieDetail>,
    pub loading: bool,
    pub error: Option<String>,
    pub request_id: Option<u64>,
}

impl DetailState {
    /// The loaded detail, if it belongs to `id`
    pub fn detail_for(&self, id: &str) -> Option<&MovieDetail> {
        match (&self.id, &self.detail) {
            (Some(current), Some(detail)) if current == id => Some(detail),
            _ => None,
        }
    }
}

/// Fetches extended metadata for the selected movie
///
/// Selecting a different movie while a fetch is in flight cancels the stale
/// fetch, so a slow response can never overwrite the movie on display.
/// Nothing is cached: reselecting an id fetches it again.
pub struct DetailFetcher {
    catalog: Arc<dyn MovieCatalog>,
    slot: RequestSlot,
    state: Arc<watch::Sender<DetailState>>,
}

impl DetailFetcher {
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        let (tx, _rx) = watch::channel(DetailState::default());
        Self {
            catalog,
            slot: RequestSlot::new(),
            state: Arc::new(tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> DetailState {
        self.state.borrow().clone()
    }

    pub fn fetch(&mut self, id: &str) -> RequestHandle {
        let (request_id, token) = self.slot.issue();
        self.state.send_modify(|s| {
            s.id = Some(id.to_string());
            s.detail = None;
            s.loading = true;
            s.error = None;
            s.request_id = Some(request_id);
        });

        let catalog = Arc::clone(&self.catalog);
        let state = Arc::clone(&self.state);
        let task_token = token.clone();
        let id = id.to_string();

        let task = tokio::spawn(async move {
            let Some(outcome) = run_cancellable(&task_token, catalog.get_detail(&id)).await else {
                debug!(request_id = request_id, id = id.as_str(), "Detail fetch superseded");
                return;
            };

            let failure = outcome.as_ref().err().map(|e| format!("{:?}", e));
            let applied = state.send_if_modified(|s| {
                if task_token.is_cancelled() || s.request_id != Some(request_id) {
                    return false;
                }
                s.loading = false;
                match outcome {
                    Ok(detail) => {
                        s.detail = Some(detail);
                        s.error = None;
                    }
                    Err(e) => {
                        s.detail = None;
                        s.error = Some(e.to_string());
                    }
                }
                true
            });

            match (applied, failure) {
                (false, _) => debug!(request_id = request_id, "Discarding stale detail"),
                (true, Some(error)) => warn!(id = id.as_str(), error = error.as_str(), "Detail fetch failed"),
                (true, None) => debug!(id = id.as_str(), "Detail loaded"),
            }
        });

        RequestHandle::new(request_id, token, task)
    }

    /// Cancel any fetch and forget the current movie
    pub fn clear(&mut self) {
        self.slot.cancel();
        self.state.send_if_modified(|s| {
            let changed = *s != DetailState::default();
            *s = DetailState::default();
            changed
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{movie_detail, FakeCatalog};

    #[tokio::test]
    async fn test_fetch_detail() {
        let catalog = Arc::new(FakeCatalog::new().with_detail(movie_detail("tt1375666", "Inception")));
        let mut fetcher = DetailFetcher::new(catalog);

        let handle = fetcher.fetch("tt1375666");
        let state = fetcher.state();
        assert!(state.loading);
        assert_eq!(state.id.as_deref(), Some("tt1375666"));
        handle.settled().await;

        let state = fetcher.state();
        assert!(!state.loading);
        assert_eq!(state.detail_for("tt1375666").unwrap().title, "Inception");
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_reselect_fetches_again() {
        let catalog = Arc::new(FakeCatalog::new().with_detail(movie_detail("tt1375666", "Inception")));
        let mut fetcher = DetailFetcher::new(catalog.clone());

        fetcher.fetch("tt1375666").settled().await;
        fetcher.fetch("tt1375666").settled().await;
        assert_eq!(catalog.calls(), 2);
    }

    #[tokio::test]
    async fn test_rapid_reselection_cancels_stale_fetch() {
        let catalog = Arc::new(
            FakeCatalog::new()
                .with_detail(movie_detail("tt1375666", "Inception"))
                .with_detail(movie_detail("tt0133093", "The Matrix"))
                .gated("tt1375666"),
        );
        let mut fetcher = DetailFetcher::new(catalog.clone());

        let stale = fetcher.fetch("tt1375666");
        let current = fetcher.fetch("tt0133093");
        assert!(stale.is_cancelled());

        current.settled().await;
        catalog.gate("tt1375666").notify_one();
        stale.settled().await;

        let state = fetcher.state();
        assert_eq!(state.id.as_deref(), Some("tt0133093"));
        assert_eq!(state.detail.unwrap().title, "The Matrix");
    }

    #[tokio::test]
    async fn test_unknown_id_sets_error() {
        let catalog = Arc::new(FakeCatalog::new());
        let mut fetcher = DetailFetcher::new(catalog);

        fetcher.fetch("tt0000000").settled().await;
        let state = fetcher.state();
        assert!(!state.loading);
        assert!(state.detail.is_none());
        assert_eq!(state.error.as_deref(), Some("Movie not found"));
    }

    #[tokio::test]
    async fn test_clear_cancels_and_resets() {
        let catalog = Arc::new(
            FakeCatalog::new()
                .with_detail(movie_detail("tt1375666", "Inception"))
                .gated("tt1375666"),
        );
        let mut fetcher = DetailFetcher::new(catalog.clone());

        let pending = fetcher.fetch("tt1375666");
        fetcher.clear();
        assert!(pending.is_cancelled());

        catalog.gate("tt1375666").notify_one();
        pending.settled().await;
        assert_eq!(fetcher.state(), DetailState::default());
    }

    #[test]
    fn test_detail_for_checks_id() {
        let state = DetailState {
            id: Some("tt1375666".to_string()),
            detail: Some(movie_detail("tt1375666", "Inception")),
            ..DetailState::default()
        };
        assert!(state.detail_for("tt1375666").is_some());
        assert!(state.detail_for("tt0133093").is_none());
    }
}
