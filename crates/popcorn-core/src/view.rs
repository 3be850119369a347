use crate::detail::DetailState;
use crate::rating::RatingSession;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Hooks that run while a detail view is open
///
/// `on_open` is where global listeners get registered (window title,
/// shortcuts); `on_close` runs exactly once per opened view on every exit
/// path, including the owning app being dropped.
pub trait ViewObserver: Send + Sync {
    fn on_open(&self, id: &str, detail: watch::Receiver<DetailState>);
    fn on_close(&self, id: &str);
}

/// An open detail view: the selected id, its rating session and the
/// observers registered for its lifetime
pub struct DetailView {
    id: String,
    rating: RatingSession,
    observers: Vec<Arc<dyn ViewObserver>>,
}

impl DetailView {
    pub(crate) fn open(
        id: &str,
        observers: Vec<Arc<dyn ViewObserver>>,
        detail: watch::Receiver<DetailState>,
    ) -> Self {
        debug!(id = id, observers = observers.len(), "Opening detail view");
        for observer in &observers {
            observer.on_open(id, detail.clone());
        }
        Self {
            id: id.to_string(),
            rating: RatingSession::new(),
            observers,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rating(&self) -> &RatingSession {
        &self.rating
    }

    pub(crate) fn rating_mut(&mut self) -> &mut RatingSession {
        &mut self.rating
    }
}

impl Drop for DetailView {
    fn drop(&mut self) {
        debug!(id = self.id.as_str(), "Closing detail view");
        for observer in self.observers.iter().rev() {
            observer.on_close(&self.id);
        }
    }
}
