pub mod app;
pub mod detail;
pub mod rating;
pub mod request;
pub mod search;
pub mod storage;
pub mod view;
pub mod watchlist;

#[cfg(test)]
mod test_support;

pub use app::{App, AppError};
pub use detail::{DetailFetcher, DetailState};
pub use rating::{InvalidRating, RatingSession};
pub use request::{RequestHandle, RequestSlot};
pub use search::{SearchController, SearchState};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use view::{DetailView, ViewObserver};
pub use watchlist::{AddOutcome, WatchlistStore};
