pub mod movie;
pub mod search_result;
pub mod summary;
pub mod watched;

pub use movie::MovieDetail;
pub use search_result::SearchResult;
pub use summary::WatchedSummary;
pub use watched::{WatchedEntry, MAX_USER_RATING, MIN_USER_RATING};
