use popcorn_models::WatchedEntry;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rating must be between 1 and 10, got {0}")]
pub struct InvalidRating(pub u8);

/// Star rating state for one open detail view
///
/// Counts how many times the rating changed before the movie is added.
/// Picking the rating that is already selected is not a change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingSession {
    rating: Option<u8>,
    revisions: u32,
}

impl RatingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the rating changed
    pub fn set(&mut self, rating: u8) -> Result<bool, InvalidRating> {
        if !WatchedEntry::is_valid_rating(rating) {
            return Err(InvalidRating(rating));
        }
        if self.rating == Some(rating) {
            return Ok(false);
        }
        self.rating = Some(rating);
        self.revisions += 1;
        Ok(true)
    }

    pub fn rating(&self) -> Option<u8> {
        self.rating
    }

    pub fn revisions(&self) -> u32 {
        self.revisions
    }
}
