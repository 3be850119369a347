use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_USER_RATING: u8 = 1;
pub const MAX_USER_RATING: u8 = 10;

/// A movie the user has rated, persisted across sessions
///
/// Field names on disk follow the camelCase layout of the stored list so
/// lists written by earlier versions keep loading (`countRatingDecisions`
/// is accepted as an alias for the revision counter).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchedEntry {
    #[serde(rename = "imdbID")]
    pub id: String,
    pub title: String,
    pub year: String,
    #[serde(rename = "poster")]
    pub poster_url: String,
    pub imdb_rating: f64,
    #[serde(rename = "runtime")]
    pub runtime_minutes: u32,
    pub user_rating: u8, // 1-10
    /// How many times the rating was changed before the movie was added
    #[serde(default, alias = "countRatingDecisions")]
    pub rating_revision_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

impl WatchedEntry {
    pub fn is_valid_rating(rating: u8) -> bool {
        (MIN_USER_RATING..=MAX_USER_RATING).contains(&rating)
    }

    /// Whether the entry fits the data model: an id, a 1-10 user rating and
    /// an IMDb rating on the 0-10 scale
    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty()
            && Self::is_valid_rating(self.user_rating)
            && self.imdb_rating.is_finite()
            && (0.0..=10.0).contains(&self.imdb_rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(user_rating: u8, imdb_rating: f64) -> WatchedEntry {
        WatchedEntry {
            id: "tt1375666".to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            poster_url: String::new(),
            imdb_rating,
            runtime_minutes: 148,
            user_rating,
            rating_revision_count: 1,
            added_at: None,
        }
    }

    #[test]
    fn test_entry_validity() {
        assert!(entry(10, 8.8).is_valid());
        assert!(entry(1, 0.0).is_valid());
        assert!(!entry(0, 8.8).is_valid());
        assert!(!entry(11, 8.8).is_valid());
        assert!(!entry(9, 12.5).is_valid());
        assert!(!entry(9, f64::NAN).is_valid());

        let mut unnamed = entry(9, 8.8);
        unnamed.id = " ".to_string();
        assert!(!unnamed.is_valid());
    }

    #[test]
    fn test_deserialize_legacy_entry() {
        let json = r#"{
            "imdbID": "tt1375666",
            "title": "Inception",
            "year": "2010",
            "poster": "https://example.com/inception.jpg",
            "imdbRating": 8.8,
            "runtime": 148,
            "userRating": 10,
            "countRatingDecisions": 2
        }"#;

        let entry: WatchedEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, "tt1375666");
        assert_eq!(entry.runtime_minutes, 148);
        assert_eq!(entry.rating_revision_count, 2);
        assert_eq!(entry.added_at, None);
    }

    #[test]
    fn test_serialized_field_names() {
        let entry = WatchedEntry {
            id: "tt0133093".to_string(),
            title: "The Matrix".to_string(),
            year: "1999".to_string(),
            poster_url: "N/A".to_string(),
            imdb_rating: 8.7,
            runtime_minutes: 136,
            user_rating: 9,
            rating_revision_count: 1,
            added_at: None,
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["imdbID"], "tt0133093");
        assert_eq!(value["poster"], "N/A");
        assert_eq!(value["runtime"], 136);
        assert_eq!(value["userRating"], 9);
        assert_eq!(value["ratingRevisionCount"], 1);
        assert!(value.get("addedAt").is_none());
    }

    #[test]
    fn test_rating_bounds() {
        assert!(!WatchedEntry::is_valid_rating(0));
        assert!(WatchedEntry::is_valid_rating(1));
        assert!(WatchedEntry::is_valid_rating(10));
        assert!(!WatchedEntry::is_valid_rating(11));
    }
}
