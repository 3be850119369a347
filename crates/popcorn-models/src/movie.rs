use serde::{Deserialize, Serialize};

/// Full metadata for one movie, fetched when a search result is opened
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    /// `None` when the API reports "N/A" or the runtime can't be parsed
    pub runtime_minutes: Option<u32>,
    /// `None` when the API reports "N/A"
    pub imdb_rating: Option<f64>,
    pub plot: String,
    pub released: String,
    pub actors: String,
    pub director: String,
    pub genre: String,
}

impl MovieDetail {
    /// Human-readable runtime, e.g. "148 min"
    pub fn runtime_label(&self) -> String {
        self.runtime_minutes
            .map(|m| format!("{} min", m))
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn imdb_rating_label(&self) -> String {
        self.imdb_rating
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| "N/A".to_string())
    }
}
