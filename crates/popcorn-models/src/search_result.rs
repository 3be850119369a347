use serde::{Deserialize, Serialize};

/// A lightweight movie record returned by a title search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: String, // IMDb id, e.g. "tt1375666"
    pub title: String,
    pub year: String, // Kept as text: series report ranges like "2008–2013"
    pub poster_url: String,
}
