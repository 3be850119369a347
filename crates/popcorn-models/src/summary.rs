use serde::{Deserialize, Serialize};
use crate::watched::WatchedEntry;

/// Aggregate statistics over the watched list
///
/// Averages are `None` for an empty list and render as "N/A".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_imdb_rating: Option<f64>,
    pub avg_user_rating: Option<f64>,
    pub avg_runtime_minutes: Option<f64>,
}

fn average(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

impl WatchedSummary {
    pub fn from_entries(entries: &[WatchedEntry]) -> Self {
        Self {
            count: entries.len(),
            avg_imdb_rating: average(entries.iter().map(|e| e.imdb_rating)),
            avg_user_rating: average(entries.iter().map(|e| e.user_rating as f64)),
            avg_runtime_minutes: average(entries.iter().map(|e| e.runtime_minutes as f64)),
        }
    }

    /// Format an average with two decimals, or "N/A" when there is no data
    pub fn label(value: Option<f64>) -> String {
        value
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "N/A".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, imdb_rating: f64, user_rating: u8, runtime_minutes: u32) -> WatchedEntry {
        WatchedEntry {
            id: id.to_string(),
            title: id.to_string(),
            year: "2010".to_string(),
            poster_url: String::new(),
            imdb_rating,
            runtime_minutes,
            user_rating,
            rating_revision_count: 0,
            added_at: None,
        }
    }

    #[test]
    fn test_summary_averages() {
        let entries = vec![entry("tt1375666", 8.8, 10, 148), entry("tt0088763", 8.5, 9, 116)];
        let summary = WatchedSummary::from_entries(&entries);

        assert_eq!(summary.count, 2);
        assert!((summary.avg_imdb_rating.unwrap() - 8.65).abs() < 1e-9);
        assert!((summary.avg_user_rating.unwrap() - 9.5).abs() < 1e-9);
        assert!((summary.avg_runtime_minutes.unwrap() - 132.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_empty_list() {
        let summary = WatchedSummary::from_entries(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.avg_imdb_rating, None);
        assert_eq!(summary.avg_user_rating, None);
        assert_eq!(summary.avg_runtime_minutes, None);
        assert_eq!(WatchedSummary::label(summary.avg_imdb_rating), "N/A");
    }

    #[test]
    fn test_label_formatting() {
        assert_eq!(WatchedSummary::label(Some(8.65)), "8.65");
        assert_eq!(WatchedSummary::label(Some(132.0)), "132.00");
    }
}
