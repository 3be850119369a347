use crate::storage::{KeyValueStore, StorageError};
use popcorn_models::{WatchedEntry, WatchedSummary};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// An entry with the same id already exists; nothing was written
    AlreadyWatched,
}

/// The user's rated movies, written through to storage on every change
///
/// The whole list is rewritten under a single key after each mutation. A
/// mutation that fails to persist is rolled back so memory and storage never
/// diverge.
pub struct WatchlistStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    entries: Vec<WatchedEntry>,
}

impl WatchlistStore {
    /// Read the stored list once; absent or malformed data yields an empty list
    pub async fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();

        let read_store = Arc::clone(&store);
        let read_key = key.clone();
        let raw = match tokio::task::spawn_blocking(move || read_store.get(&read_key)).await {
            Ok(result) => result,
            Err(e) => Err(StorageError::Task(e.to_string())),
        };

        let entries = match raw {
            Ok(Some(content)) => Self::parse(&key, &content),
            Ok(None) => {
                debug!("No watched list stored under '{}', starting empty", key);
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to read watched list '{}': {}. Starting empty.", key, e);
                Vec::new()
            }
        };

        Self { store, key, entries }
    }

    fn parse(key: &str, content: &str) -> Vec<WatchedEntry> {
        match serde_json::from_str::<Vec<WatchedEntry>>(content) {
            Ok(entries) => {
                let stored = entries.len();
                let entries: Vec<WatchedEntry> = entries.into_iter().filter(WatchedEntry::is_valid).collect();
                if entries.len() < stored {
                    warn!(
                        "Watched list '{}' contained {} invalid entries; dropping them",
                        key,
                        stored - entries.len()
                    );
                }

                let mut seen = HashSet::new();
                let total = entries.len();
                let unique: Vec<WatchedEntry> = entries
                    .into_iter()
                    .filter(|e| seen.insert(e.id.clone()))
                    .collect();
                if unique.len() < total {
                    warn!(
                        "Watched list '{}' contained {} duplicate ids; keeping the first of each",
                        key,
                        total - unique.len()
                    );
                }
                info!("Loaded watched list '{}' ({} movies)", key, unique.len());
                unique
            }
            Err(e) => {
                warn!("Stored watched list '{}' is malformed: {}. Starting empty.", key, e);
                Vec::new()
            }
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn entries(&self) -> &[WatchedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&WatchedEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn summary(&self) -> WatchedSummary {
        WatchedSummary::from_entries(&self.entries)
    }

    pub async fn add(&mut self, entry: WatchedEntry) -> Result<AddOutcome, StorageError> {
        if self.contains(&entry.id) {
            debug!("'{}' is already in the watched list", entry.id);
            return Ok(AddOutcome::AlreadyWatched);
        }

        let id = entry.id.clone();
        self.entries.push(entry);
        if let Err(e) = self.persist().await {
            self.entries.pop();
            return Err(e);
        }

        info!("Added '{}' to watched list ({} movies)", id, self.entries.len());
        Ok(AddOutcome::Added)
    }

    /// Returns `false` when no entry had this id
    pub async fn remove(&mut self, id: &str) -> Result<bool, StorageError> {
        let Some(index) = self.entries.iter().position(|e| e.id == id) else {
            return Ok(false);
        };

        let removed = self.entries.remove(index);
        if let Err(e) = self.persist().await {
            self.entries.insert(index, removed);
            return Err(e);
        }

        info!("Removed '{}' from watched list ({} movies)", id, self.entries.len());
        Ok(true)
    }

    async fn persist(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.entries).map_err(|source| StorageError::Serialize {
            key: self.key.clone(),
            source,
        })?;

        let store = Arc::clone(&self.store);
        let key = self.key.clone();
        tokio::task::spawn_blocking(move || store.set(&key, &json))
            .await
            .map_err(|e| StorageError::Task(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use crate::test_support::watched_entry;

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            self.get(key).map(|_| ())
        }
    }

    fn stored_entries(store: &MemoryStore, key: &str) -> Vec<WatchedEntry> {
        let raw = store.get(key).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_load_absent_key_is_empty() {
        let list = WatchlistStore::load(Arc::new(MemoryStore::new()), "watched").await;
        assert!(list.is_empty());
        assert_eq!(list.key(), "watched");
    }

    #[tokio::test]
    async fn test_load_malformed_data_is_empty() {
        let store = Arc::new(MemoryStore::with_value("watched", "{not json"));
        let list = WatchlistStore::load(store, "watched").await;
        assert!(list.is_empty());

        let store = Arc::new(MemoryStore::with_value("watched", r#"[{"title": "missing fields"}]"#));
        let list = WatchlistStore::load(store, "watched").await;
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_load_unreadable_store_is_empty() {
        let list = WatchlistStore::load(Arc::new(FailingStore), "watched").await;
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_add_writes_through() {
        let store = Arc::new(MemoryStore::new());
        let mut list = WatchlistStore::load(store.clone(), "watched").await;

        let outcome = list.add(watched_entry("tt1375666", 8.8, 10)).await.unwrap();
        assert_eq!(outcome, AddOutcome::Added);
        assert_eq!(stored_entries(&store, "watched"), list.entries());

        list.add(watched_entry("tt0088763", 8.5, 9)).await.unwrap();
        assert_eq!(stored_entries(&store, "watched"), list.entries());
        assert_eq!(store.writes(), 2);
    }

    #[tokio::test]
    async fn test_add_duplicate_is_noop() {
        let store = Arc::new(MemoryStore::new());
        let mut list = WatchlistStore::load(store.clone(), "watched").await;

        list.add(watched_entry("tt1375666", 8.8, 10)).await.unwrap();
        let outcome = list.add(watched_entry("tt1375666", 8.8, 3)).await.unwrap();

        assert_eq!(outcome, AddOutcome::AlreadyWatched);
        assert_eq!(list.len(), 1);
        assert_eq!(list.get("tt1375666").unwrap().user_rating, 10);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn test_add_then_remove_restores_list() {
        let store = Arc::new(MemoryStore::new());
        let mut list = WatchlistStore::load(store.clone(), "watched").await;
        list.add(watched_entry("tt0133093", 8.7, 9)).await.unwrap();
        let before: Vec<String> = list.entries().iter().map(|e| e.id.clone()).collect();

        list.add(watched_entry("tt1375666", 8.8, 10)).await.unwrap();
        assert!(list.remove("tt1375666").await.unwrap());

        let after: Vec<String> = list.entries().iter().map(|e| e.id.clone()).collect();
        assert_eq!(before, after);
        assert_eq!(stored_entries(&store, "watched"), list.entries());
    }

    #[tokio::test]
    async fn test_remove_unknown_id() {
        let store = Arc::new(MemoryStore::new());
        let mut list = WatchlistStore::load(store.clone(), "watched").await;
        assert!(!list.remove("tt0000000").await.unwrap());
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back() {
        let mut list = WatchlistStore::load(Arc::new(FailingStore), "watched").await;
        assert!(list.add(watched_entry("tt1375666", 8.8, 10)).await.is_err());
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_summary_over_list() {
        let mut list = WatchlistStore::load(Arc::new(MemoryStore::new()), "watched").await;
        assert_eq!(list.summary().avg_imdb_rating, None);

        list.add(watched_entry("tt1375666", 8.8, 10)).await.unwrap();
        list.add(watched_entry("tt0088763", 8.5, 9)).await.unwrap();

        let summary = list.summary();
        assert_eq!(summary.count, 2);
        assert!((summary.avg_imdb_rating.unwrap() - 8.65).abs() < 1e-9);
        assert!((summary.avg_user_rating.unwrap() - 9.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_round_trip_through_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path()).unwrap());

        let mut list = WatchlistStore::load(Arc::clone(&store), "watched").await;
        list.add(watched_entry("tt0133093", 8.7, 9)).await.unwrap();
        list.add(watched_entry("tt1375666", 8.8, 10)).await.unwrap();
        list.add(watched_entry("tt0088763", 8.5, 7)).await.unwrap();

        let reloaded = WatchlistStore::load(store, "watched").await;
        assert_eq!(reloaded.entries(), list.entries());
    }

    #[tokio::test]
    async fn test_load_drops_out_of_range_entries() {
        let mut zero_rating = watched_entry("tt0133093", 8.7, 9);
        zero_rating.user_rating = 0;
        let entries = vec![
            zero_rating,
            watched_entry("tt1375666", 8.8, 10),
            watched_entry("tt0088763", 42.0, 7),
        ];
        let store = Arc::new(MemoryStore::with_value(
            "watched",
            &serde_json::to_string(&entries).unwrap(),
        ));

        let list = WatchlistStore::load(store, "watched").await;
        assert_eq!(list.len(), 1);
        assert_eq!(list.entries()[0].id, "tt1375666");
        assert_eq!(list.entries()[0].user_rating, 10);
    }

    #[tokio::test]
    async fn test_load_drops_duplicate_ids() {
        let entries = vec![
            watched_entry("tt1375666", 8.8, 10),
            watched_entry("tt1375666", 8.8, 4),
        ];
        let store = Arc::new(MemoryStore::with_value(
            "watched",
            &serde_json::to_string(&entries).unwrap(),
        ));

        let list = WatchlistStore::load(store, "watched").await;
        assert_eq!(list.len(), 1);
        assert_eq!(list.entries()[0].user_rating, 10);
    }
}
