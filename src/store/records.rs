use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::AppResult,
    models::{RatingMap, SearchHistory, WatchHistory},
    store::KeyValueStore,
};

/// The logical records persisted for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKey {
    Ratings,
    SearchHistory,
    WatchHistory,
}

impl RecordKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKey::Ratings => "user-ratings",
            RecordKey::SearchHistory => "search-history",
            RecordKey::WatchHistory => "watch-history",
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the user owns: ratings plus both history logs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    pub ratings: RatingMap,
    pub search_history: SearchHistory,
    pub watch_history: WatchHistory,
}

impl UserState {
    /// Reads all records once
    ///
    /// A record that is missing, unreadable or corrupt starts out empty.
    pub async fn load(store: &dyn KeyValueStore) -> Self {
        Self {
            ratings: load_record(store, RecordKey::Ratings).await,
            search_history: load_record(store, RecordKey::SearchHistory).await,
            watch_history: load_record(store, RecordKey::WatchHistory).await,
        }
    }
}

async fn load_record<T>(store: &dyn KeyValueStore, key: RecordKey) -> T
where
    T: DeserializeOwned + Default,
{
    match store.get(key.as_str()).await {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(record = %key, error = %e, "Stored record is corrupt, starting fresh");
                T::default()
            }
        },
        Ok(None) => {
            tracing::debug!(record = %key, "No stored record found, starting fresh");
            T::default()
        }
        Err(e) => {
            tracing::warn!(record = %key, backend = store.name(), error = %e, "Failed to read stored record, starting fresh");
            T::default()
        }
    }
}

/// Writes a whole record back to the store
pub async fn save_record<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: RecordKey,
    value: &T,
) -> AppResult<()> {
    let json = serde_json::to_string(value)?;
    store.set(key.as_str(), json).await
}

/// Writes a record, logging instead of failing
///
/// In-memory state stays authoritative when the backend is unavailable.
pub async fn persist<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: RecordKey, value: &T) {
    if let Err(e) = save_record(store, key, value).await {
        tracing::error!(record = %key, backend = store.name(), error = %e, "Failed to save record");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::SearchResult;
    use crate::store::{MemoryStore, MockKeyValueStore};
    use chrono::{TimeZone, Utc};

    fn populated_state() -> UserState {
        let mut state = UserState::default();
        state.ratings.rate("tt0133093", 5).unwrap();
        state.ratings.rate("tt0110912", 3).unwrap();

        let t1 = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let t2 = Utc.timestamp_millis_opt(1_700_000_060_000).unwrap();
        state.search_history.record("matrix", 10, t1);
        state.search_history.record("pulp fiction", 3, t2);
        state.watch_history.record(
            &SearchResult {
                id: "tt0133093".to_string(),
                title: "The Matrix".to_string(),
                year: "1999".to_string(),
                poster: Some("https://img/matrix.jpg".to_string()),
                title_type: "movie".to_string(),
            },
            t2,
        );
        state
    }

    #[tokio::test]
    async fn test_round_trip_all_records() {
        let store = MemoryStore::new();
        let state = populated_state();

        save_record(&store, RecordKey::Ratings, &state.ratings).await.unwrap();
        save_record(&store, RecordKey::SearchHistory, &state.search_history)
            .await
            .unwrap();
        save_record(&store, RecordKey::WatchHistory, &state.watch_history)
            .await
            .unwrap();

        let reloaded = UserState::load(&store).await;
        assert_eq!(reloaded, state);
    }

    #[tokio::test]
    async fn test_empty_store_loads_defaults() {
        let store = MemoryStore::new();
        assert_eq!(UserState::load(&store).await, UserState::default());
    }

    #[tokio::test]
    async fn test_corrupt_record_loads_default() {
        let store = MemoryStore::new();
        store
            .set("user-ratings", "{not json".to_string())
            .await
            .unwrap();
        store
            .set("search-history", r#"[{"query":"x","timestamp":1,"resultCount":2}]"#.to_string())
            .await
            .unwrap();

        let state = UserState::load(&store).await;
        assert!(state.ratings.is_empty());
        assert_eq!(state.search_history.len(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_ratings_dropped_on_load() {
        let store = MemoryStore::new();
        store
            .set("user-ratings", r#"{"tt1":9,"tt2":0,"tt3":5}"#.to_string())
            .await
            .unwrap();

        let state = UserState::load(&store).await;
        assert_eq!(state.ratings.len(), 1);
        assert_eq!(state.ratings.get("tt1"), None);
        assert_eq!(state.ratings.get("tt2"), None);
        assert_eq!(state.ratings.get("tt3"), Some(5));
    }

    #[tokio::test]
    async fn test_read_failure_loads_default() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .times(3)
            .returning(|_| Err(AppError::Internal("backend down".to_string())));
        store.expect_name().return_const("mock");

        let state = UserState::load(&store).await;
        assert_eq!(state, UserState::default());
    }

    #[tokio::test]
    async fn test_persist_swallows_write_failure() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_set()
            .times(1)
            .returning(|key, _| {
                assert_eq!(key, "watch-history");
                Err(AppError::Internal("disk full".to_string()))
            });
        store.expect_name().return_const("mock");

        persist(&store, RecordKey::WatchHistory, &WatchHistory::default()).await;
    }

    #[test]
    fn test_record_keys() {
        assert_eq!(RecordKey::Ratings.to_string(), "user-ratings");
        assert_eq!(RecordKey::SearchHistory.as_str(), "search-history");
        assert_eq!(RecordKey::WatchHistory.as_str(), "watch-history");
    }
}
