use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SearchResult;

/// Most search-history entries kept
pub const SEARCH_HISTORY_CAP: usize = 20;

/// Most watch-history entries kept
pub const WATCH_HISTORY_CAP: usize = 50;

/// One recorded search, newest first in the log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryEntry {
    pub query: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub result_count: usize,
}

/// One title the user picked from search results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchHistoryEntry {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Most-recent-first log of searches, deduplicated by exact query text
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SearchHistory(Vec<SearchHistoryEntry>);

impl SearchHistory {
    pub fn record(&mut self, query: &str, result_count: usize, now: DateTime<Utc>) {
        self.0.retain(|entry| entry.query != query);
        self.0.insert(
            0,
            SearchHistoryEntry {
                query: query.to_string(),
                timestamp: now,
                result_count,
            },
        );
        self.0.truncate(SEARCH_HISTORY_CAP);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn entries(&self) -> &[SearchHistoryEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Most-recent-first log of picked titles, deduplicated by identifier
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct WatchHistory(Vec<WatchHistoryEntry>);

impl WatchHistory {
    pub fn record(&mut self, result: &SearchResult, now: DateTime<Utc>) {
        self.0.retain(|entry| entry.id != result.id);
        self.0.insert(
            0,
            WatchHistoryEntry {
                id: result.id.clone(),
                title: result.title.clone(),
                year: result.year.clone(),
                poster: result.poster.clone(),
                timestamp: now,
            },
        );
        self.0.truncate(WATCH_HISTORY_CAP);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn entries(&self) -> &[WatchHistoryEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Short human-readable age of a timestamp relative to `now`
///
/// Minutes under an hour, hours under a day, days under a week, and the
/// calendar date beyond that.
pub fn relative_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);

    if elapsed.num_minutes() < 60 {
        format!("{}m ago", elapsed.num_minutes().max(0))
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed.num_days() < 7 {
        format!("{}d ago", elapsed.num_days())
    } else {
        timestamp.format("%Y-%m-%d").to_string()
    }
}
