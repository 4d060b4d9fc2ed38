//! Capped search-history log.
//!
//! Stands in for the browser's local storage: an append-only list that keeps
//! only the newest entries. Nothing reads it back except diagnostics.

use std::collections::VecDeque;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::Result;

// == History Entry ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryEntry {
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl SearchHistoryEntry {
    pub fn new(keyword: impl Into<String>, user_id: Option<String>) -> Self {
        Self {
            keyword: keyword.into(),
            user_id,
            timestamp: Utc::now(),
        }
    }
}

// == Search History ==
/// Storage for tracked searches.
#[async_trait]
pub trait SearchHistory: Send + Sync {
    /// Appends an entry, dropping the oldest beyond the cap.
    async fn append(&self, entry: SearchHistoryEntry) -> Result<()>;

    /// Stored entries, oldest first.
    async fn entries(&self) -> Result<Vec<SearchHistoryEntry>>;
}

// == Memory History ==
/// In-process history.
#[derive(Debug)]
pub struct MemoryHistory {
    entries: Mutex<VecDeque<SearchHistoryEntry>>,
    cap: usize,
}

impl MemoryHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(cap)),
            cap,
        }
    }
}

#[async_trait]
impl SearchHistory for MemoryHistory {
    async fn append(&self, entry: SearchHistoryEntry) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.push_back(entry);
        while entries.len() > self.cap {
            entries.pop_front();
        }
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<SearchHistoryEntry>> {
        Ok(self.entries.lock().await.iter().cloned().collect())
    }
}

// == File History ==
/// History kept as a JSON array on disk.
///
/// Every append rewrites the whole file. A missing or unreadable file is
/// treated as empty.
#[derive(Debug)]
pub struct FileHistory {
    path: PathBuf,
    cap: usize,
    // Serialises read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileHistory {
    pub fn new(path: impl Into<PathBuf>, cap: usize) -> Self {
        Self {
            path: path.into(),
            cap,
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Vec<SearchHistoryEntry> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }
}

#[async_trait]
impl SearchHistory for FileHistory {
    async fn append(&self, entry: SearchHistoryEntry) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await;
        entries.push(entry);
        if entries.len() > self.cap {
            let excess = entries.len() - self.cap;
            entries.drain(..excess);
        }
        let bytes = serde_json::to_vec(&entries)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<SearchHistoryEntry>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_history_caps_oldest_first() {
        let history = MemoryHistory::new(3);
        for i in 0..5 {
            history
                .append(SearchHistoryEntry::new(format!("kw{}", i), None))
                .await
                .unwrap();
        }

        let keywords: Vec<_> = history
            .entries()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.keyword)
            .collect();
        assert_eq!(keywords, vec!["kw2", "kw3", "kw4"]);
    }

    #[tokio::test]
    async fn test_file_history_persists_and_caps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let history = FileHistory::new(&path, 2);

        for kw in ["cook", "driver", "welder"] {
            history
                .append(SearchHistoryEntry::new(kw, Some("u1".into())))
                .await
                .unwrap();
        }

        // A fresh handle reads what the first one wrote
        let reopened = FileHistory::new(&path, 2);
        let entries = reopened.entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].keyword, "driver");
        assert_eq!(entries[1].keyword, "welder");
        assert_eq!(entries[1].user_id.as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn test_file_history_corrupt_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let history = FileHistory::new(&path, 10);
        assert!(history.entries().await.unwrap().is_empty());

        history
            .append(SearchHistoryEntry::new("plumber", None))
            .await
            .unwrap();
        assert_eq!(history.entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_file_history_missing_dir_errors() {
        let dir = tempfile::tempdir().unwrap();
        let history = FileHistory::new(dir.path().join("nope/history.json"), 10);

        let result = history.append(SearchHistoryEntry::new("cook", None)).await;
        assert!(result.is_err());
    }
}
