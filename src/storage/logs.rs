use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::LogEntry;
use crate::storage::LogStore;

/// Append-only log store backed by `logs.json`. Entries are kept in
/// sequence order; nothing is ever updated or deleted.
pub struct JsonLogStore {
    file_path: PathBuf,
    cache: RwLock<Vec<LogEntry>>,
}

impl JsonLogStore {
    /// Create a new JsonLogStore, loading existing data from disk if present.
    /// A corrupted `logs.json` is backed up to `logs.json.bak` and the store
    /// starts empty, same recovery as the job store.
    pub async fn new(data_dir: PathBuf) -> Result<Self> {
        tokio::fs::create_dir_all(&data_dir)
            .await
            .context("Failed to create data directory")?;

        let file_path = data_dir.join("logs.json");

        let entries = if file_path.exists() {
            let content = tokio::fs::read_to_string(&file_path)
                .await
                .context("Failed to read logs.json")?;
            match serde_json::from_str::<Vec<LogEntry>>(&content) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!(
                        "logs.json is corrupted ({}), creating backup and starting empty",
                        e
                    );
                    let backup_path = data_dir.join("logs.json.bak");
                    if let Err(backup_err) = tokio::fs::copy(&file_path, &backup_path).await {
                        tracing::error!(
                            "Failed to create backup of corrupted logs.json: {}",
                            backup_err
                        );
                    }
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Ok(Self {
            file_path,
            cache: RwLock::new(entries),
        })
    }

    async fn persist(&self, entries: &[LogEntry]) -> Result<()> {
        let tmp_path = self.file_path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(entries).context("Failed to serialize logs")?;

        tokio::fs::write(&tmp_path, json.as_bytes())
            .await
            .context("Failed to write temporary logs file")?;

        tokio::fs::rename(&tmp_path, &self.file_path)
            .await
            .context("Failed to rename temporary logs file")?;

        Ok(())
    }
}

#[async_trait]
impl LogStore for JsonLogStore {
    async fn append(&self, job_id: Uuid, timestamp: DateTime<Utc>, message: String) -> Result<()> {
        let mut cache = self.cache.write().await;

        let seq = cache.last().map(|e| e.seq + 1).unwrap_or(1);
        cache.push(LogEntry {
            seq,
            job_id,
            timestamp,
            message,
        });

        self.persist(&cache).await?;
        Ok(())
    }

    async fn recent_for(&self, job_id: Uuid, limit: usize) -> Result<Vec<LogEntry>> {
        let cache = self.cache.read().await;
        let matching: Vec<LogEntry> = cache
            .iter()
            .filter(|e| e.job_id == job_id)
            .cloned()
            .collect();

        // Most recent `limit` entries, kept in oldest-to-newest order.
        let start = matching.len().saturating_sub(limit);
        Ok(matching[start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn setup_store() -> (JsonLogStore, TempDir) {
        let tmp_dir = TempDir::new().expect("create temp dir");
        let store = JsonLogStore::new(tmp_dir.path().to_path_buf())
            .await
            .expect("create store");
        (store, tmp_dir)
    }

    #[tokio::test]
    async fn test_append_and_read_in_order() {
        let (store, _tmp) = setup_store().await;
        let job_id = Uuid::new_v4();

        for i in 0..5 {
            store
                .append(job_id, Utc::now(), format!("line {}", i))
                .await
                .expect("append");
        }

        let entries = store.recent_for(job_id, 200).await.expect("recent");
        assert_eq!(entries.len(), 5);
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.message, format!("line {}", i));
        }
    }

    #[tokio::test]
    async fn test_seq_is_monotonic() {
        let (store, _tmp) = setup_store().await;
        let job_id = Uuid::new_v4();

        for i in 0..10 {
            store
                .append(job_id, Utc::now(), format!("line {}", i))
                .await
                .expect("append");
        }

        let entries = store.recent_for(job_id, 200).await.expect("recent");
        for pair in entries.windows(2) {
            assert!(pair[0].seq < pair[1].seq);
        }
    }

    #[tokio::test]
    async fn test_recent_for_caps_at_limit_keeping_newest() {
        let (store, _tmp) = setup_store().await;
        let job_id = Uuid::new_v4();

        for i in 0..10 {
            store
                .append(job_id, Utc::now(), format!("line {}", i))
                .await
                .expect("append");
        }

        let entries = store.recent_for(job_id, 3).await.expect("recent");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message, "line 7");
        assert_eq!(entries[2].message, "line 9");
    }

    #[tokio::test]
    async fn test_recent_for_unknown_job_is_empty() {
        let (store, _tmp) = setup_store().await;
        let entries = store
            .recent_for(Uuid::new_v4(), 200)
            .await
            .expect("recent");
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_entries_are_scoped_per_job() {
        let (store, _tmp) = setup_store().await;
        let job_a = Uuid::new_v4();
        let job_b = Uuid::new_v4();

        store
            .append(job_a, Utc::now(), "from a".to_string())
            .await
            .expect("append");
        store
            .append(job_b, Utc::now(), "from b".to_string())
            .await
            .expect("append");

        let entries = store.recent_for(job_a, 200).await.expect("recent");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "from a");
    }

    #[tokio::test]
    async fn test_persistence_across_instances() {
        let tmp_dir = TempDir::new().expect("create temp dir");
        let job_id = Uuid::new_v4();

        {
            let store = JsonLogStore::new(tmp_dir.path().to_path_buf())
                .await
                .expect("create store");
            store
                .append(job_id, Utc::now(), "persisted line".to_string())
                .await
                .expect("append");
        }

        {
            let store = JsonLogStore::new(tmp_dir.path().to_path_buf())
                .await
                .expect("create store");
            let entries = store.recent_for(job_id, 200).await.expect("recent");
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].message, "persisted line");
        }
    }

    #[tokio::test]
    async fn test_corrupted_logs_json_recovers_empty_with_backup() {
        let tmp_dir = TempDir::new().expect("create temp dir");
        let logs_file = tmp_dir.path().join("logs.json");
        tokio::fs::write(&logs_file, b"not json at all")
            .await
            .expect("write corrupted file");

        let store = JsonLogStore::new(tmp_dir.path().to_path_buf())
            .await
            .expect("create store");

        let entries = store.recent_for(Uuid::new_v4(), 200).await.expect("recent");
        assert!(entries.is_empty());
        assert!(tmp_dir.path().join("logs.json.bak").exists());
    }
}
