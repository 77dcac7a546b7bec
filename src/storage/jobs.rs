use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::CrawlboardError;
use crate::models::CrawlJob;
use crate::storage::JobStore;

pub struct JsonJobStore {
    file_path: PathBuf,
    cache: RwLock<Vec<CrawlJob>>,
}

impl JsonJobStore {
    /// Create a new JsonJobStore, loading existing data from disk if present.
    ///
    /// If `jobs.json` is corrupted (invalid JSON), creates a backup at
    /// `jobs.json.bak`, logs a warning, and starts with an empty job list.
    pub async fn new(data_dir: PathBuf) -> Result<Self> {
        tokio::fs::create_dir_all(&data_dir)
            .await
            .context("Failed to create data directory")?;

        let file_path = data_dir.join("jobs.json");

        let jobs = if file_path.exists() {
            let content = tokio::fs::read_to_string(&file_path)
                .await
                .context("Failed to read jobs.json")?;
            match serde_json::from_str::<Vec<CrawlJob>>(&content) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!(
                        "jobs.json is corrupted ({}), creating backup and starting empty",
                        e
                    );
                    let backup_path = data_dir.join("jobs.json.bak");
                    if let Err(backup_err) = tokio::fs::copy(&file_path, &backup_path).await {
                        tracing::error!(
                            "Failed to create backup of corrupted jobs.json: {}",
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
            cache: RwLock::new(jobs),
        })
    }

    /// Atomically write the jobs cache to disk.
    /// Writes to a .tmp file first, then renames to the actual file.
    async fn persist(&self, jobs: &[CrawlJob]) -> Result<()> {
        let tmp_path = self.file_path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(jobs).context("Failed to serialize jobs")?;

        tokio::fs::write(&tmp_path, json.as_bytes())
            .await
            .context("Failed to write temporary jobs file")?;

        tokio::fs::rename(&tmp_path, &self.file_path)
            .await
            .context("Failed to rename temporary jobs file")?;

        Ok(())
    }
}

#[async_trait]
impl JobStore for JsonJobStore {
    async fn create(&self, job: CrawlJob) -> Result<CrawlJob> {
        let mut cache = self.cache.write().await;
        cache.push(job.clone());
        self.persist(&cache).await?;
        Ok(job)
    }

    async fn get(&self, id: Uuid) -> Result<Option<CrawlJob>> {
        let cache = self.cache.read().await;
        Ok(cache.iter().find(|j| j.id == id).cloned())
    }

    async fn save(&self, job: CrawlJob) -> Result<()> {
        let mut cache = self.cache.write().await;

        let idx = cache.iter().position(|j| j.id == job.id).ok_or_else(|| {
            CrawlboardError::NotFound(format!("Job with id '{}' not found", job.id))
        })?;

        cache[idx] = job;
        self.persist(&cache).await?;

        Ok(())
    }

    async fn latest(&self) -> Result<Option<CrawlJob>> {
        let cache = self.cache.read().await;
        // Ties on created_at resolve to the most recently inserted record.
        Ok(cache.iter().max_by_key(|j| j.created_at).cloned())
    }
}
