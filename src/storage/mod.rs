pub mod jobs;
pub mod logs;
pub mod users;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{CrawlJob, LogEntry, User};

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn create(&self, job: CrawlJob) -> Result<CrawlJob>;
    async fn get(&self, id: Uuid) -> Result<Option<CrawlJob>>;
    /// Full overwrite of the record identified by `job.id`.
    async fn save(&self, job: CrawlJob) -> Result<()>;
    /// The most recently created job, if any.
    async fn latest(&self) -> Result<Option<CrawlJob>>;
}

#[async_trait]
pub trait LogStore: Send + Sync {
    async fn append(&self, job_id: Uuid, timestamp: DateTime<Utc>, message: String) -> Result<()>;
    /// Up to `limit` most recent entries for a job, oldest to newest.
    async fn recent_for(&self, job_id: Uuid, limit: usize) -> Result<Vec<LogEntry>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: User) -> Result<User>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}
