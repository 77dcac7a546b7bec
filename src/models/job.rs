use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CrawlboardError;

pub const MIN_DEPTH: i32 = 1;
pub const MAX_DEPTH: i32 = 10;
pub const DEFAULT_SPEED: &str = "medium";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
}

/// One crawl run's state record. Overwritten in place after every runner
/// step; only the runner mutates a job once it leaves QUEUED.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrawlJob {
    pub id: Uuid,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub status: JobStatus,
    pub progress: u32,
    pub pages_visited: u32,
    pub pages_queued: u32,
    pub errors: u32,
    pub avg_response_ms: u32,
    pub max_depth: u32,
    pub restrict_to_domain: bool,
    pub speed: String,
    pub extract_metadata: bool,
}

impl CrawlJob {
    /// Build a fresh QUEUED job from a validated request. Depth is clamped
    /// into [1, 10] rather than rejected; a blank speed becomes "medium".
    pub fn new(request: &CrawlRequest) -> Self {
        let speed = match request.speed.as_deref() {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            _ => DEFAULT_SPEED.to_string(),
        };

        Self {
            id: Uuid::new_v4(),
            url: request.url.trim().to_string(),
            created_at: Utc::now(),
            status: JobStatus::Queued,
            progress: 0,
            pages_visited: 0,
            pages_queued: 0,
            errors: 0,
            avg_response_ms: 0,
            max_depth: request.max_depth.clamp(MIN_DEPTH, MAX_DEPTH) as u32,
            restrict_to_domain: request.restrict_to_domain,
            speed,
            extract_metadata: request.extract_metadata,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRequest {
    pub url: String,
    #[serde(default)]
    pub max_depth: i32,
    #[serde(default)]
    pub restrict_to_domain: bool,
    pub speed: Option<String>,
    #[serde(default)]
    pub extract_metadata: bool,
}

/// The live-monitor projection of a job, serialized camelCase for the
/// dashboard frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusView {
    pub job_id: Uuid,
    pub url: String,
    pub status: JobStatus,
    pub progress: u32,
    pub pages_visited: u32,
    pub pages_queued: u32,
    pub errors: u32,
    pub avg_response_ms: u32,
    pub max_depth: u32,
}

impl From<&CrawlJob> for JobStatusView {
    fn from(job: &CrawlJob) -> Self {
        Self {
            job_id: job.id,
            url: job.url.clone(),
            status: job.status,
            progress: job.progress,
            pages_visited: job.pages_visited,
            pages_queued: job.pages_queued,
            errors: job.errors,
            avg_response_ms: job.avg_response_ms,
            max_depth: job.max_depth,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CrawlSummary {
    pub total_pages: u64,
    pub total_errors: u64,
    pub avg_response_ms: u32,
    pub max_depth: u32,
}

impl CrawlSummary {
    pub fn empty() -> Self {
        Self {
            total_pages: 0,
            total_errors: 0,
            avg_response_ms: 0,
            max_depth: 0,
        }
    }
}

impl From<&CrawlJob> for CrawlSummary {
    fn from(job: &CrawlJob) -> Self {
        Self {
            total_pages: u64::from(job.pages_visited) + u64::from(job.pages_queued),
            total_errors: u64::from(job.errors),
            avg_response_ms: job.avg_response_ms,
            max_depth: job.max_depth,
        }
    }
}

/// Validate a CrawlRequest before a job is created from it.
pub fn validate_crawl_request(request: &CrawlRequest) -> Result<(), CrawlboardError> {
    let url = request.url.trim();
    if url.is_empty() {
        return Err(CrawlboardError::Validation("URL is required".to_string()));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CrawlboardError::Validation(
            "URL must start with http:// or https://".to_string(),
        ));
    }
    Ok(())
}
