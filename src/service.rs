use std::sync::Arc;

use anyhow::Result;
use uuid::Uuid;

use crate::errors::CrawlboardError;
use crate::models::{validate_crawl_request, CrawlJob, CrawlRequest, CrawlSummary, JobStatusView};
use crate::runner::CrawlRunner;
use crate::storage::{JobStore, LogStore};

/// Crawl job lifecycle: submission plus the live views the dashboard
/// polls. Reads take an optional job id and fall back to the most
/// recently created job when it is omitted.
pub struct CrawlService {
    jobs: Arc<dyn JobStore>,
    logs: Arc<dyn LogStore>,
    runner: CrawlRunner,
    log_tail_limit: usize,
}

impl CrawlService {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        logs: Arc<dyn LogStore>,
        runner: CrawlRunner,
        log_tail_limit: usize,
    ) -> Self {
        Self {
            jobs,
            logs,
            runner,
            log_tail_limit,
        }
    }

    /// Validates and persists a new job, then hands it to the worker
    /// pool. The returned view still shows QUEUED; the runner flips it to
    /// RUNNING on pickup.
    pub async fn submit(&self, request: &CrawlRequest) -> Result<JobStatusView> {
        validate_crawl_request(request)?;
        let job = self.jobs.create(CrawlJob::new(request)).await?;
        tracing::info!("Queued crawl job {} for {}", job.id, job.url);
        self.runner.dispatch(job.id).await?;
        Ok(JobStatusView::from(&job))
    }

    pub async fn live_status(&self, job_id: Option<Uuid>) -> Result<JobStatusView> {
        let job = self.resolve_job(job_id).await?;
        Ok(JobStatusView::from(&job))
    }

    /// The most recent log lines of the resolved job, oldest first, capped
    /// at the configured tail limit.
    pub async fn live_logs(&self, job_id: Option<Uuid>) -> Result<Vec<String>> {
        let job = self.resolve_job(job_id).await?;
        let entries = self.logs.recent_for(job.id, self.log_tail_limit).await?;
        Ok(entries.into_iter().map(|e| e.message).collect())
    }

    /// Aggregate counters for the latest job; all zeros when nothing has
    /// been submitted yet.
    pub async fn summary(&self) -> Result<CrawlSummary> {
        match self.jobs.latest().await? {
            Some(job) => Ok(CrawlSummary::from(&job)),
            None => Ok(CrawlSummary::empty()),
        }
    }

    /// An explicit id must exist; an omitted one falls back to the most
    /// recently created job.
    async fn resolve_job(&self, job_id: Option<Uuid>) -> Result<CrawlJob> {
        match job_id {
            Some(id) => self
                .jobs
                .get(id)
                .await?
                .ok_or_else(|| CrawlboardError::NotFound(format!("Crawl job {}", id)).into()),
            None => self
                .jobs
                .latest()
                .await?
                .ok_or_else(|| CrawlboardError::NoJobs.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobStatus, ServerConfig};
    use crate::runner::{StepOutcome, StepSource};
    use crate::storage::jobs::JsonJobStore;
    use crate::storage::logs::JsonLogStore;
    use std::time::Duration;
    use tempfile::TempDir;

    struct FixedSteps;

    impl StepSource for FixedSteps {
        fn next_step(&self) -> StepOutcome {
            StepOutcome {
                pages_visited: 10,
                queue_delta: 3,
                error: false,
                response_ms: 150,
                avg_response_ms: 180,
            }
        }
    }

    async fn setup_service() -> (CrawlService, TempDir) {
        let tmp_dir = TempDir::new().expect("create temp dir");
        let jobs = Arc::new(
            JsonJobStore::new(tmp_dir.path().to_path_buf())
                .await
                .expect("create job store"),
        );
        let logs = Arc::new(
            JsonLogStore::new(tmp_dir.path().to_path_buf())
                .await
                .expect("create log store"),
        );
        let config = ServerConfig {
            total_steps: 3,
            step_interval_ms: 2,
            ..ServerConfig::default()
        };
        let runner = CrawlRunner::new(
            Arc::clone(&jobs) as Arc<dyn JobStore>,
            Arc::clone(&logs) as Arc<dyn LogStore>,
            Arc::new(FixedSteps),
            &config,
        );
        let service = CrawlService::new(
            jobs as Arc<dyn JobStore>,
            logs as Arc<dyn LogStore>,
            runner,
            config.log_tail_limit,
        );
        (service, tmp_dir)
    }

    fn request(url: &str) -> CrawlRequest {
        CrawlRequest {
            url: url.to_string(),
            max_depth: 3,
            restrict_to_domain: true,
            speed: Some("fast".to_string()),
            extract_metadata: false,
        }
    }

    async fn wait_until_complete(service: &CrawlService) -> JobStatusView {
        for _ in 0..500 {
            let view = service.live_status(None).await.expect("live status");
            if view.status == JobStatus::Completed {
                return view;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("crawl never completed");
    }

    #[tokio::test]
    async fn test_submit_returns_queued_view() {
        let (service, _tmp) = setup_service().await;
        let view = service
            .submit(&request("https://example.com"))
            .await
            .expect("submit");
        assert_eq!(view.status, JobStatus::Queued);
        assert_eq!(view.progress, 0);
        assert_eq!(view.url, "https://example.com");
    }

    #[tokio::test]
    async fn test_submit_rejects_invalid_url() {
        let (service, _tmp) = setup_service().await;
        let err = service
            .submit(&request("   "))
            .await
            .expect_err("blank url must be rejected");
        match err.downcast_ref::<CrawlboardError>() {
            Some(CrawlboardError::Validation(_)) => {}
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_live_views_before_any_submission() {
        let (service, _tmp) = setup_service().await;

        let status_err = service.live_status(None).await.expect_err("no jobs yet");
        assert!(matches!(
            status_err.downcast_ref::<CrawlboardError>(),
            Some(CrawlboardError::NoJobs)
        ));

        let logs_err = service.live_logs(None).await.expect_err("no jobs yet");
        assert!(matches!(
            logs_err.downcast_ref::<CrawlboardError>(),
            Some(CrawlboardError::NoJobs)
        ));

        // Summary degrades to zeros instead of erroring.
        let summary = service.summary().await.expect("summary");
        assert_eq!(summary.total_pages, 0);
        assert_eq!(summary.total_errors, 0);
    }

    #[tokio::test]
    async fn test_full_lifecycle_and_summary() {
        let (service, _tmp) = setup_service().await;
        service
            .submit(&request("https://example.com"))
            .await
            .expect("submit");

        let done = wait_until_complete(&service).await;
        assert_eq!(done.progress, 100);
        assert_eq!(done.pages_visited, 30);

        let summary = service.summary().await.expect("summary");
        assert_eq!(summary.total_pages, (30 + 9) as u64); // visited + queued
        assert_eq!(summary.total_errors, 0);
        assert_eq!(summary.avg_response_ms, 180);
        assert_eq!(summary.max_depth, 3);

        let lines = service.live_logs(None).await.expect("logs");
        assert!(lines.first().expect("init line").contains("INIT crawl"));
        assert!(lines.last().expect("done line").contains("DONE visited=30"));
    }

    #[tokio::test]
    async fn test_live_views_track_latest_job() {
        let (service, _tmp) = setup_service().await;
        let first = service
            .submit(&request("https://first.example.com"))
            .await
            .expect("submit first");
        wait_until_complete(&service).await;

        let second = service
            .submit(&request("https://second.example.com"))
            .await
            .expect("submit second");

        let view = service.live_status(None).await.expect("live status");
        assert_eq!(view.job_id, second.job_id);

        // The first job stays reachable by explicit id.
        let first_view = service
            .live_status(Some(first.job_id))
            .await
            .expect("status by id");
        assert_eq!(first_view.job_id, first.job_id);
        assert_eq!(first_view.progress, 100);
    }

    #[tokio::test]
    async fn test_unknown_job_id_is_not_found() {
        let (service, _tmp) = setup_service().await;
        service
            .submit(&request("https://example.com"))
            .await
            .expect("submit");

        let err = service
            .live_status(Some(Uuid::new_v4()))
            .await
            .expect_err("unknown id");
        assert!(matches!(
            err.downcast_ref::<CrawlboardError>(),
            Some(CrawlboardError::NotFound(_))
        ));
    }
}
