pub mod progress;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

use crate::errors::CrawlboardError;
use crate::models::{JobStatus, ServerConfig};
use crate::storage::{JobStore, LogStore};

pub use progress::{SimulatedStepSource, StepOutcome, StepSource};

/// Runs queued crawl jobs on a fixed pool of workers.
///
/// Jobs are dispatched over a bounded channel; each worker pulls an id,
/// drives the simulated crawl to completion, and writes every state
/// change back through the job store so live polling sees fresh counters.
pub struct CrawlRunner {
    dispatch_tx: mpsc::Sender<Uuid>,
}

struct RunnerCore {
    jobs: Arc<dyn JobStore>,
    logs: Arc<dyn LogStore>,
    steps: Arc<dyn StepSource>,
    total_steps: u32,
    step_interval: Duration,
}

impl CrawlRunner {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        logs: Arc<dyn LogStore>,
        steps: Arc<dyn StepSource>,
        config: &ServerConfig,
    ) -> Self {
        let (dispatch_tx, dispatch_rx) = mpsc::channel(config.dispatch_capacity);
        let dispatch_rx = Arc::new(Mutex::new(dispatch_rx));
        let core = Arc::new(RunnerCore {
            jobs,
            logs,
            steps,
            total_steps: config.total_steps,
            step_interval: Duration::from_millis(config.step_interval_ms),
        });

        for worker_id in 0..config.worker_count {
            let dispatch_rx = Arc::clone(&dispatch_rx);
            let core = Arc::clone(&core);
            tokio::spawn(async move {
                loop {
                    let job_id = {
                        let mut rx = dispatch_rx.lock().await;
                        rx.recv().await
                    };
                    let Some(job_id) = job_id else {
                        tracing::debug!("Crawl worker {} shutting down", worker_id);
                        break;
                    };
                    tracing::info!("Worker {} picked up crawl job {}", worker_id, job_id);
                    if let Err(e) = core.run_job(job_id).await {
                        tracing::error!("Crawl job {} aborted: {:#}", job_id, e);
                        if let Err(log_err) =
                            core.log(job_id, &format!("simulation failed: {}", e)).await
                        {
                            tracing::error!(
                                "Failed to record abort for job {}: {:#}",
                                job_id,
                                log_err
                            );
                        }
                    }
                }
            });
        }

        Self { dispatch_tx }
    }

    /// Hands a queued job to the worker pool. Blocks only if the dispatch
    /// channel is full.
    pub async fn dispatch(&self, job_id: Uuid) -> Result<()> {
        self.dispatch_tx
            .send(job_id)
            .await
            .map_err(|_| CrawlboardError::Internal("Crawl workers are not running".to_string()))?;
        Ok(())
    }
}

impl RunnerCore {
    async fn run_job(&self, job_id: Uuid) -> Result<()> {
        let mut job = self
            .jobs
            .get(job_id)
            .await?
            .ok_or_else(|| CrawlboardError::NotFound(format!("Crawl job {}", job_id)))?;

        job.status = JobStatus::Running;
        self.jobs.save(job.clone()).await?;
        self.log(job_id, &format!("INIT crawl {}", job.url)).await?;

        for step in 1..=self.total_steps {
            tokio::time::sleep(self.step_interval).await;

            // Re-read so counters written by a previous tick are the base.
            let mut job = self
                .jobs
                .get(job_id)
                .await?
                .ok_or_else(|| CrawlboardError::NotFound(format!("Crawl job {}", job_id)))?;

            let outcome = self.steps.next_step();
            job.progress = step * 100 / self.total_steps;
            job.pages_visited += outcome.pages_visited;
            job.pages_queued = job
                .pages_queued
                .saturating_add_signed(outcome.queue_delta);
            job.avg_response_ms = outcome.avg_response_ms;

            if outcome.error {
                job.errors += 1;
                self.log(job_id, &format!("ERROR fetch failed /page-{}", job.pages_visited))
                    .await?;
            } else {
                self.log(
                    job_id,
                    &format!(
                        "VISIT GET 200 {}ms /page-{}",
                        outcome.response_ms, job.pages_visited
                    ),
                )
                .await?;
            }

            self.jobs.save(job).await?;
        }

        let mut job = self
            .jobs
            .get(job_id)
            .await?
            .ok_or_else(|| CrawlboardError::NotFound(format!("Crawl job {}", job_id)))?;
        job.status = JobStatus::Completed;
        job.progress = 100;
        self.jobs.save(job.clone()).await?;
        self.log(
            job_id,
            &format!("DONE visited={} errors={}", job.pages_visited, job.errors),
        )
        .await?;
        tracing::info!("Crawl job {} completed", job_id);

        Ok(())
    }

    async fn log(&self, job_id: Uuid, message: &str) -> Result<()> {
        let now = Utc::now();
        let line = format!("[{}] {}", now.format("%Y-%m-%d %H:%M:%S"), message);
        self.logs
            .append(job_id, now, line)
            .await
            .context("Failed to append crawl log")
    }
}
