pub mod config;
pub mod job;
pub mod log;
pub mod user;

pub use config::ServerConfig;
pub use job::{
    validate_crawl_request, CrawlJob, CrawlRequest, CrawlSummary, JobStatus, JobStatusView,
};
pub use log::LogEntry;
pub use user::{AuthRequest, AuthResponse, User};
