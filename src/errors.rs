use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlboardError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No crawl jobs found yet")]
    NoJobs,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for CrawlboardError {
    fn from(err: std::io::Error) -> Self {
        CrawlboardError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CrawlboardError {
    fn from(err: serde_json::Error) -> Self {
        CrawlboardError::Storage(err.to_string())
    }
}

impl From<uuid::Error> for CrawlboardError {
    fn from(err: uuid::Error) -> Self {
        CrawlboardError::Validation(err.to_string())
    }
}
