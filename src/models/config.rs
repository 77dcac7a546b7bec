use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    #[serde(default = "default_dispatch_capacity")]
    pub dispatch_capacity: usize,
    #[serde(default = "default_total_steps")]
    pub total_steps: u32,
    #[serde(default = "default_step_interval_ms")]
    pub step_interval_ms: u64,
    #[serde(default = "default_log_tail_limit")]
    pub log_tail_limit: usize,
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_worker_count() -> usize {
    4
}

fn default_dispatch_capacity() -> usize {
    64
}

fn default_total_steps() -> u32 {
    20
}

fn default_step_interval_ms() -> u64 {
    1000
}

fn default_log_tail_limit() -> usize {
    200
}

fn default_jwt_secret() -> String {
    "crawlboard-dev-secret".to_string()
}

fn default_token_ttl_secs() -> i64 {
    86_400
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: None,
            worker_count: default_worker_count(),
            dispatch_capacity: default_dispatch_capacity(),
            total_steps: default_total_steps(),
            step_interval_ms: default_step_interval_ms(),
            log_tail_limit: default_log_tail_limit(),
            jwt_secret: default_jwt_secret(),
            token_ttl_secs: default_token_ttl_secs(),
        }
    }
}

impl ServerConfig {
    /// Resolve the data directory: explicit setting first, then the
    /// platform data dir, then ./crawlboard-data as a last resort.
    pub fn resolved_data_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|d| d.join("crawlboard"))
            .unwrap_or_else(|| PathBuf::from("crawlboard-data"))
    }
}
