use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One synthetic crawler log line. Entries are append-only and ordered by
/// their sequence number within the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub seq: u64,
    pub job_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_entry_serde_roundtrip() {
        let entry = LogEntry {
            seq: 7,
            job_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            message: "VISIT GET 200 182ms /page-42".to_string(),
        };
        let json = serde_json::to_string(&entry).expect("serialize");
        let deserialized: LogEntry = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(entry, deserialized);
    }
}
