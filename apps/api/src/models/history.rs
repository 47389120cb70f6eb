use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One generated résumé. The rendered text lives in the artifact store under `job_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub job_id: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub file_path: String,
}
