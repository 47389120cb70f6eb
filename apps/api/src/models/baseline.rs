use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The user's master résumé source plus when it was last uploaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineDocument {
    pub content: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Persisted alongside the baseline blob.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaselineMeta {
    pub uploaded_at: Option<DateTime<Utc>>,
}
