use anyhow::Result;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::info;

use crate::models::history::HistoryEntry;
use crate::storage::DataDir;

const HISTORY_KEY: &str = "history.json";
const ARTIFACT_DIR: &str = "generated";
const ARTIFACT_EXT: &str = "tex";

/// Owns the history sequence and the artifact bodies.
pub struct HistoryStore {
    data: DataDir,
    write_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(data: DataDir) -> Self {
        Self {
            data,
            write_lock: Mutex::new(()),
        }
    }

    /// Stores the artifact and inserts its entry at the front of the history.
    pub async fn append(
        &self,
        artifact: &str,
        job_id: &str,
        company: Option<String>,
        position: Option<String>,
    ) -> Result<HistoryEntry> {
        let key = artifact_key(job_id)
            .ok_or_else(|| anyhow::anyhow!("Invalid job id '{job_id}' for artifact storage"))?;

        let _guard = self.write_lock.lock().await;
        self.data.write_text(&key, artifact).await?;

        let entry = HistoryEntry {
            job_id: job_id.to_string(),
            company,
            position,
            generated_at: Utc::now(),
            file_path: self.data.path_of(&key).display().to_string(),
        };

        let mut history: Vec<HistoryEntry> = self.data.load_json(HISTORY_KEY).await?;
        history.insert(0, entry.clone());
        self.data.save_json(HISTORY_KEY, &history).await?;

        info!("Stored generated CV {job_id} ({} in history)", history.len());
        Ok(entry)
    }

    /// Most recent first.
    pub async fn list(&self) -> Result<Vec<HistoryEntry>> {
        self.data.load_json(HISTORY_KEY).await
    }

    pub async fn get_artifact(&self, job_id: &str) -> Result<Option<String>> {
        match artifact_key(job_id) {
            Some(key) => self.data.read_text(&key).await,
            None => Ok(None),
        }
    }
}

/// Maps a job id to its blob key. Ids outside `[A-Za-z0-9_-]` have no artifact.
fn artifact_key(job_id: &str) -> Option<String> {
    let valid = !job_id.is_empty()
        && job_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then(|| format!("{ARTIFACT_DIR}/{job_id}.{ARTIFACT_EXT}"))
}
