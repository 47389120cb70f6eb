use anyhow::Result;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::info;

use crate::models::baseline::{BaselineDocument, BaselineMeta};
use crate::storage::DataDir;

const BASELINE_KEY: &str = "baseline.tex";
const BASELINE_META_KEY: &str = "baseline.json";

/// Owns the singleton baseline document and its upload timestamp.
pub struct BaselineStore {
    data: DataDir,
    write_lock: Mutex<()>,
}

impl BaselineStore {
    pub fn new(data: DataDir) -> Self {
        Self {
            data,
            write_lock: Mutex::new(()),
        }
    }

    /// Overwrites the document unconditionally and stamps a fresh upload time.
    pub async fn save(&self, content: &str) -> Result<BaselineDocument> {
        let _guard = self.write_lock.lock().await;

        let uploaded_at = Utc::now();
        self.data.write_text(BASELINE_KEY, content).await?;
        self.data
            .save_json(
                BASELINE_META_KEY,
                &BaselineMeta {
                    uploaded_at: Some(uploaded_at),
                },
            )
            .await?;

        info!("Baseline CV saved ({} bytes)", content.len());
        Ok(BaselineDocument {
            content: content.to_string(),
            uploaded_at,
        })
    }

    /// `None` until a document has been saved.
    pub async fn get(&self) -> Result<Option<BaselineDocument>> {
        let Some(content) = self.data.read_text(BASELINE_KEY).await? else {
            return Ok(None);
        };
        let meta: BaselineMeta = self.data.load_json(BASELINE_META_KEY).await?;
        // A blob written by hand has no metadata; fall back to "now" rather than failing.
        let uploaded_at = meta.uploaded_at.unwrap_or_else(Utc::now);
        Ok(Some(BaselineDocument {
            content,
            uploaded_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_store() -> (tempfile::TempDir, BaselineStore) {
        let dir = tempfile::tempdir().unwrap();
        let data = DataDir::open(dir.path()).await.unwrap();
        (dir, BaselineStore::new(data))
    }

    #[tokio::test]
    async fn test_get_before_any_save_is_none() {
        let (_dir, store) = open_store().await;
        assert!(store.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_get_round_trips() {
        let (_dir, store) = open_store().await;
        let text = "\\documentclass{article}\n\\begin{document}Ada\\end{document}\n";

        let saved = store.save(text).await.unwrap();
        let loaded = store.get().await.unwrap().unwrap();

        assert_eq!(loaded.content, text);
        assert_eq!(loaded.uploaded_at, saved.uploaded_at);
        assert!(!loaded.uploaded_at.to_rfc3339().is_empty());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_document() {
        let (_dir, store) = open_store().await;
        let first = store.save("first").await.unwrap();
        let second = store.save("second").await.unwrap();

        let loaded = store.get().await.unwrap().unwrap();
        assert_eq!(loaded.content, "second");
        assert!(second.uploaded_at >= first.uploaded_at);
    }
}
