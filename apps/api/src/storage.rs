//! File-backed persistence for the stores: whole JSON records and whole text blobs,
//! addressed by a key relative to the data directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tracing::{debug, info};

/// Root of the persisted state layout.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Opens (and creates, if needed) the data directory.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        ensure_dir_exists(&root).await?;
        info!("Data directory ready at {}", root.display());
        Ok(Self { root })
    }

    pub fn path_of(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Loads a JSON record. An absent record yields `T::default()`.
    pub async fn load_json<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path_of(key);
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };
        serde_json::from_str(&raw).with_context(|| format!("Corrupt JSON in {}", path.display()))
    }

    /// Overwrites a JSON record. Written to a sibling temp file and renamed into
    /// place so readers never observe a half-written record.
    pub async fn save_json<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize record '{key}'"))?;
        self.replace(key, body.as_bytes()).await
    }

    /// Reads a text blob; `None` when it has never been written.
    pub async fn read_text(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_of(key);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    pub async fn write_text(&self, key: &str, content: &str) -> Result<()> {
        self.replace(key, content.as_bytes()).await
    }

    async fn replace(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_of(key);
        if let Some(parent) = path.parent() {
            ensure_dir_exists(parent).await?;
        }

        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp = path.with_file_name(tmp_name);
        fs::write(&tmp, bytes)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("Failed to move {} into place", path.display()))?;

        debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

async fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .await
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }
    Ok(())
}
