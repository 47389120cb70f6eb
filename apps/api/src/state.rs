use std::sync::Arc;

use anyhow::Result;

use crate::baseline::BaselineStore;
use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::history::HistoryStore;
use crate::llm_client::CompletionClient;
use crate::storage::DataDir;

/// The three stores, constructed once at startup over the same data directory.
pub struct Stores {
    pub catalog: CatalogStore,
    pub baseline: BaselineStore,
    pub history: HistoryStore,
}

impl Stores {
    pub fn new(data: DataDir) -> Self {
        Self {
            catalog: CatalogStore::new(data.clone()),
            baseline: BaselineStore::new(data.clone()),
            history: HistoryStore::new(data),
        }
    }

    pub async fn open(root: impl Into<std::path::PathBuf>) -> Result<Self> {
        Ok(Self::new(DataDir::open(root).await?))
    }
}

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub stores: Arc<Stores>,
    /// AI collaborator. `LlmClient` in production, a stub in tests.
    pub llm: Arc<dyn CompletionClient>,
    pub config: Config,
}
