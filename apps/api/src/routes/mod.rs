pub mod health;
pub mod upload;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::baseline::handlers as baseline;
use crate::catalog::handlers as catalog;
use crate::generation::handlers as generation;
use crate::state::AppState;

/// Plain acknowledgement body for writes that return no record.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Baseline
        .route(
            "/api/cv/baseline",
            get(baseline::handle_get_baseline).post(baseline::handle_upload_baseline),
        )
        // Catalog
        .route(
            "/api/projects",
            get(catalog::handle_list_items).post(catalog::handle_create_item),
        )
        .route("/api/projects/import", post(catalog::handle_import_items))
        .route(
            "/api/projects/:id",
            get(catalog::handle_get_item)
                .put(catalog::handle_update_item)
                .delete(catalog::handle_delete_item),
        )
        .route(
            "/api/portfolio/import",
            post(catalog::handle_import_portfolio),
        )
        .route(
            "/api/personal-info",
            get(catalog::handle_get_personal_info).post(catalog::handle_save_personal_info),
        )
        .route(
            "/api/skills",
            get(catalog::handle_get_skills).post(catalog::handle_save_skills),
        )
        // Generation & history
        .route("/api/cv/generate", post(generation::handle_generate))
        .route("/api/cv/history", get(generation::handle_history))
        .route(
            "/api/cv/generated/:job_id",
            get(generation::handle_download_artifact),
        )
        .route(
            "/api/cv/generated/:job_id/content",
            get(generation::handle_artifact_content),
        )
        .with_state(state)
}
