//! Axum route handlers for generation and history.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::generation::generator::{generate_tailored_cv, GenerateRequest, GenerateResponse};
use crate::models::history::HistoryEntry;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ArtifactContentResponse {
    pub content: String,
    pub job_id: String,
}

/// POST /api/cv/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let response = generate_tailored_cv(
        &state.stores,
        state.llm.as_ref(),
        &state.config.generation_model,
        request,
    )
    .await?;
    Ok(Json(response))
}

/// GET /api/cv/history
pub async fn handle_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    Ok(Json(state.stores.history.list().await?))
}

/// GET /api/cv/generated/:job_id
///
/// Serves the artifact as a `.tex` download.
pub async fn handle_download_artifact(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let content = load_artifact(&state, &job_id).await?;
    let disposition = format!("attachment; filename=\"cv_{job_id}.tex\"");
    Ok((
        [
            (header::CONTENT_TYPE, "application/x-tex".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content,
    ))
}

/// GET /api/cv/generated/:job_id/content
pub async fn handle_artifact_content(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<ArtifactContentResponse>, AppError> {
    let content = load_artifact(&state, &job_id).await?;
    Ok(Json(ArtifactContentResponse { content, job_id }))
}

async fn load_artifact(state: &AppState, job_id: &str) -> Result<String, AppError> {
    state
        .stores
        .history
        .get_artifact(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Generated CV with job ID {job_id} not found")))
}
