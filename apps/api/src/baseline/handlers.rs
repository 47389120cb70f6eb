use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::extractor::{extract_after_upload, ExtractionOutcome};
use crate::models::baseline::BaselineDocument;
use crate::routes::upload::read_text_upload;
use crate::state::AppState;

/// The save is always reported; extraction is reported on its own.
#[derive(Debug, Serialize)]
pub struct BaselineUploadResponse {
    pub message: String,
    pub uploaded_at: DateTime<Utc>,
    pub extraction: ExtractionOutcome,
}

/// POST /api/cv/baseline
pub async fn handle_upload_baseline(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<BaselineUploadResponse>), AppError> {
    let upload = read_text_upload(multipart, "tex").await?;
    info!("Baseline upload received: {}", upload.filename);

    let saved = state.stores.baseline.save(&upload.content).await?;

    let extraction = extract_after_upload(
        &state.stores.catalog,
        state.llm.as_ref(),
        &state.config.extraction_model,
        &saved.content,
    )
    .await;

    let message = match &extraction {
        ExtractionOutcome::Merged { .. } => {
            "Baseline CV saved successfully and extracted data saved"
        }
        ExtractionOutcome::Skipped { .. } => "Baseline CV saved successfully",
    };

    Ok((
        StatusCode::CREATED,
        Json(BaselineUploadResponse {
            message: message.to_string(),
            uploaded_at: saved.uploaded_at,
            extraction,
        }),
    ))
}

/// GET /api/cv/baseline
pub async fn handle_get_baseline(
    State(state): State<AppState>,
) -> Result<Json<BaselineDocument>, AppError> {
    state
        .stores
        .baseline
        .get()
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound("No baseline CV found. Please upload one first.".to_string())
        })
}
