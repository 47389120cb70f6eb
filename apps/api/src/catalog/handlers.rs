use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::catalog::import::{BatchImportReport, PortfolioBundle, PortfolioImportReport};
use crate::errors::AppError;
use crate::models::catalog::{
    ContentItem, ContentItemDraft, ContentItemPatch, PersonalInfo, SkillCategory,
};
use crate::routes::upload::read_text_upload;
use crate::routes::MessageResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ImportResponse<T> {
    pub message: String,
    #[serde(flatten)]
    pub report: T,
}

fn item_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Project with ID {id} not found"))
}

/// GET /api/projects
pub async fn handle_list_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContentItem>>, AppError> {
    Ok(Json(state.stores.catalog.list().await?))
}

/// GET /api/projects/:id
pub async fn handle_get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContentItem>, AppError> {
    state
        .stores
        .catalog
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| item_not_found(&id))
}

/// POST /api/projects
pub async fn handle_create_item(
    State(state): State<AppState>,
    Json(draft): Json<ContentItemDraft>,
) -> Result<(StatusCode, Json<ContentItem>), AppError> {
    if draft.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    let item = state.stores.catalog.create(draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/projects/:id
pub async fn handle_update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ContentItemPatch>,
) -> Result<Json<ContentItem>, AppError> {
    state
        .stores
        .catalog
        .update(&id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| item_not_found(&id))
}

/// DELETE /api/projects/:id
pub async fn handle_delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.stores.catalog.delete(&id).await? {
        return Err(item_not_found(&id));
    }
    Ok(Json(MessageResponse::new(format!(
        "Project {id} deleted successfully"
    ))))
}

/// POST /api/projects/import
///
/// Multipart `.json` upload holding an array of items.
pub async fn handle_import_items(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ImportResponse<BatchImportReport>>, AppError> {
    let upload = read_text_upload(multipart, "json").await?;
    let parsed: Value = serde_json::from_str(&upload.content)
        .map_err(|_| AppError::Validation("Invalid JSON file".to_string()))?;
    let Value::Array(raw_items) = parsed else {
        return Err(AppError::Validation(
            "JSON file must contain an array of projects".to_string(),
        ));
    };

    let report = state.stores.catalog.import_batch(raw_items).await?;
    Ok(Json(ImportResponse {
        message: format!("Imported {} projects", report.imported_count),
        report,
    }))
}

/// POST /api/portfolio/import
///
/// Multipart `.json` upload holding a portfolio object.
pub async fn handle_import_portfolio(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ImportResponse<PortfolioImportReport>>, AppError> {
    let upload = read_text_upload(multipart, "json").await?;
    let parsed: Value = serde_json::from_str(&upload.content)
        .map_err(|_| AppError::Validation("Invalid JSON file".to_string()))?;
    if !parsed.is_object() {
        return Err(AppError::Validation(
            "JSON file must contain a portfolio object".to_string(),
        ));
    }
    let bundle: PortfolioBundle = serde_json::from_value(parsed)
        .map_err(|e| AppError::Validation(format!("Invalid portfolio: {e}")))?;

    let report = state.stores.catalog.import_portfolio(bundle).await?;
    Ok(Json(ImportResponse {
        message: format!("Imported {} total items", report.total_items),
        report,
    }))
}

/// GET /api/personal-info
pub async fn handle_get_personal_info(
    State(state): State<AppState>,
) -> Result<Json<PersonalInfo>, AppError> {
    Ok(Json(state.stores.catalog.personal_info().await?))
}

/// POST /api/personal-info
pub async fn handle_save_personal_info(
    State(state): State<AppState>,
    Json(info): Json<PersonalInfo>,
) -> Result<Json<MessageResponse>, AppError> {
    state.stores.catalog.save_personal_info(&info).await?;
    Ok(Json(MessageResponse::new(
        "Personal information saved successfully",
    )))
}

/// GET /api/skills
pub async fn handle_get_skills(
    State(state): State<AppState>,
) -> Result<Json<Vec<SkillCategory>>, AppError> {
    Ok(Json(state.stores.catalog.skills().await?))
}

/// POST /api/skills
pub async fn handle_save_skills(
    State(state): State<AppState>,
    Json(skills): Json<Vec<SkillCategory>>,
) -> Result<Json<MessageResponse>, AppError> {
    state.stores.catalog.save_skills(&skills).await?;
    Ok(Json(MessageResponse::new("Skills saved successfully")))
}
