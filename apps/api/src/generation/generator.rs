//! Tailored CV generation: orchestrates one round trip to the AI collaborator.
//!
//! Flow: preconditions (baseline, catalog, credential) → build prompt →
//!       complete → unwrap code fence → selection heuristic → persist to history.
//!
//! Nothing is retried. Any AI failure surfaces as a single generation error.

use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::identity::mint_short_id;
use crate::errors::AppError;
use crate::generation::prompts::{CUSTOM_INSTRUCTIONS_TEMPLATE, GENERATION_PROMPT_TEMPLATE};
use crate::generation::selection::mentioned_item_ids;
use crate::llm_client::prompts::{fill_template, ATS_CONSTRAINTS};
use crate::llm_client::{strip_code_fence, CompletionClient};
use crate::models::catalog::ContentItem;
use crate::state::Stores;

pub const MAX_ITEMS_RANGE: RangeInclusive<u32> = 1..=10;
pub const DEFAULT_MAX_ITEMS: u32 = 5;

// ────────────────────────────────────────────────────────────────────────────
// Request / response
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct JobDescription {
    pub text: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub job_description: JobDescription,
    #[serde(default = "default_max_items")]
    pub max_items: u32,
    #[serde(default)]
    pub custom_instructions: Option<String>,
}

fn default_max_items() -> u32 {
    DEFAULT_MAX_ITEMS
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    #[serde(rename = "latex_content")]
    pub tailored_document: String,
    pub job_id: String,
    pub generated_at: DateTime<Utc>,
    /// Items whose title appears in the document. See `generation::selection`.
    #[serde(rename = "selected_items")]
    pub selected_item_ids: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Generates a job-specific CV and records it in the history.
///
/// Fails before calling the model with `MissingBaseline`, `EmptyCatalog` or
/// `NotConfigured`, checked in that order.
pub async fn generate_tailored_cv(
    stores: &Stores,
    llm: &dyn CompletionClient,
    model: &str,
    request: GenerateRequest,
) -> Result<GenerateResponse, AppError> {
    validate_request(&request)?;

    let baseline = stores
        .baseline
        .get()
        .await?
        .ok_or(AppError::MissingBaseline)?;

    let items = stores.catalog.list().await?;
    if items.is_empty() {
        return Err(AppError::EmptyCatalog);
    }

    if !llm.is_configured() {
        return Err(AppError::NotConfigured(
            "ANTHROPIC_API_KEY is not set".to_string(),
        ));
    }

    let prompt = build_generation_prompt(&baseline.content, &items, &request)?;
    info!(
        "Generating tailored CV from {} catalog items (max {})",
        items.len(),
        request.max_items
    );

    let raw = llm.complete(model, &prompt).await?;
    let document = strip_code_fence(&raw).to_string();
    if document.is_empty() {
        return Err(AppError::MalformedResponse(
            "model returned an empty document".to_string(),
        ));
    }

    let selected_item_ids = mentioned_item_ids(&document, &items);

    let job_id = mint_short_id();
    let JobDescription {
        company, position, ..
    } = request.job_description;
    let entry = stores
        .history
        .append(&document, &job_id, non_blank(company), non_blank(position))
        .await?;

    info!(
        "Generated CV {} mentioning {} catalog items",
        job_id,
        selected_item_ids.len()
    );

    Ok(GenerateResponse {
        tailored_document: document,
        job_id,
        generated_at: entry.generated_at,
        selected_item_ids,
    })
}

fn validate_request(request: &GenerateRequest) -> Result<(), AppError> {
    if request.job_description.text.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description.text cannot be empty".to_string(),
        ));
    }
    if !MAX_ITEMS_RANGE.contains(&request.max_items) {
        return Err(AppError::Validation(format!(
            "max_items must be between {} and {}",
            MAX_ITEMS_RANGE.start(),
            MAX_ITEMS_RANGE.end()
        )));
    }
    Ok(())
}

/// Builds the generation prompt by filling the template with the baseline,
/// the serialized catalog and the job framing.
fn build_generation_prompt(
    baseline_cv: &str,
    items: &[ContentItem],
    request: &GenerateRequest,
) -> Result<String, AppError> {
    let items_json = serde_json::to_string_pretty(items)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize catalog: {e}")))?;

    let job = &request.job_description;
    let company_info = job
        .company
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| format!(" at {c}"))
        .unwrap_or_default();
    let position_info = job
        .position
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!(" for the {p} position"))
        .unwrap_or_default();
    let max_items = request.max_items.to_string();

    let mut prompt = fill_template(
        GENERATION_PROMPT_TEMPLATE,
        &[
            ("max_items", &max_items),
            ("ats_constraints", ATS_CONSTRAINTS),
            ("baseline_cv", baseline_cv),
            ("items_json", &items_json),
            ("company_info", &company_info),
            ("position_info", &position_info),
            ("job_description", job.text.trim()),
        ],
    );

    if let Some(custom) = request
        .custom_instructions
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        prompt.push_str(&fill_template(
            CUSTOM_INSTRUCTIONS_TEMPLATE,
            &[("custom_instructions", custom), ("max_items", &max_items)],
        ));
    }

    Ok(prompt)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
