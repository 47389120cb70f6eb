//! Baseline extraction: asks the model for a structured breakdown of the CV,
//! stamps stable ids and categories, and merges the result into the catalog.
//!
//! Best-effort: callers report a failed extraction next to the successful
//! baseline save instead of failing the upload.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::catalog::identity::derive_stable_id;
use crate::catalog::import::{stamp_category, ImportCounts, PortfolioBundle, PortfolioSection};
use crate::catalog::CatalogStore;
use crate::errors::AppError;
use crate::extraction::prompts::EXTRACTION_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{complete_json, CompletionClient};

/// Separate outcome of the extraction step after a baseline upload.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    Merged {
        counts: ImportCounts,
        total_items: usize,
        duplicates_skipped: usize,
        rejected: usize,
    },
    Skipped {
        reason: String,
    },
}

/// Extracts catalog content from `document` and imports it as a portfolio.
pub async fn extract_and_merge(
    catalog: &CatalogStore,
    llm: &dyn CompletionClient,
    model: &str,
    document: &str,
) -> Result<ExtractionOutcome, AppError> {
    if !llm.is_configured() {
        return Err(AppError::NotConfigured(
            "ANTHROPIC_API_KEY is not set".to_string(),
        ));
    }

    let prompt = fill_template(
        EXTRACTION_PROMPT_TEMPLATE,
        &[("json_only", JSON_ONLY_INSTRUCTION), ("baseline_cv", document)],
    );
    let extracted: Value = complete_json(llm, model, &prompt).await?;
    let bundle = into_bundle(extracted)?;

    let report = catalog.import_portfolio(bundle).await?;
    info!(
        "Extraction merged {} items into the catalog",
        report.total_items
    );

    Ok(ExtractionOutcome::Merged {
        counts: report.counts,
        total_items: report.total_items,
        duplicates_skipped: report.duplicates_skipped,
        rejected: report.rejected.len(),
    })
}

/// Runs extraction and folds any failure into `Skipped`. Never fails.
pub async fn extract_after_upload(
    catalog: &CatalogStore,
    llm: &dyn CompletionClient,
    model: &str,
    document: &str,
) -> ExtractionOutcome {
    match extract_and_merge(catalog, llm, model, document).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Baseline extraction skipped: {e}");
            ExtractionOutcome::Skipped {
                reason: e.to_string(),
            }
        }
    }
}

/// Stamps every titled item with its stable id, every item with its section's
/// category, and checks the overall shape.
fn into_bundle(mut extracted: Value) -> Result<PortfolioBundle, AppError> {
    let Some(sections) = extracted.as_object_mut() else {
        return Err(AppError::MalformedResponse(
            "extraction reply is not a JSON object".to_string(),
        ));
    };

    for section in PortfolioSection::ALL {
        let Some(Value::Array(items)) = sections.get_mut(section.key()) else {
            continue;
        };
        for item in items.iter_mut().filter_map(Value::as_object_mut) {
            let stable_id = item
                .get("title")
                .and_then(Value::as_str)
                .map(derive_stable_id);
            if let Some(id) = stable_id {
                item.insert("id".to_string(), Value::String(id));
            }
            stamp_category(item, section.category());
        }
    }

    serde_json::from_value(extracted).map_err(|e| {
        AppError::MalformedResponse(format!("extraction reply has an unexpected shape: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::StubLlm;
    use crate::models::catalog::Category;
    use crate::storage::DataDir;
    use serde_json::json;

    async fn open_catalog() -> (tempfile::TempDir, CatalogStore) {
        let dir = tempfile::tempdir().unwrap();
        let data = DataDir::open(dir.path()).await.unwrap();
        (dir, CatalogStore::new(data))
    }

    fn extraction_reply() -> String {
        let body = json!({
            "personal_info": {"name": "Ada Lovelace", "email": "ada@example.com"},
            "education": [
                {"title": "BSc Mathematics", "description": "Honours", "date_range": "1833 - 1836"}
            ],
            "experience": [
                {"title": "Analyst, Babbage & Co", "description": "Engines", "date_range": "1842",
                 "id": "model-made-this-up", "category": "project"}
            ],
            "projects": [
                {"title": "Rocket Simulator", "description": "N-body", "date_range": "2023",
                 "technologies": ["Rust"], "bullets": ["Simulated 10k bodies"]},
                {"description": "untitled item", "date_range": "2020"}
            ],
            "certifications": [],
            "skills": [{"category": "Languages", "items": ["Rust"]}]
        });
        format!("```json\n{}\n```", serde_json::to_string_pretty(&body).unwrap())
    }

    #[tokio::test]
    async fn test_extraction_merges_with_stable_ids() {
        let (_dir, catalog) = open_catalog().await;
        let llm = StubLlm::replying(extraction_reply());

        let outcome = extract_and_merge(&catalog, &llm, "extract-model", "\\documentclass{cv}")
            .await
            .unwrap();

        let ExtractionOutcome::Merged {
            counts, rejected, ..
        } = outcome
        else {
            panic!("expected merged outcome");
        };
        assert_eq!(counts.education, 1);
        assert_eq!(counts.experience, 1);
        assert_eq!(counts.projects, 1);
        assert_eq!(counts.personal_info, 1);
        assert_eq!(counts.skills, 1);
        assert_eq!(rejected, 1, "untitled item lacks a title");

        let experience = catalog
            .get(&derive_stable_id("Analyst, Babbage & Co"))
            .await
            .unwrap()
            .expect("model-supplied id is replaced by the stable id");
        assert_eq!(experience.category, Category::Experience);

        let project = catalog
            .get(&derive_stable_id("rocket simulator"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(project.bullets, vec!["Simulated 10k bodies".to_string()]);
        assert!(llm.last_prompt().unwrap().contains("\\documentclass{cv}"));
    }

    #[tokio::test]
    async fn test_repeated_extraction_does_not_duplicate() {
        let (_dir, catalog) = open_catalog().await;
        let llm = StubLlm::replying(extraction_reply());

        extract_and_merge(&catalog, &llm, "m", "cv").await.unwrap();
        let before = catalog.list().await.unwrap().len();
        extract_and_merge(&catalog, &llm, "m", "cv").await.unwrap();

        assert_eq!(catalog.list().await.unwrap().len(), before);
    }

    #[tokio::test]
    async fn test_prose_reply_is_malformed() {
        let (_dir, catalog) = open_catalog().await;
        let llm = StubLlm::replying("I could not read this CV, sorry.");

        let err = extract_and_merge(&catalog, &llm, "m", "cv").await.unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_non_object_reply_is_malformed() {
        let (_dir, catalog) = open_catalog().await;
        let llm = StubLlm::replying("[1, 2, 3]");

        let err = extract_and_merge(&catalog, &llm, "m", "cv").await.unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_wrong_section_shape_is_malformed() {
        let (_dir, catalog) = open_catalog().await;
        let llm = StubLlm::replying(r#"{"projects": "none"}"#);

        let err = extract_and_merge(&catalog, &llm, "m", "cv").await.unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
        assert!(catalog.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failures_fold_into_skipped() {
        let (_dir, catalog) = open_catalog().await;

        let outcome = extract_after_upload(&catalog, &StubLlm::failing(), "m", "cv").await;
        assert!(matches!(outcome, ExtractionOutcome::Skipped { .. }));

        let outcome = extract_after_upload(&catalog, &StubLlm::unconfigured(), "m", "cv").await;
        let ExtractionOutcome::Skipped { reason } = outcome else {
            panic!("expected skipped outcome");
        };
        assert!(reason.contains("not configured"));
        assert!(catalog.list().await.unwrap().is_empty());
    }
}
