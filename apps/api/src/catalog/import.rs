//! Import payloads and the per-item parse/validate step.
//!
//! Imported items arrive loosely typed (user JSON files, AI extraction output).
//! Each one is turned into a `ContentItem` or an `ItemRejection`; a rejection
//! never aborts the surrounding batch.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::identity::{derive_stable_id, mint_short_id};
use crate::models::catalog::{Category, ContentItem, PersonalInfo, SkillCategory};

/// How an item without an `id` gets one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPolicy {
    /// Fresh random id: distinct entries may share a title.
    Random,
    /// Stable id from the title when present, random otherwise.
    StableFromTitle,
}

/// Why a single imported item was not added.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRejection {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub reason: String,
}

/// The four item sections of a portfolio bundle, in import order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortfolioSection {
    Education,
    Experience,
    Projects,
    Certifications,
}

impl PortfolioSection {
    pub const ALL: [PortfolioSection; 4] = [
        PortfolioSection::Education,
        PortfolioSection::Experience,
        PortfolioSection::Projects,
        PortfolioSection::Certifications,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PortfolioSection::Education => "education",
            PortfolioSection::Experience => "experience",
            PortfolioSection::Projects => "projects",
            PortfolioSection::Certifications => "certifications",
        }
    }

    /// Canonical category label stamped on every item of the section.
    pub fn category(&self) -> Category {
        match self {
            PortfolioSection::Education => Category::Education,
            PortfolioSection::Experience => Category::Experience,
            PortfolioSection::Projects => Category::Project,
            PortfolioSection::Certifications => Category::Certification,
        }
    }
}

/// Personal info, skills and categorized items imported in one call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortfolioBundle {
    #[serde(default)]
    pub personal_info: Option<PersonalInfo>,
    /// Parsed one entry at a time on import, so one bad entry is rejected alone.
    #[serde(default)]
    pub skills: Option<Vec<Value>>,
    #[serde(default)]
    pub education: Option<Vec<Value>>,
    #[serde(default)]
    pub experience: Option<Vec<Value>>,
    #[serde(default)]
    pub projects: Option<Vec<Value>>,
    #[serde(default)]
    pub certifications: Option<Vec<Value>>,
}

impl PortfolioBundle {
    pub fn take_section(&mut self, section: PortfolioSection) -> Vec<Value> {
        let slot = match section {
            PortfolioSection::Education => &mut self.education,
            PortfolioSection::Experience => &mut self.experience,
            PortfolioSection::Projects => &mut self.projects,
            PortfolioSection::Certifications => &mut self.certifications,
        };
        slot.take().unwrap_or_default()
    }
}

/// Per-category counts of what a portfolio import actually changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportCounts {
    pub personal_info: usize,
    pub education: usize,
    pub experience: usize,
    pub projects: usize,
    pub skills: usize,
    pub certifications: usize,
}

impl ImportCounts {
    pub fn section_mut(&mut self, section: PortfolioSection) -> &mut usize {
        match section {
            PortfolioSection::Education => &mut self.education,
            PortfolioSection::Experience => &mut self.experience,
            PortfolioSection::Projects => &mut self.projects,
            PortfolioSection::Certifications => &mut self.certifications,
        }
    }

    pub fn total(&self) -> usize {
        self.personal_info
            + self.education
            + self.experience
            + self.projects
            + self.skills
            + self.certifications
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchImportReport {
    pub imported_count: usize,
    pub duplicates_skipped: usize,
    pub rejected: Vec<ItemRejection>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PortfolioImportReport {
    pub counts: ImportCounts,
    pub total_items: usize,
    pub duplicates_skipped: usize,
    pub rejected: Vec<ItemRejection>,
}

/// Returns the item's id, assigning one per `policy` only when `id` is absent
/// or null. Numeric ids are kept in their string form; any other id is an error.
pub fn assign_id(fields: &mut Map<String, Value>, policy: IdPolicy) -> Result<String, String> {
    let supplied = match fields.get("id") {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) if id.trim().is_empty() => {
            return Err("id cannot be empty".to_string())
        }
        Some(Value::String(id)) => Some(id.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => return Err(format!("id must be a string, found {}", kind_of(other))),
    };

    let id = supplied.unwrap_or_else(|| match policy {
        IdPolicy::Random => mint_short_id(),
        IdPolicy::StableFromTitle => fields
            .get("title")
            .and_then(Value::as_str)
            .map(derive_stable_id)
            .unwrap_or_else(mint_short_id),
    });
    fields.insert("id".to_string(), Value::String(id.clone()));
    Ok(id)
}

/// Overwrites the item's category with the canonical label.
pub fn stamp_category(fields: &mut Map<String, Value>, category: Category) {
    fields.insert(
        "category".to_string(),
        Value::String(category.as_str().to_string()),
    );
}

/// Validates a prepared item against the `ContentItem` schema.
pub fn validate_item(fields: Map<String, Value>) -> Result<ContentItem, String> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| e.to_string())
}

/// Validates one raw skills entry.
pub fn parse_skill(raw: Value) -> Result<SkillCategory, String> {
    serde_json::from_value(raw).map_err(|e| e.to_string())
}

/// Unwraps a raw batch element into its field map.
pub fn as_object(raw: Value) -> Result<Map<String, Value>, String> {
    match raw {
        Value::Object(fields) => Ok(fields),
        other => Err(format!("expected an object, found {}", kind_of(&other))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
