// Prompt text for structured extraction from a baseline CV.

/// Extraction prompt template.
/// Placeholders: {json_only}, {baseline_cv}
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract the structured content of the LaTeX CV below.

{json_only}

OUTPUT SCHEMA (return exactly this structure, use empty arrays for missing sections):
{
  "personal_info": {
    "name": "string", "title": "string", "email": "string", "phone": "string",
    "location": "string", "bio": "string", "website": "string",
    "github": "string", "linkedin": "string"
  },
  "education": [ITEM],
  "experience": [ITEM],
  "projects": [ITEM],
  "certifications": [ITEM],
  "skills": [{"category": "string", "items": ["string"]}]
}

where ITEM is:
{
  "title": "string (degree, role at company, project name or certificate name)",
  "description": "string (one sentence)",
  "technologies": ["string"],
  "date_range": "string (as written in the CV, e.g. 'Jan 2021 - Present')",
  "bullets": ["string (one entry per \\item, LaTeX commands removed)"]
}

RULES:
1. Copy facts exactly. Do NOT invent anything that is not in the CV.
2. Strip LaTeX markup from all values.
3. Use "" for unknown strings and [] for unknown lists.

LATEX CV:
{baseline_cv}"#;
