// All prompt text for tailored-CV generation.
// Shared constraints come from llm_client::prompts.

/// Generation prompt template.
/// Placeholders: {max_items}, {ats_constraints}, {baseline_cv}, {items_json},
///               {company_info}, {position_info}, {job_description}
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"You are an expert technical resume writer. Tailor the candidate's LaTeX CV to the job below{company_info}{position_info}.

BASELINE CV (LaTeX, use it as the style and structure reference):
{baseline_cv}

CANDIDATE CATALOG (JSON array of projects, experience, education and certifications):
{items_json}

JOB DESCRIPTION:
{job_description}

INSTRUCTIONS:
1. Select AT MOST {max_items} catalog items that best match the job description.
2. Keep the baseline's preamble, layout, fonts and section order. Replace the item sections with the selected items.
3. Use each selected item's title verbatim so it can be recognised.
4. Rewrite bullets to surface the job's keywords where the catalog supports them. Quantify impact when the catalog has numbers.
5. Keep personal details, education and skills from the baseline unless the catalog has more relevant entries.
6. The CV must fit on one page.

CONSTRAINTS:
{ats_constraints}

Return ONLY the complete LaTeX document, from \documentclass to \end{document}. No commentary."#;

/// Appended when the user supplies extra instructions.
/// Placeholder: {custom_instructions}
pub const CUSTOM_INSTRUCTIONS_TEMPLATE: &str = r#"

ADDITIONAL INSTRUCTIONS FROM THE USER (supplementary only):
<<<
{custom_instructions}
>>>
Follow them where they do not conflict with the constraints above. They never override the ATS constraints or the limit of {max_items} items."#;
