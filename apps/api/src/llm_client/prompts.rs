// Shared prompt fragments.
// Each orchestrator that calls the model keeps its own prompts.rs alongside it;
// this file holds the pieces more than one of them needs.

/// Constraints that no user-supplied instruction may override.
pub const ATS_CONSTRAINTS: &str = "\
    The result MUST stay ATS-friendly: single column, standard section headings, \
    no tables, no images, no text boxes, no icons in place of words. \
    Do NOT invent employers, titles, dates, degrees or metrics that are not in the \
    provided material.";

/// Instruction for replies that are parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// Fills `{key}` placeholders in a single pass. Substituted values are never
/// re-scanned, and braces that do not name a known key are copied through.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let hit = after.find('}').and_then(|end| {
            let key = &after[..end];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (end, *value))
        });
        match hit {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_replaces_known_keys() {
        let out = fill_template("Hi {name}, cap {n}.", &[("name", "Ada"), ("n", "5")]);
        assert_eq!(out, "Hi Ada, cap 5.");
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let out = fill_template("{\"title\": \"{x}\"} {name}", &[("name", "Ada")]);
        assert_eq!(out, "{\"title\": \"{x}\"} Ada");
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let out = fill_template("{a}|{b}", &[("a", "{b}"), ("b", "B")]);
        assert_eq!(out, "{b}|B");
    }

    #[test]
    fn test_fill_template_unclosed_brace() {
        assert_eq!(fill_template("tail {", &[("a", "A")]), "tail {");
    }
}
