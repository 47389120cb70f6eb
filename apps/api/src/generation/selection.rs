//! Which catalog items ended up in a generated CV.
//!
//! This is a heuristic, not a guarantee. An item counts as selected when its
//! trimmed title occurs anywhere in the document, compared case-insensitively.
//!
//! Known failure modes:
//! - false positive: a title that is a substring of another title, or of any
//!   unrelated text in the document ("Go" inside "Google");
//! - false negative: the model paraphrased or shortened the title.
//!
//! It does not check that the model honoured `max_items`.

use crate::models::catalog::ContentItem;

/// Ids of the items whose title is mentioned in `document`, in catalog order.
pub fn mentioned_item_ids(document: &str, items: &[ContentItem]) -> Vec<String> {
    let haystack = document.to_lowercase();
    items
        .iter()
        .filter(|item| {
            let title = item.title.trim();
            !title.is_empty() && haystack.contains(&title.to_lowercase())
        })
        .map(|item| item.id.clone())
        .collect()
}
