//! Catalog identity: content-addressed ids for deduplication, random ids otherwise.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Length of every id this module produces.
pub const ID_LEN: usize = 8;

/// Derives the stable id for a title: lower-cased and trimmed, then hashed.
///
/// Titles that normalize identically always map to the same id. That is how
/// re-imports of the same baseline collapse onto existing catalog entries.
pub fn derive_stable_id(title: &str) -> String {
    let normalized = title.trim().to_lowercase();
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..ID_LEN].to_string()
}

/// Mints a fresh random short id (not derived from content).
pub fn mint_short_id() -> String {
    Uuid::new_v4().simple().to_string()[..ID_LEN].to_string()
}
