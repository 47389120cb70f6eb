// Baseline extraction: turns an uploaded CV into catalog items through the
// AI collaborator and merges them via the portfolio import path.

pub mod extractor;
pub mod prompts;
