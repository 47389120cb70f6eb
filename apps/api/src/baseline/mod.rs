// Baseline document: the user's master résumé source, replaced on every upload.

pub mod handlers;
pub mod store;

pub use store::BaselineStore;
