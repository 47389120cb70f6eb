// Content catalog: deduplicated résumé items plus personal info and skills.
// Ids are content-addressed by normalized title on the create/portfolio paths
// and random on the raw batch-import path.

pub mod handlers;
pub mod identity;
pub mod import;
pub mod store;

pub use store::CatalogStore;
