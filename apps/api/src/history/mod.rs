// Generated résumé history: metadata newest-first, rendered artifacts keyed by job id.
// HTTP handlers for history live in generation::handlers next to the generate endpoint.

pub mod store;

pub use store::HistoryStore;
