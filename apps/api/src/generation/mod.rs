// Tailored CV generation.
// Implements: prompt construction, the single AI round trip, fence unwrap,
// the title-mention selection heuristic, and persistence to history.
// All model calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod selection;
