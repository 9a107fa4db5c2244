// Scoring endpoint: mode dispatch, forced tool-call schemas, result validation.
// All model calls go through llm_client.

pub mod analyzer;
pub mod dispatcher;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod schema;
