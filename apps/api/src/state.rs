use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::StructuredCompletion;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Structured-completion backend. `LlmClient` in production; swapped for
    /// stubs in tests.
    pub llm: Arc<dyn StructuredCompletion>,
    pub config: Config,
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(llm: Arc<dyn StructuredCompletion>) -> Self {
        Self {
            llm,
            config: Config::for_tests("http://127.0.0.1:9/v1/chat/completions", Some("test-key")),
        }
    }
}
