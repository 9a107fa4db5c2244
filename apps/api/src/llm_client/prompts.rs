// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments appended to those prompts.

/// Appended to every system prompt sent with a forced tool call.
pub const STRUCTURED_OUTPUT_INSTRUCTION: &str = "\
    Always answer by calling the provided function exactly once. \
    Never reply in prose. \
    Every numeric score must be an integer between 0 and 100.";

/// Honesty guard shared by the candidate-facing analyses.
pub const HONESTY_INSTRUCTION: &str = "Be realistic and honest.";

/// Joins a role-specific system prompt with the structured-output rules.
pub fn with_structured_output(system: &str) -> String {
    format!("{system}\n\n{STRUCTURED_OUTPUT_INSTRUCTION}")
}
