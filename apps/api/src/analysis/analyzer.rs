//! Analysis pipeline: dispatch → structured completion → result validation.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use crate::analysis::dispatcher::plan;
use crate::analysis::models::{AnalysisInput, AnalysisMode, AnalysisResult, RecruiterResult};
use crate::errors::AppError;
use crate::llm_client::StructuredCompletion;

/// Runs one analysis end to end and returns the typed result for its mode.
pub async fn analyze(
    llm: &dyn StructuredCompletion,
    input: &AnalysisInput,
) -> Result<AnalysisResult, AppError> {
    let mode = input.mode();
    info!("Running {} analysis", mode.as_str());

    let args = llm.complete(&plan(input)).await?;
    parse_result(mode, args)
}

/// Scores one candidate against a job description (recruiter mode).
pub async fn score_candidate(
    llm: &dyn StructuredCompletion,
    jd_text: &str,
    resume_text: &str,
) -> Result<RecruiterResult, AppError> {
    let input = AnalysisInput::Recruiter {
        jd_text: jd_text.to_string(),
        resume_text: resume_text.to_string(),
    };
    let args = llm.complete(&plan(&input)).await?;
    decode(args)
}

/// Validates raw tool arguments against the result type for `mode`.
pub fn parse_result(mode: AnalysisMode, args: Value) -> Result<AnalysisResult, AppError> {
    Ok(match mode {
        AnalysisMode::Score => AnalysisResult::Score(decode(args)?),
        AnalysisMode::DreamRole => AnalysisResult::DreamRole(decode(args)?),
        AnalysisMode::Recruiter => AnalysisResult::Recruiter(decode(args)?),
    })
}

fn decode<T: DeserializeOwned>(args: Value) -> Result<T, AppError> {
    serde_json::from_value(args).map_err(|e| AppError::ResultValidation(e.to_string()))
}
