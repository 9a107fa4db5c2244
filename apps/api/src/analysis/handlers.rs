//! Axum route handlers for the scoring endpoint.

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use crate::analysis::analyzer::analyze;
use crate::analysis::dispatcher::validate;
use crate::analysis::models::{AnalysisResult, AnalyzeRequest};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/analyze-resume
///
/// Validates the request for its mode, forces a structured tool call upstream,
/// and returns the validated result object for that mode.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let Json(request) = payload?;
    let input = validate(request)?;
    let result = analyze(state.llm.as_ref(), &input).await?;
    Ok(Json(result))
}

/// OPTIONS /api/v1/analyze-resume
///
/// Answers bare OPTIONS probes; real preflights are handled by the CORS layer.
pub async fn handle_preflight() -> StatusCode {
    StatusCode::OK
}
