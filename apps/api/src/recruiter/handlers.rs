use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::recruiter::batch::{score_candidates, CandidateFailure, CandidateInput};
use crate::recruiter::export::{export_csv, CSV_FILE_NAME};
use crate::recruiter::ranking::{
    rank_candidates, RankedCandidate, RankingWeights, ScoredCandidate, SortKey, SortState,
};
use crate::state::AppState;

const UNTITLED_JD: &str = "Untitled";

#[derive(Debug, Deserialize)]
pub struct ScoreBatchRequest {
    pub jd_title: Option<String>,
    #[serde(default)]
    pub jd_text: String,
    #[serde(default)]
    pub candidates: Vec<CandidateInput>,
    #[serde(default)]
    pub weights: RankingWeights,
    #[serde(default)]
    pub sort: SortState,
}

#[derive(Debug, Serialize)]
pub struct ScoreBatchResponse {
    pub batch_id: Uuid,
    pub scored_at: DateTime<Utc>,
    pub jd_title: String,
    pub weights: RankingWeights,
    pub sort: SortState,
    pub candidates: Vec<RankedCandidate>,
    pub failures: Vec<CandidateFailure>,
}

/// Body shared by the rank and export endpoints: an already-scored board.
#[derive(Debug, Deserialize)]
pub struct RankRequest {
    #[serde(default)]
    pub candidates: Vec<ScoredCandidate>,
    #[serde(default)]
    pub weights: RankingWeights,
    #[serde(default)]
    pub sort: SortState,
    /// A clicked column header. Applied to `sort` before ranking.
    pub toggle: Option<SortKey>,
}

impl RankRequest {
    fn effective_sort(&self) -> SortState {
        match self.toggle {
            Some(key) => self.sort.toggle(key),
            None => self.sort,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub weights: RankingWeights,
    pub sort: SortState,
    pub candidates: Vec<RankedCandidate>,
}

/// POST /api/v1/recruiter/score
///
/// Scores every candidate against the job description and returns the ranked board.
pub async fn handle_score_batch(
    State(state): State<AppState>,
    payload: Result<Json<ScoreBatchRequest>, JsonRejection>,
) -> Result<Json<ScoreBatchResponse>, AppError> {
    let Json(request) = payload?;
    request.weights.validate()?;

    let jd_title = request
        .jd_title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED_JD.to_string());

    let outcome = score_candidates(
        state.llm.as_ref(),
        &request.jd_text,
        request.candidates,
        state.config.recruiter_max_concurrency,
    )
    .await?;

    let batch_id = Uuid::new_v4();
    info!(
        "Batch {} for '{}': {} ranked, {} failed",
        batch_id,
        jd_title,
        outcome.scored.len(),
        outcome.failures.len()
    );

    Ok(Json(ScoreBatchResponse {
        batch_id,
        scored_at: Utc::now(),
        jd_title,
        weights: request.weights,
        sort: request.sort,
        candidates: rank_candidates(outcome.scored, &request.weights, request.sort),
        failures: outcome.failures,
    }))
}

/// POST /api/v1/recruiter/rank
///
/// Re-ranks a scored board under new weights or sort. No upstream calls.
pub async fn handle_rank(
    payload: Result<Json<RankRequest>, JsonRejection>,
) -> Result<Json<RankResponse>, AppError> {
    let Json(request) = payload?;
    request.weights.validate()?;

    let sort = request.effective_sort();
    Ok(Json(RankResponse {
        weights: request.weights,
        sort,
        candidates: rank_candidates(request.candidates, &request.weights, sort),
    }))
}

/// POST /api/v1/recruiter/export
pub async fn handle_export(
    payload: Result<Json<RankRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    request.weights.validate()?;

    let sort = request.effective_sort();
    let ranked = rank_candidates(request.candidates, &request.weights, sort);
    let csv = export_csv(&ranked)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
