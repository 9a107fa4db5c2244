//! Batch scoring of many resumes against one job description.
//!
//! Each candidate is an independent recruiter-mode call. Calls run with a
//! bounded number in flight and results come back in input order. One bad
//! candidate never sinks the batch; it is reported under `failures`.

use std::mem::discriminant;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::analyzer::score_candidate;
use crate::errors::AppError;
use crate::llm_client::StructuredCompletion;
use crate::recruiter::ranking::ScoredCandidate;

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub resume_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateFailure {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub scored: Vec<ScoredCandidate>,
    pub failures: Vec<CandidateFailure>,
}

pub async fn score_candidates(
    llm: &dyn StructuredCompletion,
    jd_text: &str,
    candidates: Vec<CandidateInput>,
    max_concurrency: usize,
) -> Result<BatchOutcome, AppError> {
    if jd_text.trim().is_empty() {
        return Err(AppError::BadRequest("jd_text is required".to_string()));
    }
    if candidates.is_empty() {
        return Err(AppError::BadRequest(
            "At least one candidate is required".to_string(),
        ));
    }

    let named: Vec<(String, String)> = candidates
        .into_iter()
        .enumerate()
        .map(|(i, c)| {
            let name = c
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("Candidate {}", i + 1));
            (name, c.resume_text)
        })
        .collect();

    if let Some((name, _)) = named.iter().find(|(_, text)| text.trim().is_empty()) {
        return Err(AppError::BadRequest(format!(
            "resume_text is required for {name}"
        )));
    }

    info!(
        "Scoring {} candidates (max {} in flight)",
        named.len(),
        max_concurrency
    );

    let results: Vec<(String, Result<_, AppError>)> = stream::iter(named)
        .map(|(name, resume_text)| async move {
            let result = score_candidate(llm, jd_text, &resume_text).await;
            (name, result)
        })
        .buffered(max_concurrency.max(1))
        .collect()
        .await;

    let mut outcome = BatchOutcome::default();
    let mut errors = Vec::new();

    for (name, result) in results {
        match result {
            Ok(scores) => outcome.scored.push(ScoredCandidate { name, scores }),
            Err(e) => {
                warn!("Scoring failed for {name}: {e}");
                outcome.failures.push(CandidateFailure {
                    name,
                    error: e.client_message(),
                });
                errors.push(e);
            }
        }
    }

    if outcome.scored.is_empty() {
        if let Some(err) = shared_systemic_error(errors) {
            return Err(err);
        }
    }

    info!(
        "Batch finished: {} scored, {} failed",
        outcome.scored.len(),
        outcome.failures.len()
    );
    Ok(outcome)
}

/// When every call failed for the same gateway-wide reason, that reason is
/// the answer for the whole batch.
fn shared_systemic_error(errors: Vec<AppError>) -> Option<AppError> {
    let first = errors.first()?;
    let systemic = matches!(
        first,
        AppError::RateLimited | AppError::QuotaExhausted | AppError::Configuration(_)
    );
    let kind = discriminant(first);
    if systemic && errors.iter().all(|e| discriminant(e) == kind) {
        errors.into_iter().next()
    } else {
        None
    }
}
