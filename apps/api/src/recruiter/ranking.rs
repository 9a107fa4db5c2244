//! Recruiter ranking: weighted composite scores, sort state and the ranked board.
//!
//! Algorithm:
//!   weighted = round(Σ(sub_score × weight) / Σ(weight))
//!   all weights zero → the candidate's own final_score
//!
//! Weights are independent 0–100 sliders and are not forced to sum to 100.

use serde::{Deserialize, Serialize};

use crate::analysis::models::RecruiterResult;
use crate::errors::AppError;

const MAX_WEIGHT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    pub lexical: u32,
    pub semantic: u32,
    pub project: u32,
    pub experience: u32,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            lexical: 25,
            semantic: 25,
            project: 25,
            experience: 25,
        }
    }
}

impl RankingWeights {
    pub fn validate(&self) -> Result<(), AppError> {
        let named = [
            ("lexical", self.lexical),
            ("semantic", self.semantic),
            ("project", self.project),
            ("experience", self.experience),
        ];
        match named.iter().find(|(_, w)| *w > MAX_WEIGHT) {
            Some((name, w)) => Err(AppError::BadRequest(format!(
                "weight '{name}' must be between 0 and {MAX_WEIGHT}, got {w}"
            ))),
            None => Ok(()),
        }
    }

    fn total(&self) -> u32 {
        self.lexical + self.semantic + self.project + self.experience
    }
}

/// A recruiter-mode result with the candidate name attached by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub name: String,
    #[serde(flatten)]
    pub scores: RecruiterResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    /// 1-based position in the current sort order.
    pub rank: usize,
    pub weighted_score: u8,
    #[serde(flatten)]
    pub candidate: ScoredCandidate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// The weighted composite, not the model's own final_score.
    #[default]
    FinalScore,
    LexicalScore,
    SemanticScore,
    ProjectDepth,
    ExperienceScore,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Desc,
    Asc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    /// Same key flips the direction; a new key starts descending.
    pub fn toggle(self, key: SortKey) -> Self {
        if self.key == key {
            let direction = match self.direction {
                SortDirection::Desc => SortDirection::Asc,
                SortDirection::Asc => SortDirection::Desc,
            };
            Self { key, direction }
        } else {
            Self {
                key,
                direction: SortDirection::Desc,
            }
        }
    }
}

pub fn weighted_score(scores: &RecruiterResult, weights: &RankingWeights) -> u8 {
    let total = weights.total();
    if total == 0 {
        return scores.final_score;
    }

    let sum = scores.lexical_score as u32 * weights.lexical
        + scores.semantic_score as u32 * weights.semantic
        + scores.project_depth as u32 * weights.project
        + scores.experience_score as u32 * weights.experience;

    // round(sum / total), halves rounding up
    ((2 * sum + total) / (2 * total)) as u8
}

fn sort_value(candidate: &ScoredCandidate, weighted: u8, key: SortKey) -> u8 {
    let s = &candidate.scores;
    match key {
        SortKey::FinalScore => weighted,
        SortKey::LexicalScore => s.lexical_score,
        SortKey::SemanticScore => s.semantic_score,
        SortKey::ProjectDepth => s.project_depth,
        SortKey::ExperienceScore => s.experience_score,
    }
}

/// Scores, sorts (stable, ties keep input order) and numbers the candidates.
pub fn rank_candidates(
    candidates: Vec<ScoredCandidate>,
    weights: &RankingWeights,
    sort: SortState,
) -> Vec<RankedCandidate> {
    let mut scored: Vec<(u8, ScoredCandidate)> = candidates
        .into_iter()
        .map(|c| (weighted_score(&c.scores, weights), c))
        .collect();

    scored.sort_by(|(wa, a), (wb, b)| {
        let va = sort_value(a, *wa, sort.key);
        let vb = sort_value(b, *wb, sort.key);
        match sort.direction {
            SortDirection::Desc => vb.cmp(&va),
            SortDirection::Asc => va.cmp(&vb),
        }
    });

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (weighted_score, candidate))| RankedCandidate {
            rank: i + 1,
            weighted_score,
            candidate,
        })
        .collect()
}
