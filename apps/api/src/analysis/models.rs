//! Request and result shapes for the three analysis modes.
//!
//! Result types mirror the tool schemas in `analysis::schema`: unknown fields
//! are rejected and every required field must be present. Scores are clamped
//! to 0–100 on the way in, since schema ranges are advisory to the model.

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use tracing::warn;

// ────────────────────────────────────────────────────────────────────────────
// Inbound request
// ────────────────────────────────────────────────────────────────────────────

/// Untagged bag of optional fields, discriminated by `mode`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: Option<String>,
    /// Free-form. "internship" | "fulltime" | "dream" by convention.
    pub goal: Option<String>,
    pub target_role: Option<String>,
    pub target_company: Option<String>,
    pub jd_text: Option<String>,
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    Score,
    DreamRole,
    Recruiter,
}

impl AnalysisMode {
    /// `None` means the default mode; an unrecognised string is `Err` with the raw value.
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        match raw.map(str::trim) {
            None | Some("") | Some("score") => Ok(AnalysisMode::Score),
            Some("dream_role") => Ok(AnalysisMode::DreamRole),
            Some("recruiter") => Ok(AnalysisMode::Recruiter),
            Some(other) => Err(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Score => "score",
            AnalysisMode::DreamRole => "dream_role",
            AnalysisMode::Recruiter => "recruiter",
        }
    }
}

/// A request whose mode-required fields have been checked.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisInput {
    Score {
        resume_text: String,
        goal: Option<String>,
    },
    DreamRole {
        resume_text: String,
        target_role: String,
        target_company: Option<String>,
    },
    Recruiter {
        jd_text: String,
        resume_text: String,
    },
}

impl AnalysisInput {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            AnalysisInput::Score { .. } => AnalysisMode::Score,
            AnalysisInput::DreamRole { .. } => AnalysisMode::DreamRole,
            AnalysisInput::Recruiter { .. } => AnalysisMode::Recruiter,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Score mode
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceLabel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagStatus {
    Pass,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreBreakdown {
    #[serde(deserialize_with = "clamped_score")]
    pub lexical_score: u8,
    #[serde(deserialize_with = "clamped_score")]
    pub semantic_score: u8,
    #[serde(deserialize_with = "clamped_score")]
    pub project_depth: u8,
    #[serde(deserialize_with = "clamped_score")]
    pub experience_score: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BestFitRole {
    pub role: String,
    #[serde(rename = "match", deserialize_with = "clamped_score")]
    pub match_score: u8,
    #[serde(rename = "type")]
    pub role_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoadmapItem {
    pub task: String,
    pub time: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntegrityFlag {
    pub label: String,
    pub status: FlagStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreResult {
    #[serde(deserialize_with = "clamped_score")]
    pub final_score: u8,
    #[serde(deserialize_with = "clamped_percentile")]
    pub percentile_rank: f64,
    pub percentile_label: String,
    pub confidence_label: ConfidenceLabel,
    pub breakdown: ScoreBreakdown,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub best_fit_roles: Vec<BestFitRole>,
    pub roadmap: Vec<RoadmapItem>,
    pub integrity_flags: Vec<IntegrityFlag>,
}

// ────────────────────────────────────────────────────────────────────────────
// Dream-role mode
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapImportance {
    Critical,
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillGap {
    pub skill: String,
    pub importance: GapImportance,
    /// Current proficiency, 0–100.
    #[serde(deserialize_with = "clamped_score")]
    pub current: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeeklyTask {
    pub week: String,
    pub task: String,
    pub difficulty: Difficulty,
    pub time_estimate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DreamRoleResult {
    #[serde(deserialize_with = "clamped_score")]
    pub readiness: u8,
    pub gaps: Vec<SkillGap>,
    pub strengths: Vec<String>,
    pub roadmap: Vec<WeeklyTask>,
}

// ────────────────────────────────────────────────────────────────────────────
// Recruiter mode
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecruiterResult {
    #[serde(deserialize_with = "clamped_score")]
    pub final_score: u8,
    #[serde(deserialize_with = "clamped_score")]
    pub lexical_score: u8,
    #[serde(deserialize_with = "clamped_score")]
    pub semantic_score: u8,
    #[serde(deserialize_with = "clamped_score")]
    pub project_depth: u8,
    #[serde(deserialize_with = "clamped_score")]
    pub experience_score: u8,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub summary: String,
    /// Absent means no flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<Vec<String>>,
}

/// Whichever result the selected mode produced. Serialized without a tag so
/// the response body is exactly the mode's result object.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Score(ScoreResult),
    DreamRole(DreamRoleResult),
    Recruiter(RecruiterResult),
}

// ────────────────────────────────────────────────────────────────────────────
// Score clamping
// ────────────────────────────────────────────────────────────────────────────

/// Accepts any JSON number, rounds it, and clamps to 0–100.
pub(crate) fn clamped_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    let value = clamp_to_range(raw).map_err(D::Error::custom)?;
    Ok(value.round() as u8)
}

/// Like `clamped_score` but keeps the fractional part.
pub(crate) fn clamped_percentile<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    clamp_to_range(raw).map_err(D::Error::custom)
}

fn clamp_to_range(raw: f64) -> Result<f64, String> {
    if !raw.is_finite() {
        return Err(format!("score {raw} is not a finite number"));
    }
    let clamped = raw.clamp(0.0, 100.0);
    if clamped != raw {
        warn!("Model returned out-of-range score {raw}; clamped to {clamped}");
    }
    Ok(clamped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{dream_role_args, recruiter_args, score_args};
    use serde_json::json;

    #[test]
    fn test_mode_defaults_to_score() {
        assert_eq!(AnalysisMode::parse(None), Ok(AnalysisMode::Score));
        assert_eq!(AnalysisMode::parse(Some("")), Ok(AnalysisMode::Score));
        assert_eq!(AnalysisMode::parse(Some("score")), Ok(AnalysisMode::Score));
    }

    #[test]
    fn test_mode_parses_known_values() {
        assert_eq!(AnalysisMode::parse(Some("dream_role")), Ok(AnalysisMode::DreamRole));
        assert_eq!(AnalysisMode::parse(Some("recruiter")), Ok(AnalysisMode::Recruiter));
    }

    #[test]
    fn test_mode_rejects_unknown() {
        assert_eq!(AnalysisMode::parse(Some("roast")), Err("roast".to_string()));
    }

    #[test]
    fn test_score_result_deserializes() {
        let result: ScoreResult = serde_json::from_value(score_args()).unwrap();
        assert_eq!(result.final_score, 78);
        assert_eq!(result.confidence_label, ConfidenceLabel::High);
        assert_eq!(result.best_fit_roles[0].match_score, 84);
        assert_eq!(result.roadmap[0].priority, Priority::High);
        assert_eq!(result.integrity_flags[0].status, FlagStatus::Pass);
        assert!((result.percentile_rank - 82.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_score_result_round_trips_wire_names() {
        let result: ScoreResult = serde_json::from_value(score_args()).unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["best_fit_roles"][0]["match"], 84);
        assert_eq!(value["best_fit_roles"][0]["type"], "fulltime");
        assert_eq!(value["confidence_label"], "HIGH");
    }

    #[test]
    fn test_all_scores_stay_within_bounds() {
        let mut args = score_args();
        args["final_score"] = json!(140);
        args["percentile_rank"] = json!(-3.5);
        args["breakdown"]["lexical_score"] = json!(-20);
        args["breakdown"]["semantic_score"] = json!(77.6);
        args["best_fit_roles"][0]["match"] = json!(250.0);

        let result: ScoreResult = serde_json::from_value(args).unwrap();
        assert_eq!(result.final_score, 100);
        assert_eq!(result.percentile_rank, 0.0);
        assert_eq!(result.breakdown.lexical_score, 0);
        assert_eq!(result.breakdown.semantic_score, 78);
        assert_eq!(result.best_fit_roles[0].match_score, 100);
    }

    #[test]
    fn test_confidence_label_rejects_lowercase() {
        let mut args = score_args();
        args["confidence_label"] = json!("high");
        assert!(serde_json::from_value::<ScoreResult>(args).is_err());
    }

    #[test]
    fn test_integrity_status_is_pass_or_fail() {
        let mut args = score_args();
        args["integrity_flags"][0]["status"] = json!("warn");
        assert!(serde_json::from_value::<ScoreResult>(args).is_err());
    }

    #[test]
    fn test_missing_required_field_is_hard_failure() {
        let mut args = score_args();
        args.as_object_mut().unwrap().remove("integrity_flags");
        let err = serde_json::from_value::<ScoreResult>(args).unwrap_err();
        assert!(err.to_string().contains("integrity_flags"));
    }

    #[test]
    fn test_extra_field_is_rejected() {
        let mut args = recruiter_args(80, [80, 78, 90, 71]);
        args["hallucinated"] = json!(true);
        assert!(serde_json::from_value::<RecruiterResult>(args).is_err());
    }

    #[test]
    fn test_non_numeric_score_is_rejected() {
        let mut args = recruiter_args(80, [80, 78, 90, 71]);
        args["final_score"] = json!("eighty");
        assert!(serde_json::from_value::<RecruiterResult>(args).is_err());
    }

    #[test]
    fn test_recruiter_flags_are_optional() {
        let result: RecruiterResult =
            serde_json::from_value(recruiter_args(80, [80, 78, 90, 71])).unwrap();
        assert!(result.flags.is_none());
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("flags").is_none());
    }

    #[test]
    fn test_dream_role_resource_url_is_optional() {
        let mut args = dream_role_args();
        args["roadmap"][0].as_object_mut().unwrap().remove("resource_url");
        let result: DreamRoleResult = serde_json::from_value(args).unwrap();
        assert!(result.roadmap[0].resource_url.is_none());
        assert_eq!(result.roadmap[0].difficulty, Difficulty::Hard);
        assert_eq!(result.gaps[0].importance, GapImportance::Critical);
    }

    #[test]
    fn test_difficulty_is_capitalized() {
        let mut args = dream_role_args();
        args["roadmap"][0]["difficulty"] = json!("hard");
        assert!(serde_json::from_value::<DreamRoleResult>(args).is_err());
    }

    #[test]
    fn test_untagged_result_serializes_bare_object() {
        let result: DreamRoleResult = serde_json::from_value(dream_role_args()).unwrap();
        let value = serde_json::to_value(AnalysisResult::DreamRole(result)).unwrap();
        assert_eq!(value["readiness"], 62);
        assert!(value.get("DreamRole").is_none());
    }
}
