//! JSON schemas for the forced tool calls.
//!
//! Every object level carries `additionalProperties: false` and an explicit
//! `required` list so the provider cannot drop or add fields undetected.
//! Keep these in sync with the structs in `analysis::models`.

use serde_json::{json, Value};

use crate::analysis::models::AnalysisMode;
use crate::llm_client::ToolSpec;

pub const SCORE_TOOL: &str = "resume_analysis";
pub const DREAM_ROLE_TOOL: &str = "dream_role_analysis";
pub const RECRUITER_TOOL: &str = "recruiter_score";

pub fn tool_for(mode: AnalysisMode) -> ToolSpec {
    match mode {
        AnalysisMode::Score => ToolSpec {
            name: SCORE_TOOL,
            description: "Return comprehensive resume analysis with scores",
            parameters: score_schema(),
        },
        AnalysisMode::DreamRole => ToolSpec {
            name: DREAM_ROLE_TOOL,
            description: "Return dream role readiness analysis",
            parameters: dream_role_schema(),
        },
        AnalysisMode::Recruiter => ToolSpec {
            name: RECRUITER_TOOL,
            description: "Return recruiter scoring for candidate vs JD",
            parameters: recruiter_schema(),
        },
    }
}

fn score(description: &str) -> Value {
    json!({ "type": "integer", "minimum": 0, "maximum": 100, "description": description })
}

fn string_list() -> Value {
    json!({ "type": "array", "items": { "type": "string" } })
}

pub fn score_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "final_score": score("Overall score 0-100"),
            "percentile_rank": { "type": "number", "minimum": 0, "maximum": 100 },
            "percentile_label": { "type": "string" },
            "confidence_label": { "type": "string", "enum": ["HIGH", "MEDIUM", "LOW"] },
            "breakdown": {
                "type": "object",
                "properties": {
                    "lexical_score": score("Keyword coverage 0-100"),
                    "semantic_score": score("Semantic relevance 0-100"),
                    "project_depth": score("Depth of project work 0-100"),
                    "experience_score": score("Strength of experience 0-100")
                },
                "required": ["lexical_score", "semantic_score", "project_depth", "experience_score"],
                "additionalProperties": false
            },
            "matched_skills": string_list(),
            "missing_skills": string_list(),
            "best_fit_roles": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "role": { "type": "string" },
                        "match": score("Role match 0-100"),
                        "type": { "type": "string" }
                    },
                    "required": ["role", "match", "type"],
                    "additionalProperties": false
                }
            },
            "roadmap": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "task": { "type": "string" },
                        "time": { "type": "string" },
                        "priority": { "type": "string", "enum": ["high", "medium", "low"] }
                    },
                    "required": ["task", "time", "priority"],
                    "additionalProperties": false
                }
            },
            "integrity_flags": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "label": { "type": "string" },
                        "status": { "type": "string", "enum": ["pass", "fail"] }
                    },
                    "required": ["label", "status"],
                    "additionalProperties": false
                }
            }
        },
        "required": [
            "final_score", "percentile_rank", "percentile_label", "confidence_label",
            "breakdown", "matched_skills", "missing_skills", "best_fit_roles",
            "roadmap", "integrity_flags"
        ],
        "additionalProperties": false
    })
}

pub fn dream_role_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "readiness": score("Readiness percentage 0-100"),
            "gaps": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "skill": { "type": "string" },
                        "importance": { "type": "string", "enum": ["critical", "high", "medium"] },
                        "current": score("Current proficiency 0-100")
                    },
                    "required": ["skill", "importance", "current"],
                    "additionalProperties": false
                }
            },
            "strengths": string_list(),
            "roadmap": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "week": { "type": "string" },
                        "task": { "type": "string" },
                        "difficulty": { "type": "string", "enum": ["Easy", "Medium", "Hard"] },
                        "time_estimate": { "type": "string" },
                        "resource_url": { "type": "string" }
                    },
                    "required": ["week", "task", "difficulty", "time_estimate"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["readiness", "gaps", "strengths", "roadmap"],
        "additionalProperties": false
    })
}

pub fn recruiter_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "final_score": score("Overall fit 0-100"),
            "lexical_score": score("Keyword overlap with the JD 0-100"),
            "semantic_score": score("Semantic fit with the JD 0-100"),
            "project_depth": score("Depth of relevant projects 0-100"),
            "experience_score": score("Relevance of experience 0-100"),
            "matched_skills": string_list(),
            "missing_skills": string_list(),
            "summary": { "type": "string" },
            "flags": string_list()
        },
        "required": [
            "final_score", "lexical_score", "semantic_score", "project_depth",
            "experience_score", "matched_skills", "missing_skills", "summary"
        ],
        "additionalProperties": false
    })
}
