//! Mode Dispatcher: validates an inbound request and builds the prompt pair
//! and tool schema for its mode. Pure construction, no I/O.

use crate::analysis::models::{AnalysisInput, AnalysisMode, AnalyzeRequest};
use crate::analysis::prompts::{
    ANY_COMPANY, DEFAULT_GOAL, DREAM_ROLE_PROMPT_TEMPLATE, DREAM_ROLE_SYSTEM_TEMPLATE,
    RECRUITER_PROMPT_TEMPLATE, RECRUITER_SYSTEM, SCORE_PROMPT_TEMPLATE, SCORE_SYSTEM_TEMPLATE,
};
use crate::analysis::schema::tool_for;
use crate::errors::AppError;
use crate::llm_client::prompts::{with_structured_output, HONESTY_INSTRUCTION};
use crate::llm_client::StructuredRequest;

/// Checks the fields the selected mode requires. Nothing is sent upstream
/// for a request that fails here.
pub fn validate(request: AnalyzeRequest) -> Result<AnalysisInput, AppError> {
    let mode = AnalysisMode::parse(request.mode.as_deref()).map_err(|unknown| {
        AppError::BadRequest(format!(
            "Unknown mode '{unknown}'. Expected one of: score, dream_role, recruiter"
        ))
    })?;

    let resume_text = required(request.resume_text, "resume_text", mode)?;

    let input = match mode {
        AnalysisMode::Score => AnalysisInput::Score {
            resume_text,
            goal: optional(request.goal),
        },
        AnalysisMode::DreamRole => AnalysisInput::DreamRole {
            resume_text,
            target_role: required(request.target_role, "target_role", mode)?,
            target_company: optional(request.target_company),
        },
        AnalysisMode::Recruiter => AnalysisInput::Recruiter {
            jd_text: required(request.jd_text, "jd_text", mode)?,
            resume_text,
        },
    };

    Ok(input)
}

/// Builds the system/user prompts and forced tool for a validated request.
pub fn plan(input: &AnalysisInput) -> StructuredRequest {
    let (system, user) = match input {
        AnalysisInput::Score { resume_text, goal } => (
            fill_template(
                SCORE_SYSTEM_TEMPLATE,
                &[
                    ("honesty", HONESTY_INSTRUCTION),
                    ("goal", goal.as_deref().unwrap_or(DEFAULT_GOAL)),
                ],
            ),
            fill_template(SCORE_PROMPT_TEMPLATE, &[("resume_text", resume_text)]),
        ),
        AnalysisInput::DreamRole {
            resume_text,
            target_role,
            target_company,
        } => (
            fill_template(DREAM_ROLE_SYSTEM_TEMPLATE, &[("honesty", HONESTY_INSTRUCTION)]),
            fill_template(
                DREAM_ROLE_PROMPT_TEMPLATE,
                &[
                    ("resume_text", resume_text),
                    ("target_role", target_role),
                    (
                        "target_company",
                        target_company.as_deref().unwrap_or(ANY_COMPANY),
                    ),
                ],
            ),
        ),
        AnalysisInput::Recruiter {
            jd_text,
            resume_text,
        } => (
            RECRUITER_SYSTEM.to_string(),
            fill_template(
                RECRUITER_PROMPT_TEMPLATE,
                &[("jd_text", jd_text), ("resume_text", resume_text)],
            ),
        ),
    };

    StructuredRequest {
        system_prompt: with_structured_output(&system),
        user_prompt: user,
        tool: tool_for(input.mode()),
    }
}

fn required(value: Option<String>, field: &str, mode: AnalysisMode) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(AppError::BadRequest(format!(
            "{field} is required for mode '{}'",
            mode.as_str()
        ))),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Single-pass placeholder substitution. Substituted values are never
/// rescanned, so resume text containing `{jd_text}` stays literal.
fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let hit = vars.iter().find(|(key, _)| {
            tail[1..].starts_with(key) && tail[1 + key.len()..].starts_with('}')
        });
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
