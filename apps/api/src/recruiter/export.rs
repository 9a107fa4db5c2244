//! CSV export of a ranked candidate board.

use anyhow::{anyhow, Context};
use csv::{QuoteStyle, WriterBuilder};

use crate::errors::AppError;
use crate::recruiter::ranking::RankedCandidate;

pub const CSV_FILE_NAME: &str = "candidates.csv";

pub const CSV_HEADERS: [&str; 8] = [
    "Name",
    "Weighted Score",
    "Lexical",
    "Semantic",
    "Projects",
    "Experience",
    "Matched Skills",
    "Missing Skills",
];

/// One row per candidate, in the board's order. Text fields (names, skill
/// lists, headers) are always quoted; numbers are written bare.
pub fn export_csv(ranked: &[RankedCandidate]) -> Result<String, AppError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADERS)
        .context("Failed to write CSV header")?;

    for row in ranked {
        let c = &row.candidate;
        let s = &c.scores;
        writer
            .write_record([
                c.name.clone(),
                row.weighted_score.to_string(),
                s.lexical_score.to_string(),
                s.semantic_score.to_string(),
                s.project_depth.to_string(),
                s.experience_score.to_string(),
                s.matched_skills.join(", "),
                s.missing_skills.join(", "),
            ])
            .with_context(|| format!("Failed to write CSV row for {}", c.name))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV writer: {}", e.error()))?;

    Ok(String::from_utf8(bytes).context("CSV output was not UTF-8")?)
}
