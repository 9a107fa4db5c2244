//! Resume text extraction from uploaded files.

use tracing::warn;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    PlainText,
}

impl ResumeFormat {
    /// Detects the format from the declared content type, falling back to the
    /// file extension. DOCX and everything else are unsupported.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Option<Self> {
        let content_type = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase());
        match content_type.as_deref() {
            Some("application/pdf") => return Some(ResumeFormat::Pdf),
            Some("text/plain") => return Some(ResumeFormat::PlainText),
            _ => {}
        }

        let extension = file_name?.rsplit_once('.')?.1.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(ResumeFormat::Pdf),
            "txt" | "text" => Some(ResumeFormat::PlainText),
            _ => None,
        }
    }
}

/// Extracts and normalizes text. PDF parsing runs on the blocking pool since
/// it is CPU-bound and may panic on malformed input.
pub async fn extract_text(format: ResumeFormat, bytes: Vec<u8>) -> Result<String, AppError> {
    let raw = match format {
        ResumeFormat::PlainText => String::from_utf8(bytes).map_err(|_| {
            AppError::UnprocessableEntity("Text file is not valid UTF-8".to_string())
        })?,
        ResumeFormat::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes)
        })
        .await
        .map_err(|e| {
            warn!("PDF extraction task failed: {e}");
            unreadable_pdf()
        })?
        .map_err(|e| {
            warn!("PDF extraction failed: {e:?}");
            unreadable_pdf()
        })?,
    };

    let text = normalize_whitespace(&raw);
    if text.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No text could be extracted from the uploaded file".to_string(),
        ));
    }
    Ok(text)
}

fn unreadable_pdf() -> AppError {
    AppError::UnprocessableEntity("Could not read the uploaded PDF".to_string())
}

/// Trims trailing whitespace on each line and collapses runs of blank lines.
fn normalize_whitespace(raw: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = true;

    for line in raw.lines().map(str::trim_end) {
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        lines.push(if blank { "" } else { line });
        previous_blank = blank;
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
