use axum::{
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::resumes::extract::{extract_text, ResumeFormat};

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub file_name: String,
    pub resume_text: String,
    pub char_count: usize,
}

/// POST /api/v1/resumes/extract
///
/// Multipart upload with a `file` field (PDF or plain text, max 5 MB).
pub async fn handle_extract(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("resume").to_string();
        let format = ResumeFormat::detect(Some(&file_name), field.content_type()).ok_or_else(
            || AppError::UnsupportedMedia("Only PDF and plain-text resumes are supported".to_string()),
        )?;

        let bytes = field.bytes().await.map_err(multipart_error)?;
        let resume_text = extract_text(format, bytes.to_vec()).await?;

        info!(
            "Extracted {} chars from uploaded {:?} resume",
            resume_text.len(),
            format
        );

        return Ok(Json(ExtractResponse {
            file_name,
            char_count: resume_text.chars().count(),
            resume_text,
        }));
    }

    Err(AppError::BadRequest(
        "Missing multipart field 'file'".to_string(),
    ))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}
