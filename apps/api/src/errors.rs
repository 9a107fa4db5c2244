use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";
pub const QUOTA_MESSAGE: &str = "AI credits exhausted. Please add credits.";
pub const NO_STRUCTURED_OUTPUT_MESSAGE: &str = "Model did not return structured output";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders as `{ "error": "<message>" }`. Diagnostic detail is
/// logged server-side and never copied into the response body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream rate limit exceeded")]
    RateLimited,

    #[error("Upstream quota exhausted")]
    QuotaExhausted,

    #[error("Upstream protocol error: {0}")]
    UpstreamProtocol(String),

    #[error("Result validation error: {0}")]
    ResultValidation(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMedia(String),

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::QuotaExhausted => StatusCode::PAYMENT_REQUIRED,
            AppError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Configuration(_)
            | AppError::UpstreamProtocol(_)
            | AppError::ResultValidation(_)
            | AppError::Upstream(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to the caller.
    pub fn client_message(&self) -> String {
        match self {
            AppError::BadRequest(msg)
            | AppError::UnsupportedMedia(msg)
            | AppError::UnprocessableEntity(msg) => msg.clone(),
            AppError::PayloadTooLarge => "Uploaded file is too large (max 5 MB)".to_string(),
            AppError::Configuration(_) => "AI gateway is not configured".to_string(),
            AppError::RateLimited => RATE_LIMIT_MESSAGE.to_string(),
            AppError::QuotaExhausted => QUOTA_MESSAGE.to_string(),
            AppError::UpstreamProtocol(_) => NO_STRUCTURED_OUTPUT_MESSAGE.to_string(),
            AppError::ResultValidation(_) => {
                "Model returned malformed structured output".to_string()
            }
            AppError::Upstream(_) => "AI gateway error".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingCredential => {
                AppError::Configuration("AI_GATEWAY_API_KEY is not configured".to_string())
            }
            LlmError::RateLimited { .. } => AppError::RateLimited,
            LlmError::QuotaExhausted => AppError::QuotaExhausted,
            LlmError::MissingToolCall(detail) => AppError::UpstreamProtocol(detail),
            LlmError::MalformedArguments(e) => {
                AppError::ResultValidation(format!("tool arguments are not valid JSON: {e}"))
            }
            e @ (LlmError::Api { .. } | LlmError::Http(_)) => {
                AppError::Upstream(e.to_string())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::BadRequest(_) | AppError::UnsupportedMedia(_) | AppError::PayloadTooLarge => {
                tracing::debug!("Rejected request: {self}")
            }
            AppError::RateLimited | AppError::QuotaExhausted => tracing::warn!("{self}"),
            AppError::UnprocessableEntity(_) => tracing::info!("{self}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            _ => tracing::error!("{self}"),
        }

        let body = Json(json!({ "error": self.client_message() }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_maps_to_429() {
        let err = AppError::from(LlmError::RateLimited { retries: 0 });
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(err.client_message().starts_with("Rate limit exceeded"));
    }

    #[test]
    fn test_quota_maps_to_402() {
        let err = AppError::from(LlmError::QuotaExhausted);
        assert_eq!(err.status(), StatusCode::PAYMENT_REQUIRED);
        assert_eq!(err.client_message(), QUOTA_MESSAGE);
    }

    #[test]
    fn test_missing_credential_is_configuration_error() {
        let err = AppError::from(LlmError::MissingCredential);
        assert!(matches!(err, AppError::Configuration(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_upstream_body_is_not_leaked() {
        let err = AppError::from(LlmError::Api {
            status: 503,
            body: "secret internal trace from gateway".to_string(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.client_message().contains("secret"));
    }

    #[test]
    fn test_missing_tool_call_is_protocol_error() {
        let err = AppError::from(LlmError::MissingToolCall("no tool_calls".to_string()));
        assert!(matches!(err, AppError::UpstreamProtocol(_)));
        assert_eq!(err.client_message(), NO_STRUCTURED_OUTPUT_MESSAGE);
    }

    #[test]
    fn test_bad_request_keeps_message() {
        let err = AppError::BadRequest("resume_text is required".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_message(), "resume_text is required");
    }
}
