use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extract::ExtractionError;
use crate::jobs::JobProviderError;
use crate::llm_client::template::TemplateError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Provider error ({provider}): {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    #[error("Timed out waiting for {provider}")]
    Timeout { provider: &'static str },

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout => AppError::Timeout { provider: "llm" },
            other => AppError::Provider {
                provider: "llm",
                message: other.to_string(),
            },
        }
    }
}

impl From<JobProviderError> for AppError {
    fn from(err: JobProviderError) -> Self {
        match err {
            JobProviderError::Timeout { provider } => AppError::Timeout { provider },
            other => AppError::Provider {
                provider: other.provider(),
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Extraction(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_ERROR",
                format!("Could not read the uploaded PDF: {e}"),
            ),
            AppError::Template(e) => {
                tracing::error!("Template error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TEMPLATE_ERROR",
                    "A prompt could not be prepared".to_string(),
                )
            }
            AppError::Provider { provider, message } => {
                tracing::error!("Provider error ({provider}): {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PROVIDER_ERROR",
                    format!("The {provider} service failed to respond correctly"),
                )
            }
            AppError::Timeout { provider } => {
                tracing::error!("Timed out waiting for {provider}");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "TIMEOUT",
                    format!("The {provider} service did not respond in time"),
                )
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
