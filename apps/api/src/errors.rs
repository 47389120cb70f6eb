use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No baseline CV found. Please upload a baseline CV first.")]
    MissingBaseline,

    #[error("No catalog items found. Please add some projects first.")]
    EmptyCatalog,

    #[error("AI service not configured: {0}")]
    NotConfigured(String),

    #[error("AI service error: {0}")]
    Upstream(String),

    #[error("AI returned an unusable response: {0}")]
    MalformedResponse(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code, also used in the JSON body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::MissingBaseline => "BASELINE_MISSING",
            AppError::EmptyCatalog => "CATALOG_EMPTY",
            AppError::NotConfigured(_) => "AI_NOT_CONFIGURED",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingCredential => AppError::NotConfigured(err.to_string()),
            LlmError::Parse(_) | LlmError::EmptyContent => {
                AppError::MalformedResponse(err.to_string())
            }
            LlmError::Http(_) | LlmError::Api { .. } => AppError::Upstream(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::MissingBaseline | AppError::EmptyCatalog => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::NotConfigured(msg) => {
                tracing::warn!("AI not configured: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "AI service not configured. Please set ANTHROPIC_API_KEY.".to_string(),
                )
            }
            AppError::Upstream(msg) => {
                tracing::error!("AI upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::MalformedResponse(msg) => {
                tracing::error!("AI malformed response: {msg}");
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
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
