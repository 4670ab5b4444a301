use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::credentials::CredentialError;
use crate::translation::TranslationFailure;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Messages are shown in the page's error banner, so they carry the
/// upstream detail but never the API key.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing API key")]
    MissingCredential,

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<TranslationFailure> for AppError {
    fn from(failure: TranslationFailure) -> Self {
        match failure {
            TranslationFailure::MissingCredential => AppError::MissingCredential,
            TranslationFailure::ModelUnavailable { detail } => AppError::ModelUnavailable(detail),
            TranslationFailure::UpstreamError { detail } => AppError::Upstream(detail),
        }
    }
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        AppError::Persistence(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::MissingCredential => (
                StatusCode::UNAUTHORIZED,
                "MISSING_CREDENTIAL",
                "No API key available. Set GOOGLE_API_KEY for the deployment or enter a key."
                    .to_string(),
            ),
            AppError::ModelUnavailable(detail) => {
                tracing::error!("Primary and fallback models failed: {detail}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "MODEL_UNAVAILABLE",
                    format!("Error: {detail}"),
                )
            }
            AppError::Upstream(detail) => {
                tracing::error!("Generation error: {detail}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    format!("Error: {detail}"),
                )
            }
            AppError::Persistence(detail) => {
                tracing::error!("Failed to save API key: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PERSISTENCE_ERROR",
                    detail.clone(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_failures_map_to_statuses() {
        let cases = [
            (TranslationFailure::MissingCredential, StatusCode::UNAUTHORIZED),
            (
                TranslationFailure::ModelUnavailable {
                    detail: "x".to_string(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                TranslationFailure::UpstreamError {
                    detail: "x".to_string(),
                },
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (failure, status) in cases {
            assert_eq!(AppError::from(failure).into_response().status(), status);
        }
    }

    #[test]
    fn test_persistence_message_not_prefixed_twice() {
        let err = CredentialError::Persist {
            path: "/tmp/secrets.toml".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        let app_err = AppError::from(err);
        let AppError::Persistence(message) = &app_err else {
            panic!("expected Persistence, got {app_err:?}");
        };
        assert!(message.starts_with("failed to save API key to /tmp/secrets.toml"));
        assert_eq!(message.matches("save").count(), 1);
        assert_eq!(
            app_err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_is_bad_request() {
        let response = AppError::Validation("please enter content".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
