//! Axum route handlers for the Translation API.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::debug;

use crate::credentials::resolve_credential;
use crate::errors::AppError;
use crate::state::AppState;
use crate::translation::TranslationResult;

// No Debug: carries the raw API key.
#[derive(Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    /// Key typed into the page. Ignored when a deployment secret exists.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// POST /api/v1/translate
///
/// Blank input never reaches the translator.
pub async fn handle_translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslationResult>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("Please enter content.".to_string()));
    }

    let credential = resolve_credential(&state.secrets, request.api_key.as_deref()).await;
    if let Some(credential) = &credential {
        debug!("Translating with {:?} API key", credential.source());
    }

    let result = state
        .translator
        .translate(&request.text, credential.as_ref())
        .await?;

    Ok(Json(result))
}
