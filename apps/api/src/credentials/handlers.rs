//! Axum route handlers for the Credential API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CredentialStatusResponse {
    /// When true the page hides the key input entirely.
    pub deployment_managed: bool,
}

// No Debug: carries the raw API key.
#[derive(Deserialize)]
pub struct SaveCredentialRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct SaveCredentialResponse {
    pub saved: bool,
}

/// GET /api/v1/credential
pub async fn handle_credential_status(
    State(state): State<AppState>,
) -> Json<CredentialStatusResponse> {
    Json(CredentialStatusResponse {
        deployment_managed: state.secrets.lookup().await.is_some(),
    })
}

/// POST /api/v1/credential
///
/// Writes the key to the local secrets file, replacing its contents.
/// A failed write is reported; the key the page holds keeps working.
pub async fn handle_save_credential(
    State(state): State<AppState>,
    Json(request): Json<SaveCredentialRequest>,
) -> Result<Json<SaveCredentialResponse>, AppError> {
    if request.api_key.trim().is_empty() {
        return Err(AppError::Validation("api_key cannot be empty".to_string()));
    }

    state.secrets.save(&request.api_key).await?;

    Ok(Json(SaveCredentialResponse { saved: true }))
}
