//! Translation — turns a Korean shift plan into Chief Hank's instructions.
//!
//! Flow: guard credential → build prompt → primary model →
//!       (not-found | quota) ? one fallback call : fail.
//!
//! At most two sequential round trips per request. No caching and no backoff.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::credentials::Credential;
use crate::llm_client::{GenerationClient, LlmError};
use crate::translation::prompts::build_prompt;

/// Rough failure class of a generation call, derived from the error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Model not provisioned / endpoint missing.
    NotFound,
    Quota,
    Other,
}

/// Best-effort classification over the rendered error. Status codes and
/// wording vary by provider, so this only looks for `404`, `not found` and
/// `quota` in the message.
pub fn classify_failure(err: &LlmError) -> FailureClass {
    let message = err.to_string().to_lowercase();
    if message.contains("404") || message.contains("not found") {
        FailureClass::NotFound
    } else if message.contains("quota") {
        FailureClass::Quota
    } else {
        FailureClass::Other
    }
}

#[derive(Debug, Error)]
pub enum TranslationFailure {
    #[error("No API key available")]
    MissingCredential,

    #[error("Both models unavailable: {detail}")]
    ModelUnavailable { detail: String },

    #[error("Generation failed: {detail}")]
    UpstreamError { detail: String },
}

/// Model output, returned verbatim. The two-section layout is requested in
/// the prompt but never checked.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationResult {
    pub text: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

/// The request orchestrator. Cheap to clone; holds only the client handle and
/// the two model identifiers.
#[derive(Clone)]
pub struct Translator {
    client: Arc<dyn GenerationClient>,
    primary_model: String,
    fallback_model: String,
}

impl Translator {
    pub fn new(
        client: Arc<dyn GenerationClient>,
        primary_model: impl Into<String>,
        fallback_model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            primary_model: primary_model.into(),
            fallback_model: fallback_model.into(),
        }
    }

    pub fn primary_model(&self) -> &str {
        &self.primary_model
    }

    pub fn fallback_model(&self) -> &str {
        &self.fallback_model
    }

    /// Translates `raw_text`. Callers must reject blank input beforehand.
    #[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
    pub async fn translate(
        &self,
        raw_text: &str,
        credential: Option<&Credential>,
    ) -> Result<TranslationResult, TranslationFailure> {
        let credential = credential.ok_or(TranslationFailure::MissingCredential)?;

        let prompt = build_prompt(raw_text);

        info!("Requesting translation from {}", self.primary_model);
        let primary_err = match self
            .client
            .generate(&self.primary_model, &prompt, credential)
            .await
        {
            Ok(text) => return Ok(self.result(text, &self.primary_model)),
            Err(e) => e,
        };

        match classify_failure(&primary_err) {
            FailureClass::NotFound | FailureClass::Quota => {
                warn!(
                    "Primary model {} failed ({primary_err}); falling back to {}",
                    self.primary_model, self.fallback_model
                );
            }
            FailureClass::Other => {
                return Err(TranslationFailure::UpstreamError {
                    detail: primary_err.to_string(),
                });
            }
        }

        match self
            .client
            .generate(&self.fallback_model, &prompt, credential)
            .await
        {
            Ok(text) => Ok(self.result(text, &self.fallback_model)),
            Err(fallback_err) => Err(TranslationFailure::ModelUnavailable {
                detail: fallback_err.to_string(),
            }),
        }
    }

    fn result(&self, text: String, model: &str) -> TranslationResult {
        TranslationResult {
            text,
            model: model.to_string(),
            generated_at: Utc::now(),
        }
    }
}
