use crate::credentials::SecretStore;
use crate::translation::Translator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Deployment secret store. Consulted on every request.
    pub secrets: SecretStore,
    pub translator: Translator,
}
