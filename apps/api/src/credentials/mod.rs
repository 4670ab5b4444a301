//! Credential Resolver — decides which Gemini API key a request runs with.
//!
//! Precedence: deployment secret (env var, then the local secrets file) wins
//! over whatever the user typed into the page. The resolved key is passed
//! explicitly to the translator; nothing here is global.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod handlers;

/// Fixed key of the deployment-managed secret, both as env var and as the
/// assignment written to the secrets file.
pub const SECRET_KEY: &str = "GOOGLE_API_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    DeploymentSecret,
    UserSupplied,
}

/// Opaque API key. `Debug` never prints the value.
#[derive(Clone)]
pub struct Credential {
    value: String,
    source: CredentialSource,
}

impl Credential {
    pub fn new(value: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }

    /// The raw key, for the outbound request header only.
    pub fn expose(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to save API key to {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Deployment secret store: the `GOOGLE_API_KEY` env var, falling back to the
/// TOML secrets file. The file is re-read on every lookup so a key saved from
/// the page takes effect on the next request.
#[derive(Debug, Clone)]
pub struct SecretStore {
    path: PathBuf,
    read_env: bool,
}

impl SecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            read_env: true,
        }
    }

    /// Store that ignores the process environment, so tests don't depend on
    /// whether `GOOGLE_API_KEY` happens to be exported.
    #[cfg(test)]
    pub(crate) fn file_only(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            read_env: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn lookup(&self) -> Option<Credential> {
        let value = match self.read_env.then(env_secret).flatten() {
            Some(value) => Some(value),
            None => self.file_secret().await,
        };
        value.map(|value| Credential::new(value, CredentialSource::DeploymentSecret))
    }

    /// Reads `GOOGLE_API_KEY` from the secrets file, if the file exists and
    /// holds a non-empty string under that key.
    pub async fn file_secret(&self) -> Option<String> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Cannot read secrets file {}: {e}", self.path.display());
                return None;
            }
        };

        let settings = config::Config::builder()
            .add_source(config::File::from_str(&contents, config::FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize::<HashMap<String, config::Value>>());

        let entries = match settings {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Ignoring unreadable secrets file {}: {e}", self.path.display());
                return None;
            }
        };

        // config lowercases keys on some versions; match either spelling.
        entries
            .into_iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(SECRET_KEY))
            .and_then(|(_, v)| v.into_string().ok())
            .filter(|v| !v.trim().is_empty())
    }

    /// Overwrites the secrets file with a single `GOOGLE_API_KEY = "..."`
    /// assignment. Creates the parent directory when missing.
    pub async fn save(&self, value: &str) -> Result<(), CredentialError> {
        let persist_err = |source| CredentialError::Persist {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(persist_err)?;
        }

        let line = format!("{SECRET_KEY} = \"{}\"", escape_toml_basic(value));
        tokio::fs::write(&self.path, line)
            .await
            .map_err(persist_err)?;

        info!("API key saved to {}", self.path.display());
        Ok(())
    }
}

/// Resolves the credential for one request.
pub async fn resolve_credential(
    store: &SecretStore,
    user_input: Option<&str>,
) -> Option<Credential> {
    select_credential(store.lookup().await, user_input)
}

fn select_credential(
    deployment: Option<Credential>,
    user_input: Option<&str>,
) -> Option<Credential> {
    if let Some(credential) = deployment {
        debug!("Using deployment-managed API key");
        return Some(credential);
    }

    user_input
        .filter(|v| !v.trim().is_empty())
        .map(|v| Credential::new(v, CredentialSource::UserSupplied))
}

fn env_secret() -> Option<String> {
    std::env::var(SECRET_KEY)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Escapes a value for a TOML basic string. Control characters are not
/// allowed raw, so they become `\uXXXX`.
fn escape_toml_basic(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            c if c.is_control() => escaped.push_str(&format!("\\u{:04X}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}
