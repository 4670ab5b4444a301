mod config;
mod credentials;
mod errors;
mod llm_client;
mod routes;
mod state;
mod translation;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::credentials::SecretStore;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::translation::Translator;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Foreman Desk v{}", env!("CARGO_PKG_VERSION"));

    let secrets = SecretStore::new(&config.secrets_path);
    if secrets.lookup().await.is_some() {
        info!("Deployment-managed API key found; key input disabled");
    } else {
        info!(
            "No deployment API key; users supply one (save target: {})",
            secrets.path().display()
        );
    }

    let client = Arc::new(GeminiClient::new(&config.gemini_api_base));
    let translator = Translator::new(client, &config.primary_model, &config.fallback_model);
    info!(
        "LLM client initialized (primary: {}, fallback: {})",
        translator.primary_model(),
        translator.fallback_model()
    );

    let state = AppState {
        secrets,
        translator,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
