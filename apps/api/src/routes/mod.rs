pub mod health;
pub mod page;

use axum::{routing::get, routing::post, Router};

use crate::credentials::handlers as credential_handlers;
use crate::state::AppState;
use crate::translation::handlers as translation_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index_handler))
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/credential",
            get(credential_handlers::handle_credential_status)
                .post(credential_handlers::handle_save_credential),
        )
        .route(
            "/api/v1/translate",
            post(translation_handlers::handle_translate),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::credentials::SecretStore;
    use crate::translation::translator::tests::{api_err, ScriptedClient};
    use crate::translation::Translator;

    fn app(client: Arc<ScriptedClient>, secrets_path: &Path) -> Router {
        build_router(AppState {
            secrets: SecretStore::file_only(secrets_path),
            translator: Translator::new(client, "gemini-1.5-pro", "gemini-1.5-flash"),
        })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_blank_input_rejected_before_translator() {
        let dir = tempfile::tempdir().unwrap();
        let client = ScriptedClient::new(vec![Ok("unused".to_string())]);

        let response = app(client.clone(), &dir.path().join("secrets.toml"))
            .oneshot(post_json(
                "/api/v1/translate",
                json!({"text": "  \n ", "api_key": "k"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_is_unauthorized() {
        let dir = tempfile::tempdir().unwrap();
        let client = ScriptedClient::new(vec![Ok("unused".to_string())]);

        let response = app(client.clone(), &dir.path().join("secrets.toml"))
            .oneshot(post_json("/api/v1/translate", json!({"text": "안전 장구 착용"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "MISSING_CREDENTIAL");
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_translate_returns_text_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let answer = "**🗣️ Foreman's Instruction (작업 지시서):**\nHowdy y'all\n\n**💡 Key Point:**\nPPE on";
        let client = ScriptedClient::new(vec![Ok(answer.to_string())]);

        let response = app(client.clone(), &dir.path().join("secrets.toml"))
            .oneshot(post_json(
                "/api/v1/translate",
                json!({"text": "안전 장구 착용", "api_key": "typed"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["text"], answer);
        assert_eq!(body["model"], "gemini-1.5-pro");
        assert_eq!(client.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway_with_detail() {
        let dir = tempfile::tempdir().unwrap();
        let client = ScriptedClient::new(vec![Err(api_err(400, "API key not valid"))]);

        let response = app(client, &dir.path().join("secrets.toml"))
            .oneshot(post_json(
                "/api/v1/translate",
                json!({"text": "교대 근무", "api_key": "bad"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("API key not valid"));
    }

    #[tokio::test]
    async fn test_both_models_down_is_service_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let client = ScriptedClient::new(vec![
            Err(api_err(404, "model not found")),
            Err(api_err(429, "quota exceeded")),
        ]);

        let response = app(client, &dir.path().join("secrets.toml"))
            .oneshot(post_json(
                "/api/v1/translate",
                json!({"text": "교대 근무", "api_key": "k"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "MODEL_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_save_key_then_status_reports_deployment_managed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".streamlit").join("secrets.toml");
        let app = app(ScriptedClient::new(vec![]), &path);

        let before = app.clone().oneshot(get("/api/v1/credential")).await.unwrap();
        assert_eq!(body_json(before).await["deployment_managed"], false);

        let saved = app
            .clone()
            .oneshot(post_json("/api/v1/credential", json!({"api_key": "abc"})))
            .await
            .unwrap();
        assert_eq!(saved.status(), StatusCode::OK);
        assert_eq!(body_json(saved).await["saved"], true);

        let after = app.oneshot(get("/api/v1/credential")).await.unwrap();
        assert_eq!(body_json(after).await["deployment_managed"], true);
    }

    #[tokio::test]
    async fn test_saved_key_with_control_characters_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        let client = ScriptedClient::new(vec![Ok("done".to_string())]);
        let app = app(client.clone(), &path);

        let saved = app
            .clone()
            .oneshot(post_json("/api/v1/credential", json!({"api_key": "abc\ndef"})))
            .await
            .unwrap();
        assert_eq!(body_json(saved).await["saved"], true);

        let status = app.clone().oneshot(get("/api/v1/credential")).await.unwrap();
        assert_eq!(body_json(status).await["deployment_managed"], true);

        let response = app
            .oneshot(post_json("/api/v1/translate", json!({"text": "라인 정지"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(client.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_saved_key_used_without_typed_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "GOOGLE_API_KEY = \"from-file\"").unwrap();
        let client = ScriptedClient::new(vec![Ok("done".to_string())]);

        let response = app(client.clone(), &path)
            .oneshot(post_json("/api/v1/translate", json!({"text": "라인 정지"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(client.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_save_failure_reported_as_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let response = app(ScriptedClient::new(vec![]), &blocker.join("secrets.toml"))
            .oneshot(post_json("/api/v1/credential", json!({"api_key": "abc"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"]["code"], "PERSISTENCE_ERROR");
    }

    #[tokio::test]
    async fn test_empty_key_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");

        let response = app(ScriptedClient::new(vec![]), &path)
            .oneshot(post_json("/api/v1/credential", json!({"api_key": " "})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_index_and_health() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(ScriptedClient::new(vec![]), &dir.path().join("secrets.toml"));

        let index = app.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(index.status(), StatusCode::OK);
        let html = axum::body::to_bytes(index.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8_lossy(&html);
        assert!(html.contains("/api/v1/translate"));
        assert!(html.contains("id=\"deploy-tip\""));
        assert!(html.contains("await refreshCredentialStatus()"));

        let health = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(body_json(health).await["status"], "ok");
    }
}
