use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use crate::{
    analyze::handler::analyze,
    digest::handler::{digest, snapshot},
    docs::{dto::ApiDoc, handler::api_docs},
    health::handler::health,
    state::ServerState,
};

pub fn router(state: Arc<ServerState>) -> Router {
    let doc = ApiDoc::openapi();

    Router::new()
        .merge(Redoc::with_url("/redoc", doc))
        .route("/health", get(health))
        .route("/docs", get(api_docs))
        .route("/analyze", post(analyze))
        .route("/digest", post(digest))
        .route("/digest/{chat_id}/{thread_id}", get(snapshot))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use digest_core::{
        ai::{
            dto::GenerationRequest,
            handler::TextGenerator,
        },
        checkpoint::storage::SledStore,
        config::SummarizerConfig,
        digest::handler::DigestService,
        error::{DigestError, DigestResult},
        summarizer::handler::SummaryBuilder,
    };
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct CannedGenerator {
        fail: bool,
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, request: &GenerationRequest) -> DigestResult<String> {
            if self.fail {
                return Err(DigestError::generation(request.kind(), "connection refused"));
            }
            Ok(match request {
                GenerationRequest::NameTopic { keywords } => format!("Draft {}", keywords.join(" ")),
                GenerationRequest::RefineTopicName { keywords, .. } => {
                    format!("Topic {}", keywords.join(" "))
                }
                GenerationRequest::UpdateWithPrevious { .. } => "- merged".to_string(),
                _ => "- summary".to_string(),
            })
        }
    }

    fn test_app(fail: bool) -> (Router, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = sled::open(temp_dir.path()).unwrap();
        let store = SledStore::new(&db).unwrap();
        let builder = SummaryBuilder::new(
            Arc::new(CannedGenerator { fail }),
            SummarizerConfig::default(),
        );
        let state = Arc::new(ServerState::from(DigestService::new(builder, Arc::new(store))));
        (router(state), temp_dir)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _temp) = test_app(false);
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_analyze_is_stateless() {
        let (app, _temp) = test_app(false);
        let body = json!({
            "topics": {
                "bug / crash": [
                    { "user": "ann", "type": "text", "text": "it crashes" },
                    { "user": "bo", "kind": "photo", "text": "" }
                ]
            },
            "previous_summary": { "Old": "- kept" }
        });

        let (status, body) = send(&app, post_json("/analyze", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["Topic bug crash"]["summary"], "- summary");
        assert_eq!(body["Old"], json!({ "theme": "Old", "summary": "- kept" }));
    }

    #[tokio::test]
    async fn test_digest_then_snapshot() {
        let (app, _temp) = test_app(false);
        let body = json!({
            "chat_id": 77,
            "thread_id": 4,
            "topics": {
                "deploy": [
                    { "message_id": 3, "user": "ann", "kind": "text", "text": "rollout started" },
                    { "message_id": 9, "user": "bo", "kind": "voice", "text": "rollout done" }
                ]
            }
        });

        let (status, outcome) = send(&app, post_json("/digest", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["cursor"], 9);
        assert_eq!(outcome["processed"], 2);

        let request = Request::builder().uri("/digest/77/4").body(Body::empty()).unwrap();
        let (status, snapshot) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(snapshot["cursor"], 9);
        assert_eq!(snapshot["summaries"]["Topic deploy"]["summary"], "- summary");
    }

    #[tokio::test]
    async fn test_generation_failure_is_generic_and_keeps_cursor() {
        let (app, _temp) = test_app(true);
        let body = json!({
            "chat_id": 77,
            "topics": {
                "deploy": [
                    { "message_id": 3, "user": "ann", "kind": "text", "text": "rollout started" }
                ]
            }
        });

        let (status, error) = send(&app, post_json("/digest", body)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(error["message"], "Summarization failed, try again later");

        let request = Request::builder().uri("/digest/77/0").body(Body::empty()).unwrap();
        let (_, snapshot) = send(&app, request).await;
        assert_eq!(snapshot["cursor"], Value::Null);
    }
}
