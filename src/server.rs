use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::error::PlanError;
use crate::planner::PlanGenerator;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Request failure rendered as `{"error": ...}` with a status code.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::InvalidProfile(_) => {
                warn!(error = %err, "rejected profile");
                AppError::bad_request(err.to_string())
            }
            // Provider details stay in the logs.
            PlanError::Upstream(ref cause) => {
                error!(error = %cause, "plan generation failed");
                AppError::internal("Failed to generate plan")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct AppState {
    generator: Arc<PlanGenerator>,
}

pub fn build_router(generator: PlanGenerator) -> Router {
    Router::new()
        .route("/api/generate", post(generate_plan))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState {
            generator: Arc::new(generator),
        })
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_server(addr: SocketAddr, generator: PlanGenerator) -> Result<()> {
    let app = build_router(generator);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("fitplan listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("fitplan shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn generate_plan(
    State(state): State<AppState>,
    payload: Result<Json<crate::profile::ProfileInput>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(profile) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "malformed profile payload");
        AppError::bad_request(rejection.body_text())
    })?;

    let result = state.generator.generate(&profile).await?;
    Ok(Json(result.into_body()))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::error::ProviderError;
    use crate::llm::{CompletionProvider, CompletionRequest};
    use crate::planner::GenerationSettings;

    struct StubProvider {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionProvider for StubProvider {
        async fn complete(&self, _request: CompletionRequest<'_>) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(str::to_string)
                .ok_or_else(|| ProviderError::Transport("connection refused".into()))
        }
    }

    fn app(reply: Option<&'static str>) -> (Router, Arc<StubProvider>) {
        let provider = Arc::new(StubProvider {
            reply,
            calls: AtomicUsize::new(0),
        });
        let generator = PlanGenerator::new(provider.clone(), GenerationSettings::default());
        (build_router(generator), provider)
    }

    fn profile_body() -> Value {
        json!({
            "name": "Jordan",
            "age": "31",
            "gender": "Male",
            "weight": "77",
            "height": "181",
            "goal": "Weight Loss",
            "location": "Gym",
            "diet": "Keto"
        })
    }

    async fn post_json(app: Router, body: String) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/generate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_plan_is_returned_verbatim() {
        let plan = r#"{"workout":[{"day":"Day 1","exercises":[]}],"diet":{"meals":[{"name":"Eggs","calories":300}]},"motivation":"go"}"#;
        let (app, provider) = app(Some(plan));

        let resp = post_json(app, profile_body().to_string()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::from_str::<Value>(plan).unwrap());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_plan_keeps_model_key_order() {
        let plan = r#"{"user_profile":{"summary":"s"},"workout":[],"diet":{"meals":[]},"motivation":"m"}"#;
        let (app, _) = app(Some(plan));

        let resp = post_json(app, profile_body().to_string()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), 1_048_576)
            .await
            .unwrap();
        assert_eq!(std::str::from_utf8(&bytes).unwrap(), plan);
    }

    #[tokio::test]
    async fn test_plan_is_salvaged_from_prose() {
        let (app, _) = app(Some("Sure! Here's your plan: {\"motivation\":\"go\"} Hope that helps."));
        let resp = post_json(app, profile_body().to_string()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({ "motivation": "go" }));
    }

    #[tokio::test]
    async fn test_unparsable_output_is_structured_error() {
        let (app, _) = app(Some("no braces here"));
        let resp = post_json(app, profile_body().to_string()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await,
            json!({ "error": "Failed to parse AI output", "raw": "no braces here" })
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_is_server_error() {
        let (app, _) = app(None);
        let resp = post_json(app, profile_body().to_string()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await, json!({ "error": "Failed to generate plan" }));
    }

    #[tokio::test]
    async fn test_invalid_profile_skips_provider() {
        let (app, provider) = app(Some("{}"));
        let mut body = profile_body();
        body["weight"] = json!("-4");

        let resp = post_json(app, body.to_string()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("weight must be a positive number"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (app, provider) = app(Some("{}"));
        let resp = post_json(app, "{\"name\": ".to_string()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await["error"].is_string());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_goal_is_bad_request() {
        let (app, _) = app(Some("{}"));
        let mut body = profile_body();
        body["goal"] = json!("Flexibility");
        let resp = post_json(app, body.to_string()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app(None);
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({ "status": "ok" }));
    }
}
