//! Stand-in for an OpenAI-compatible chat-completions endpoint, used for local
//! development and integration tests.

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use tracing::info;

use crate::llm::{ChatCompletionRequest, ChatCompletionResponse};

pub const SAMPLE_PLAN: &str = r#"{
  "user_profile": { "summary": "Intermediate trainee aiming to build muscle with gym access and a vegetarian diet." },
  "workout": [
    {
      "day": "Day 1",
      "focus": "Push",
      "exercises": [
        { "name": "Barbell Bench Press", "sets": "4 x 8", "visual_prompt": "athlete performing barbell bench press in a gym" },
        { "name": "Overhead Press", "sets": "3 x 10", "visual_prompt": "person pressing a barbell overhead" }
      ]
    },
    {
      "day": "Day 2",
      "focus": "Pull",
      "exercises": [
        { "name": "Deadlift", "sets": "4 x 5", "visual_prompt": "lifter performing a conventional deadlift" },
        { "name": "Pull-ups", "sets": "3 x 8", "visual_prompt": "person doing pull-ups on a bar" }
      ]
    },
    {
      "day": "Day 3",
      "focus": "Legs",
      "exercises": [
        { "name": "Back Squat", "sets": "4 x 8", "visual_prompt": "athlete squatting with a barbell on the back" },
        { "name": "Walking Lunges", "sets": "3 x 12", "visual_prompt": "person doing walking lunges with dumbbells" }
      ]
    }
  ],
  "diet": {
    "meals": [
      { "name": "Greek Yogurt Oats", "calories": 450, "visual_prompt": "bowl of oats topped with yogurt and berries" },
      { "name": "Paneer Rice Bowl", "calories": 650, "visual_prompt": "paneer cubes over rice with vegetables" },
      { "name": "Lentil Soup", "calories": 500, "visual_prompt": "bowl of lentil soup with bread" }
    ]
  },
  "motivation": "Consistency beats intensity. Show up for all three days."
}"#;

/// How the mock answers every completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockMode {
    /// Bare JSON plan.
    Json,
    /// Plan wrapped in chatty prose and a code fence.
    Prose,
    /// Plan cut off mid-object, as when the token budget runs out.
    Truncated,
    /// No JSON at all.
    Garbage,
    /// HTTP 503.
    Fail,
}

impl FromStr for MockMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(MockMode::Json),
            "prose" => Ok(MockMode::Prose),
            "truncated" => Ok(MockMode::Truncated),
            "garbage" => Ok(MockMode::Garbage),
            "fail" => Ok(MockMode::Fail),
            other => Err(format!(
                "unknown mock mode {other:?} (expected json, prose, truncated, garbage or fail)"
            )),
        }
    }
}

impl MockMode {
    fn content(self) -> Option<String> {
        match self {
            MockMode::Json => Some(SAMPLE_PLAN.to_string()),
            MockMode::Prose => Some(format!(
                "Sure! Here's your personalised plan:\n```json\n{SAMPLE_PLAN}\n```\nStay consistent and hydrate!"
            )),
            MockMode::Truncated => Some(SAMPLE_PLAN[..SAMPLE_PLAN.len() / 2].to_string()),
            MockMode::Garbage => Some("I'm sorry, I can't create a plan right now.".to_string()),
            MockMode::Fail => None,
        }
    }
}

#[derive(Clone)]
struct MockState {
    mode: MockMode,
    requests: Arc<AtomicUsize>,
}

/// Router serving `POST /v1/chat/completions`. The counter is incremented once
/// per completion request received.
pub fn mock_router(mode: MockMode, requests: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .with_state(MockState { mode, requests })
}

async fn chat_completions(
    State(state): State<MockState>,
    Json(req): Json<ChatCompletionRequest>,
) -> Response {
    let n = state.requests.fetch_add(1, Ordering::SeqCst) + 1;
    info!(
        request = n,
        model = %req.model,
        messages = req.messages.len(),
        max_tokens = req.max_tokens,
        mode = ?state.mode,
        "mock completion request"
    );

    if req.messages.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "message": "messages must not be empty" } })),
        )
            .into_response();
    }

    match state.mode.content() {
        Some(content) => Json(ChatCompletionResponse::with_content(content)).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": { "message": "mock provider unavailable" } })),
        )
            .into_response(),
    }
}
