use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ProviderError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// One chat-style exchange: a system instruction, a user prompt and an
/// output budget.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub max_tokens: u32,
}

/// Something that turns a prompt into completion text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError>;
}

// Wire types for the OpenAI chat-completions endpoint.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Response carrying a single assistant message.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            choices: vec![ChatChoice {
                message: ChatChoiceMessage {
                    role: Some("assistant".into()),
                    content: Some(content.into()),
                },
            }],
        }
    }

    /// Text of the first choice. Missing or null content reads as empty text,
    /// which decodes to an error result rather than an empty `{}` plan, so a
    /// contentless completion is visible to the caller.
    pub fn into_first_content(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default()
    }
}

/// Connection settings for an OpenAI-compatible provider.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Clone)]
pub struct OpenAiChatClient {
    http: Client,
    config: ProviderConfig,
}

impl OpenAiChatClient {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn request_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.config.timeout)
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiChatClient {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let url = self.config.chat_completions_url();
        let body = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: request.system.to_string(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: request.user.to_string(),
                },
            ],
            max_tokens: request.max_tokens,
        };

        debug!(%url, model = %self.config.model, max_tokens = request.max_tokens, "sending chat completion");

        let mut builder = self.http.post(&url).json(&body);
        if !self.config.api_key.is_empty() {
            builder = builder.bearer_auth(&self.config.api_key);
        }
        let resp = builder.send().await.map_err(|e| self.request_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = status.as_u16(), "provider rejected completion request");
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let completion: ChatCompletionResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.config.timeout)
            } else {
                ProviderError::Protocol(e.to_string())
            }
        })?;

        Ok(completion.into_first_content())
    }
}
