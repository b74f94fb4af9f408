use std::time::Duration;

use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::plan::Plan;
use crate::profile::ProfileInput;

/// What the service answered for a profile.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanResponse {
    Plan(Plan),
    /// The model answered but its output was rejected; `raw` is that output.
    Rejected { error: String, raw: Option<String> },
}

impl PlanResponse {
    /// Classify a 200 body. Error results are objects with a string `error`.
    pub fn from_body(body: Value) -> Result<Self> {
        let Value::Object(map) = body else {
            return Err(anyhow!("server returned a non-object body"));
        };
        match map.get("error").and_then(Value::as_str) {
            Some(error) => Ok(PlanResponse::Rejected {
                error: error.to_string(),
                raw: map.get("raw").and_then(Value::as_str).map(str::to_string),
            }),
            None => Ok(PlanResponse::Plan(map)),
        }
    }
}

/// Blocking client for the `/api/generate` endpoint.
pub struct PlanClient {
    agent: ureq::Agent,
    base_url: String,
}

impl PlanClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.into(),
        }
    }

    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }

    pub fn generate(&self, profile: &ProfileInput) -> Result<PlanResponse> {
        let url = self.generate_url();
        let body = serde_json::to_value(profile)?;

        match self.agent.post(&url).send_json(body) {
            Ok(resp) => {
                let body: Value = resp
                    .into_json()
                    .map_err(|e| anyhow!("Failed to read response from {url}: {e}"))?;
                PlanResponse::from_body(body)
            }
            Err(ureq::Error::Status(code, resp)) => {
                let message = resp
                    .into_json::<Value>()
                    .ok()
                    .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
                    .unwrap_or_else(|| "Unknown error".to_string());
                Err(anyhow!("Server returned HTTP {code}: {message}"))
            }
            Err(e) => Err(anyhow!("Request to {url} failed: {e}")),
        }
    }
}
