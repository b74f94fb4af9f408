use serde_json::{json, Map, Value};

use crate::schema::SchemaViolation;

/// A decoded plan. The shape is advisory, so it stays an untyped JSON object.
pub type Plan = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Neither the direct parse nor the brace salvage produced a JSON object.
    UnparsableOutput,
    /// The object decoded but failed the strict plan schema.
    SchemaMismatch,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::UnparsableOutput => "unparsable model output",
            ErrorKind::SchemaMismatch => "schema mismatch",
        }
    }

    /// Message placed in the `error` field of the response body.
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::UnparsableOutput => "Failed to parse AI output",
            ErrorKind::SchemaMismatch => "AI output did not match plan schema",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResult {
    pub kind: ErrorKind,
    pub raw: Option<String>,
    pub violations: Vec<SchemaViolation>,
}

impl ErrorResult {
    pub fn unparsable(raw: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::UnparsableOutput,
            raw: Some(raw.into()),
            violations: Vec::new(),
        }
    }

    pub fn schema_mismatch(raw: impl Into<String>, violations: Vec<SchemaViolation>) -> Self {
        Self {
            kind: ErrorKind::SchemaMismatch,
            raw: Some(raw.into()),
            violations,
        }
    }

    /// JSON body returned to the caller: `{"error": ..., "raw": ...}`, plus
    /// `violations` when there are any.
    pub fn to_body(&self) -> Value {
        let mut body = json!({ "error": self.kind.message() });
        if let Some(raw) = &self.raw {
            body["raw"] = Value::String(raw.clone());
        }
        if !self.violations.is_empty() {
            body["violations"] = self
                .violations
                .iter()
                .map(|v| Value::String(v.to_string()))
                .collect();
        }
        body
    }
}

/// Exactly one of these is produced per request.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanResult {
    Plan(Plan),
    Error(ErrorResult),
}

impl PlanResult {
    pub fn is_plan(&self) -> bool {
        matches!(self, PlanResult::Plan(_))
    }

    pub fn into_body(self) -> Value {
        match self {
            PlanResult::Plan(plan) => Value::Object(plan),
            PlanResult::Error(err) => err.to_body(),
        }
    }
}
