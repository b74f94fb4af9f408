use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::plan::Plan;
use crate::render::render_plan;

/// Byte encodings for a plan saved or printed outside the service.
pub trait PlanCodec {
    fn encode(&self, plan: &Plan) -> Result<Vec<u8>>;
    /// Decoding only accepts a top-level object.
    fn decode(&self, data: &[u8]) -> Result<Plan>;
}

/// Compact MessagePack with named fields.
pub struct MsgPackCodec;

impl PlanCodec for MsgPackCodec {
    fn encode(&self, plan: &Plan) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(plan)?)
    }

    fn decode(&self, data: &[u8]) -> Result<Plan> {
        into_plan(rmp_serde::from_slice(data)?)
    }
}

/// Pretty-printed JSON, newline terminated.
pub struct JsonCodec;

impl PlanCodec for JsonCodec {
    fn encode(&self, plan: &Plan) -> Result<Vec<u8>> {
        let mut buf = serde_json::to_vec_pretty(plan)?;
        buf.push(b'\n');
        Ok(buf)
    }

    fn decode(&self, data: &[u8]) -> Result<Plan> {
        into_plan(serde_json::from_slice(data)?)
    }
}

fn into_plan(value: Value) -> Result<Plan> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(anyhow!("expected a plan object, found {}", kind(&other))),
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// How the CLI writes a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Msgpack,
    Text,
}

impl OutputFormat {
    pub fn encode_plan(self, plan: &Plan) -> Result<Vec<u8>> {
        match self {
            OutputFormat::Json => JsonCodec.encode(plan),
            OutputFormat::Msgpack => MsgPackCodec.encode(plan),
            OutputFormat::Text => Ok(render_plan(plan).into_bytes()),
        }
    }
}

/// Read a saved plan, choosing the codec by file extension
/// (`.msgpack`/`.mpk` for MessagePack, anything else JSON).
pub fn decode_saved_plan(path: &str, data: &[u8]) -> Result<Plan> {
    let lower = path.to_ascii_lowercase();
    if lower.ends_with(".msgpack") || lower.ends_with(".mpk") {
        MsgPackCodec.decode(data)
    } else {
        JsonCodec.decode(data)
    }
}
