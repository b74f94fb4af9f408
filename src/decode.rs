//! Tolerant decoding of model output into a [`PlanResult`].
//!
//! Models are told to answer with bare JSON but regularly wrap it in prose or
//! code fences. Decoding runs in two stages: parse the whole text, then parse
//! the slice from the first `{` to the last `}`. Anything else becomes an
//! [`ErrorResult`] carrying the raw text.
//!
//! Parsing uses serde_json's default recursion limit (128 levels), so output
//! nested deeper than that is treated as unparsable.

use serde_json::Value;
use tracing::debug;

use crate::plan::{ErrorResult, Plan, PlanResult};

/// Decode raw completion text. Never fails; every input maps to a plan or an
/// error result.
pub fn decode_plan(raw: &str) -> PlanResult {
    if let Some(plan) = parse_object(raw) {
        return PlanResult::Plan(plan);
    }

    if let Some(slice) = salvage_slice(raw) {
        if let Some(plan) = parse_object(slice) {
            debug!(
                skipped_prefix = raw.find('{').unwrap_or(0),
                salvaged_len = slice.len(),
                "recovered plan from surrounding text"
            );
            return PlanResult::Plan(plan);
        }
    }

    PlanResult::Error(ErrorResult::unparsable(raw))
}

/// Inclusive slice from the first `{` to the last `}`, if the first comes
/// before the last. Unrelated brace pairs are not disambiguated.
pub fn salvage_slice(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

// Only objects count as plans; scalars and arrays fall through to salvage.
fn parse_object(text: &str) -> Option<Plan> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::ErrorKind;
    use serde_json::json;

    fn plan(result: PlanResult) -> Value {
        match result {
            PlanResult::Plan(plan) => Value::Object(plan),
            PlanResult::Error(err) => panic!("expected plan, got {err:?}"),
        }
    }

    fn error(result: PlanResult) -> ErrorResult {
        match result {
            PlanResult::Error(err) => err,
            PlanResult::Plan(plan) => panic!("expected error, got {plan:?}"),
        }
    }

    #[test]
    fn valid_object_passes_through_unchanged() {
        let value = json!({
            "user_profile": { "summary": "29yo runner" },
            "workout": [{ "day": "Day 1", "focus": "Legs", "exercises": [] }],
            "diet": { "meals": [{ "name": "Oats", "calories": 350 }] },
            "motivation": "Keep going"
        });
        let text = serde_json::to_string_pretty(&value).unwrap();
        assert_eq!(plan(decode_plan(&text)), value);
    }

    #[test]
    fn key_order_survives_decoding() {
        let raw = r#"{"user_profile":{"summary":"s"},"workout":[],"diet":{"meals":[]},"motivation":"m"}"#;
        assert_eq!(decode_plan(raw).into_body().to_string(), raw);

        let wrapped = format!("Here you go:\n{raw}\nEnjoy!");
        assert_eq!(decode_plan(&wrapped).into_body().to_string(), raw);
    }

    #[test]
    fn nesting_beyond_parser_depth_is_an_error() {
        let raw = format!("{{\"deep\":{}{}}}", "[".repeat(200), "]".repeat(200));
        let err = error(decode_plan(&raw));
        assert_eq!(err.kind, ErrorKind::UnparsableOutput);
    }

    #[test]
    fn salvages_object_wrapped_in_prose() {
        let raw = "Sure! Here's your plan: {\"motivation\":\"go\"} Hope that helps.";
        assert_eq!(plan(decode_plan(raw)), json!({ "motivation": "go" }));
    }

    #[test]
    fn salvages_object_inside_code_fence() {
        let raw = "```json\n{\"diet\": {\"meals\": []}}\n```";
        assert_eq!(plan(decode_plan(raw)), json!({ "diet": { "meals": [] } }));
    }

    #[test]
    fn empty_input_is_an_error_with_empty_raw() {
        let err = error(decode_plan(""));
        assert_eq!(err.kind, ErrorKind::UnparsableOutput);
        assert_eq!(err.raw.as_deref(), Some(""));
    }

    #[test]
    fn text_without_braces_is_an_error() {
        let err = error(decode_plan("no braces here"));
        assert_eq!(err.raw.as_deref(), Some("no braces here"));
    }

    #[test]
    fn unterminated_object_is_an_error() {
        let err = error(decode_plan("{broken json"));
        assert_eq!(err.raw.as_deref(), Some("{broken json"));
    }

    #[test]
    fn inverted_braces_skip_salvage() {
        assert_eq!(salvage_slice("} nothing {"), None);
        let err = error(decode_plan("} nothing {"));
        assert_eq!(err.kind, ErrorKind::UnparsableOutput);
    }

    #[test]
    fn straddling_fragments_are_not_disambiguated() {
        let raw = "first {\"a\":1} then {\"b\":2} done";
        assert_eq!(salvage_slice(raw), Some("{\"a\":1} then {\"b\":2}"));
        assert!(!decode_plan(raw).is_plan());
    }

    #[test]
    fn non_object_json_falls_through_to_salvage() {
        assert!(!decode_plan("42").is_plan());
        assert!(!decode_plan("\"plan\"").is_plan());
        assert_eq!(plan(decode_plan("[{\"motivation\":\"x\"}]")), json!({ "motivation": "x" }));
    }

    #[test]
    fn multibyte_prefix_does_not_break_slicing() {
        let raw = "Voilà 💪 {\"motivation\":\"allez\"} ✨";
        assert_eq!(plan(decode_plan(raw)), json!({ "motivation": "allez" }));
    }
}
