use std::fmt;

use serde_json::{Map, Value};

/// Small description language for the plan's advisory shape.
#[derive(Debug, Clone)]
pub enum Schema {
    Text,
    Number,
    /// A string or a number. Models write `"3 x 12"` and `12` interchangeably.
    Scalar,
    Any,
    List(Box<Schema>),
    Object(Vec<Field>),
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub schema: Schema,
    pub required: bool,
}

impl Field {
    pub fn required(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            schema,
            required: true,
        }
    }

    pub fn optional(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            schema,
            required: false,
        }
    }
}

/// One mismatch between a value and a schema, located by a JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    Missing {
        path: String,
    },
    Mismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaViolation::Missing { path } => write!(f, "missing field at {path}"),
            SchemaViolation::Mismatch {
                path,
                expected,
                found,
            } => write!(f, "expected {expected} at {path}, found {found}"),
        }
    }
}

impl std::error::Error for SchemaViolation {}

/// Shape the prompt asks the model to produce.
pub fn plan_schema() -> Schema {
    let exercise = Schema::Object(vec![
        Field::required("name", Schema::Text),
        Field::optional("sets", Schema::Scalar),
        Field::optional("visual_prompt", Schema::Text),
    ]);
    let day = Schema::Object(vec![
        Field::optional("day", Schema::Scalar),
        Field::optional("focus", Schema::Text),
        Field::required("exercises", Schema::List(Box::new(exercise))),
    ]);
    let meal = Schema::Object(vec![
        Field::required("name", Schema::Text),
        Field::optional("calories", Schema::Number),
        Field::optional("visual_prompt", Schema::Text),
    ]);

    Schema::Object(vec![
        Field::optional(
            "user_profile",
            Schema::Object(vec![Field::optional("summary", Schema::Text)]),
        ),
        Field::required("workout", Schema::List(Box::new(day))),
        Field::required(
            "diet",
            Schema::Object(vec![Field::required("meals", Schema::List(Box::new(meal)))]),
        ),
        Field::required("motivation", Schema::Text),
    ])
}

/// Validate a value, collecting every violation rather than stopping at the
/// first. Extra fields are allowed.
pub fn validate(schema: &Schema, value: &Value) -> Result<(), Vec<SchemaViolation>> {
    let mut violations = Vec::new();
    check(schema, value, "$", &mut violations);
    finish(violations)
}

/// Like [`validate`], for an object that is not wrapped in a [`Value`].
pub fn validate_object(schema: &Schema, object: &Map<String, Value>) -> Result<(), Vec<SchemaViolation>> {
    let mut violations = Vec::new();
    match schema {
        Schema::Object(fields) => check_fields(fields, object, "$", &mut violations),
        Schema::Any => {}
        other => violations.push(SchemaViolation::Mismatch {
            path: "$".into(),
            expected: expected_name(other),
            found: "object",
        }),
    }
    finish(violations)
}

fn finish(violations: Vec<SchemaViolation>) -> Result<(), Vec<SchemaViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn check(schema: &Schema, value: &Value, path: &str, out: &mut Vec<SchemaViolation>) {
    let ok = match (schema, value) {
        (Schema::Any, _) => true,
        (Schema::Text, Value::String(_)) => true,
        (Schema::Number, Value::Number(_)) => true,
        (Schema::Scalar, Value::String(_) | Value::Number(_)) => true,
        (Schema::List(inner), Value::Array(items)) => {
            for (idx, item) in items.iter().enumerate() {
                check(inner, item, &format!("{path}[{idx}]"), out);
            }
            true
        }
        (Schema::Object(fields), Value::Object(map)) => {
            check_fields(fields, map, path, out);
            true
        }
        _ => false,
    };

    if !ok {
        out.push(SchemaViolation::Mismatch {
            path: path.to_string(),
            expected: expected_name(schema),
            found: value_type_name(value),
        });
    }
}

fn check_fields(fields: &[Field], map: &Map<String, Value>, path: &str, out: &mut Vec<SchemaViolation>) {
    for field in fields {
        let field_path = format!("{path}.{}", field.name);
        match map.get(field.name) {
            // Null is how models usually spell "absent".
            None | Some(Value::Null) if !field.required => {}
            None => out.push(SchemaViolation::Missing { path: field_path }),
            Some(v) => check(&field.schema, v, &field_path, out),
        }
    }
}

fn expected_name(schema: &Schema) -> &'static str {
    match schema {
        Schema::Text => "string",
        Schema::Number => "number",
        Schema::Scalar => "string or number",
        Schema::Any => "any",
        Schema::List(_) => "array",
        Schema::Object(_) => "object",
    }
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
