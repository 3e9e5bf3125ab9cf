use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;

use super::schema::{FormSchema, Operator};

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("form schema must be an object, found {0}")]
    NotAnObject(&'static str),

    #[error("form schema must define a `fields` array")]
    MissingFields,

    #[error("invalid form schema: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Parse a form schema document into the internal `FormSchema`.
///
/// Structural problems are errors. Suspicious but usable configuration
/// (duplicate names, rules pointing at unknown fields, unknown operators) is
/// only logged, since a misconfigured rule must never make a form unusable.
pub fn parse_form_schema(value: &Value) -> Result<FormSchema, SchemaError> {
    let Some(object) = value.as_object() else {
        return Err(SchemaError::NotAnObject(json_kind(value)));
    };
    if !object.get("fields").is_some_and(Value::is_array) {
        return Err(SchemaError::MissingFields);
    }
    let schema: FormSchema = serde_json::from_value(value.clone())?;
    lint_schema(&schema);
    Ok(schema)
}

/// JSON Schema describing form schema documents, for editors and tooling.
pub fn document_schema() -> serde_json::Result<Value> {
    serde_json::to_value(schemars::schema_for!(FormSchema))
}

fn lint_schema(schema: &FormSchema) {
    let mut names = HashSet::new();
    for field in &schema.fields {
        if !names.insert(field.name.as_str()) {
            tracing::warn!(field = %field.name, "duplicate field name; later fields share storage");
        }
    }

    for field in &schema.fields {
        let groups = [
            ("visibility", &field.visibility_rules),
            ("disable", &field.disable_rules),
            ("clear", &field.clear_value_rules),
        ];
        for (kind, rules) in groups {
            for rule in rules {
                if !names.contains(rule.field.as_str()) {
                    tracing::debug!(
                        field = %field.name,
                        depends_on = %rule.field,
                        "{kind} rule references a name outside the schema"
                    );
                }
                if rule.operator == Operator::Unknown
                    || (rule.operator == Operator::Changed && kind != "clear")
                {
                    tracing::warn!(
                        field = %field.name,
                        operator = ?rule.operator,
                        "{kind} rule uses an unsupported operator; it will never block"
                    );
                }
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
