use jsonschema::Validator;
use serde_json::{Value, json};

use super::constraint::{Constraint, EMAIL_PATTERN, URL_PATTERN};
use super::field::CheckFn;
use super::native;

/// JSON Schema fragment enforcing a single constraint. `None` for steps,
/// which keep the exact float remainder check on both backends.
pub(crate) fn schema_for(constraint: &Constraint) -> Option<Value> {
    let schema = match constraint {
        Constraint::MinLength(min) => json!({"minLength": min}),
        Constraint::MaxLength(max) => json!({"maxLength": max}),
        Constraint::Length(len) => json!({"minLength": len, "maxLength": len}),
        Constraint::Pattern(regex) => json!({"pattern": regex.as_str()}),
        Constraint::Email => json!({"pattern": EMAIL_PATTERN}),
        Constraint::Url => json!({"pattern": URL_PATTERN}),
        Constraint::Min(min) => json!({"minimum": min}),
        Constraint::Max(max) => json!({"maximum": max}),
        Constraint::Step(_) => return None,
    };
    Some(schema)
}

/// Compile a constraint into a `jsonschema` validator. A fragment the engine
/// refuses is dropped (fail open), same as an invalid pattern.
pub(crate) fn compile(constraint: Constraint) -> Option<CheckFn> {
    let Some(schema) = schema_for(&constraint) else {
        return Some(native::compile(constraint));
    };
    match jsonschema::validator_for(&schema) {
        Ok(validator) => Some(wrap(validator)),
        Err(err) => {
            tracing::warn!(%schema, %err, "constraint rejected by JSON Schema engine; skipped");
            None
        }
    }
}

fn wrap(validator: Validator) -> CheckFn {
    Box::new(move |value: &Value| validator.is_valid(value))
}
