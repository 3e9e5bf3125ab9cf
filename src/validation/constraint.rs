use fancy_regex::Regex;
use serde_json::Value;

use crate::domain::{FieldSchema, ValidationKind, ValidationRule};

use super::coerce::BaseKind;

pub(crate) const DEFAULT_MESSAGE: &str = "Invalid";
pub(crate) const DEFAULT_REQUIRED_MESSAGE: &str = "Required";

pub(crate) const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
pub(crate) const URL_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9+.-]*://[^\s/?#]+\S*$";

/// A non-required validation rule with its argument already checked.
#[derive(Debug, Clone)]
pub enum Constraint {
    MinLength(u64),
    MaxLength(u64),
    Length(u64),
    Pattern(Regex),
    Email,
    Url,
    Min(f64),
    Max(f64),
    Step(f64),
}

impl Constraint {
    /// Turn a rule into a constraint for `field`, or `None` when the rule is
    /// `required`, does not apply to the field's type, or is malformed.
    pub fn from_rule(field: &FieldSchema, rule: &ValidationRule) -> Option<Self> {
        let kind = BaseKind::for_field(field);
        let applies = match rule.kind {
            ValidationKind::Required => return None,
            ValidationKind::Unknown => {
                tracing::warn!(field = %field.name, "unknown validation rule type; skipped");
                return None;
            }
            ValidationKind::MinLength
            | ValidationKind::MaxLength
            | ValidationKind::Length
            | ValidationKind::Pattern
            | ValidationKind::Email
            | ValidationKind::Url => kind == BaseKind::Text,
            ValidationKind::Min | ValidationKind::Max | ValidationKind::Step => {
                kind == BaseKind::Number
            }
        };
        if !applies {
            tracing::debug!(
                field = %field.name,
                rule = ?rule.kind,
                field_type = field.field_type.as_str(),
                "validation rule does not apply to this field type; skipped"
            );
            return None;
        }

        let value = rule.value.as_ref();
        let constraint = match rule.kind {
            ValidationKind::MinLength => length_arg(value).map(Constraint::MinLength),
            ValidationKind::MaxLength => length_arg(value).map(Constraint::MaxLength),
            ValidationKind::Length => length_arg(value).map(Constraint::Length),
            ValidationKind::Pattern => pattern_arg(field, value).map(Constraint::Pattern),
            ValidationKind::Email => Some(Constraint::Email),
            ValidationKind::Url => Some(Constraint::Url),
            ValidationKind::Min => number_arg(value).map(Constraint::Min),
            ValidationKind::Max => number_arg(value).map(Constraint::Max),
            ValidationKind::Step => number_arg(value)
                .filter(|step| *step > 0.0)
                .map(Constraint::Step),
            ValidationKind::Required | ValidationKind::Unknown => None,
        };
        if constraint.is_none() {
            tracing::warn!(
                field = %field.name,
                rule = ?rule.kind,
                value = ?rule.value,
                "malformed validation rule ignored"
            );
        }
        constraint
    }
}

pub(crate) fn message_for(rule: &ValidationRule) -> String {
    let fallback = match rule.kind {
        ValidationKind::Required => DEFAULT_REQUIRED_MESSAGE,
        _ => DEFAULT_MESSAGE,
    };
    rule.message.clone().unwrap_or_else(|| fallback.to_string())
}

fn length_arg(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|n| *n >= 0.0 && n.fract() == 0.0)
                .map(|n| n as u64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn number_arg(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Whether `text` may be entered into `field`. Only `restrictInput` fields
/// with a pattern rule are gated; empty text and invalid patterns pass.
pub fn accepts_input(field: &FieldSchema, text: &str) -> bool {
    if !field.restrict_input || text.is_empty() {
        return true;
    }
    let Some(source) = field
        .validation
        .iter()
        .find(|rule| rule.kind == ValidationKind::Pattern)
        .and_then(|rule| rule.value.as_ref())
        .and_then(Value::as_str)
    else {
        return true;
    };
    match Regex::new(source) {
        Ok(regex) => regex.is_match(text).unwrap_or(true),
        Err(_) => true,
    }
}

/// Invalid expressions fail open: the rule is dropped instead of erroring.
fn pattern_arg(field: &FieldSchema, value: Option<&Value>) -> Option<Regex> {
    let source = value?.as_str()?;
    match Regex::new(source) {
        Ok(regex) => Some(regex),
        Err(err) => {
            tracing::warn!(field = %field.name, pattern = source, %err, "invalid pattern");
            None
        }
    }
}
