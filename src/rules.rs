//! Conditional visibility, disabling and value clearing.
//!
//! A rule list is a plain conjunction: it holds when every rule holds. An
//! operator that cannot be evaluated for a rule kind (an unknown name, or
//! `changed` outside clear rules) never blocks the field: it counts as passing
//! for visibility and as failing for disable and clear rules.

use std::cmp::Ordering;

use serde_json::Value;

use crate::domain::{ConditionRule, FieldSchema, Operator};
use crate::path::{ValueBag, get_by_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleKind {
    Visibility,
    Disable,
    Clear,
}

impl RuleKind {
    /// Outcome of a rule whose operator is unsupported for this kind.
    fn non_blocking(self) -> bool {
        matches!(self, RuleKind::Visibility)
    }
}

pub fn is_visible(field: &FieldSchema, values: &ValueBag) -> bool {
    all_hold(&field.visibility_rules, values, None, RuleKind::Visibility)
}

pub fn is_disabled(field: &FieldSchema, values: &ValueBag) -> bool {
    if field.disabled {
        return true;
    }
    !field.disable_rules.is_empty()
        && all_hold(&field.disable_rules, values, None, RuleKind::Disable)
}

/// `previous` is the bag as it was before the current change; `None` on the
/// very first evaluation, where `changed` never fires.
pub fn should_clear(field: &FieldSchema, values: &ValueBag, previous: Option<&ValueBag>) -> bool {
    !field.clear_value_rules.is_empty()
        && all_hold(&field.clear_value_rules, values, previous, RuleKind::Clear)
}

fn all_hold(
    rules: &[ConditionRule],
    values: &ValueBag,
    previous: Option<&ValueBag>,
    kind: RuleKind,
) -> bool {
    rules
        .iter()
        .all(|rule| rule_holds(rule, values, previous, kind))
}

fn rule_holds(
    rule: &ConditionRule,
    values: &ValueBag,
    previous: Option<&ValueBag>,
    kind: RuleKind,
) -> bool {
    let current = get_by_path(values, &rule.field);
    if rule.operator == Operator::Changed {
        if kind != RuleKind::Clear {
            return kind.non_blocking();
        }
        return previous.is_some_and(|prev| current != get_by_path(prev, &rule.field));
    }
    evaluate_operator(rule.operator, current, rule.value.as_ref())
        .unwrap_or_else(|| kind.non_blocking())
}

/// Evaluate a stateless operator. Returns `None` for operators that need
/// history (`changed`) or are unknown.
pub fn evaluate_operator(
    operator: Operator,
    actual: Option<&Value>,
    expected: Option<&Value>,
) -> Option<bool> {
    let outcome = match operator {
        Operator::Eq => actual == expected,
        Operator::Neq => actual != expected,
        Operator::In => match (expected, actual) {
            (Some(Value::Array(items)), Some(actual)) => items.contains(actual),
            _ => false,
        },
        Operator::Contains => match (actual, expected) {
            (Some(Value::Array(items)), Some(expected)) => items.contains(expected),
            _ => false,
        },
        Operator::Gt => compare(actual, expected) == Some(Ordering::Greater),
        Operator::Lt => compare(actual, expected) == Some(Ordering::Less),
        Operator::Changed | Operator::Unknown => return None,
    };
    Some(outcome)
}

/// Ordering between two values: numbers (and numeric strings or booleans
/// against numbers) compare numerically, two strings compare by code point.
/// Anything else is unordered.
fn compare(left: Option<&Value>, right: Option<&Value>) -> Option<Ordering> {
    let (left, right) = (left?, right?);
    if let (Value::String(a), Value::String(b)) = (left, right) {
        return Some(a.as_str().cmp(b.as_str()));
    }
    let (a, b) = (numeric(left)?, numeric(right)?);
    a.partial_cmp(&b)
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::String(text) if !text.trim().is_empty() => text.trim().parse().ok(),
        _ => None,
    }
}
