use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::constraint::{Constraint, EMAIL_PATTERN, URL_PATTERN};
use super::field::CheckFn;

static EMAIL: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).ok());
static URL: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(URL_PATTERN).ok());

/// Compile a constraint into a plain predicate over the coerced value.
pub(crate) fn compile(constraint: Constraint) -> CheckFn {
    match constraint {
        Constraint::MinLength(min) => Box::new(move |value: &Value| char_len(value) >= min),
        Constraint::MaxLength(max) => Box::new(move |value: &Value| char_len(value) <= max),
        Constraint::Length(len) => Box::new(move |value: &Value| char_len(value) == len),
        // A backtracking limit hit while matching counts as a pass.
        Constraint::Pattern(regex) => Box::new(move |value: &Value| {
            value
                .as_str()
                .is_none_or(|text| regex.is_match(text).unwrap_or(true))
        }),
        Constraint::Email => Box::new(|value: &Value| matches_regex(EMAIL.as_ref(), value)),
        Constraint::Url => Box::new(|value: &Value| matches_regex(URL.as_ref(), value)),
        Constraint::Min(min) => {
            Box::new(move |value: &Value| number(value).is_none_or(|n| n >= min))
        }
        Constraint::Max(max) => {
            Box::new(move |value: &Value| number(value).is_none_or(|n| n <= max))
        }
        Constraint::Step(step) => {
            Box::new(move |value: &Value| number(value).is_none_or(|n| n % step == 0.0))
        }
    }
}

fn char_len(value: &Value) -> u64 {
    value
        .as_str()
        .map(|text| text.chars().count() as u64)
        .unwrap_or_default()
}

fn matches_regex(regex: Option<&Regex>, value: &Value) -> bool {
    match (regex, value.as_str()) {
        (Some(regex), Some(text)) => regex.is_match(text),
        _ => true,
    }
}

fn number(value: &Value) -> Option<f64> {
    value.as_f64()
}
