use std::fmt;

use serde_json::Value;

use crate::domain::FieldSchema;

use super::Backend;
use super::coerce::{self, BOOLEAN_MESSAGE, BaseKind, Coerced};
use super::constraint::{Constraint, message_for};
use super::{native, strict};

pub(crate) type CheckFn = Box<dyn Fn(&Value) -> bool + Send + Sync>;

struct Check {
    message: String,
    passes: CheckFn,
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Compiled validator for one field.
///
/// Runs base coercion, then every non-required rule in schema order (each
/// skipped while the value is empty), then `required`. A field without
/// `required` accepts "no value", except boolean fields which always need
/// a boolean.
#[derive(Debug)]
pub struct FieldValidator {
    name: String,
    kind: BaseKind,
    checks: Vec<Check>,
    required: Option<String>,
}

impl FieldValidator {
    pub fn compile(field: &FieldSchema, backend: Backend) -> Self {
        let mut checks = Vec::new();
        for rule in &field.validation {
            let Some(constraint) = Constraint::from_rule(field, rule) else {
                continue;
            };
            let passes = match backend {
                Backend::Native => Some(native::compile(constraint)),
                Backend::JsonSchema => strict::compile(constraint),
            };
            if let Some(passes) = passes {
                checks.push(Check {
                    message: message_for(rule),
                    passes,
                });
            }
        }

        Self {
            name: field.name.clone(),
            kind: BaseKind::for_field(field),
            checks,
            required: field.required_rule().map(message_for),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required.is_some()
    }

    /// First failing message, or `None` when the value is acceptable.
    pub fn validate(&self, value: Option<&Value>) -> Option<String> {
        let coerced = match coerce::coerce(self.kind, value) {
            Ok(coerced) => coerced,
            Err(message) => return Some(message.to_string()),
        };

        if let Coerced::Present(value) = &coerced
            && let Some(failed) = self.checks.iter().find(|check| !(check.passes)(value))
        {
            return Some(failed.message.clone());
        }

        if let Some(message) = &self.required {
            return (!coerce::satisfies_required(self.kind, &coerced)).then(|| message.clone());
        }

        if self.kind == BaseKind::Boolean && coerced == Coerced::Empty {
            return Some(BOOLEAN_MESSAGE.to_string());
        }
        None
    }
}
