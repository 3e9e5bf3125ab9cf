//! Compiles declarative validation rules into per-field validators and
//! assembles them into one form-level validator.

mod coerce;
mod constraint;
mod field;
mod native;
mod strict;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::FormSchema;
use crate::path::ValueBag;

pub use coerce::BaseKind;
pub use constraint::accepts_input;
pub use field::FieldValidator;

/// Field name to the first error message for that field.
pub type ErrorMap = IndexMap<String, String>;

/// How non-required constraints are executed. Both produce identical error
/// maps for the same schema and values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Backend {
    /// Plain Rust predicates.
    #[default]
    Native,
    /// One compiled JSON Schema fragment per constraint.
    JsonSchema,
}

#[derive(Debug)]
pub struct FormValidator {
    backend: Backend,
    fields: Vec<FieldValidator>,
}

impl FormValidator {
    pub fn compile(schema: &FormSchema, backend: Backend) -> Self {
        let fields = schema
            .fields
            .iter()
            .map(|field| FieldValidator::compile(field, backend))
            .collect();
        Self { backend, fields }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn field(&self, name: &str) -> Option<&FieldValidator> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Validate every field against the flat key of its name.
    pub fn validate(&self, values: &ValueBag) -> ErrorMap {
        let mut errors = ErrorMap::new();
        for field in &self.fields {
            if errors.contains_key(field.name()) {
                continue;
            }
            if let Some(message) = field.validate(values.get(field.name())) {
                errors.insert(field.name().to_string(), message);
            }
        }
        errors
    }

    pub fn validate_field(&self, name: &str, values: &ValueBag) -> Option<String> {
        self.fields
            .iter()
            .filter(|field| field.name() == name)
            .find_map(|field| field.validate(values.get(name)))
    }
}
