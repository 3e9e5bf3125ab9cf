use serde_json::{Value, json};

use crate::domain::{FieldSchema, FieldType, FormSchema};
use crate::path::ValueBag;

/// Build the initial value bag for `schema`, keyed by flat field name.
pub fn generate_defaults(schema: &FormSchema) -> ValueBag {
    let mut defaults = ValueBag::new();
    for field in &schema.fields {
        defaults.insert(field.name.clone(), default_value(field));
    }
    defaults
}

/// The explicit `defaultValue`, or the type-derived initial value.
pub fn default_value(field: &FieldSchema) -> Value {
    if let Some(value) = &field.default_value {
        return value.clone();
    }
    match field.field_type {
        FieldType::Checkbox | FieldType::Switch => Value::Bool(false),
        FieldType::Daterange => empty_range(),
        FieldType::Select | FieldType::Autocomplete if field.multiple => Value::Array(Vec::new()),
        FieldType::File => Value::Null,
        // "" rather than 0 keeps an untouched number distinguishable from zero.
        _ => Value::String(String::new()),
    }
}

/// The value a field is reset to when a clear rule fires.
pub fn empty_value(field: &FieldSchema) -> Value {
    match field.field_type {
        FieldType::Daterange => empty_range(),
        FieldType::Select | FieldType::Autocomplete if field.multiple => Value::Array(Vec::new()),
        FieldType::Checkbox | FieldType::Switch => Value::Bool(false),
        FieldType::Date | FieldType::Time | FieldType::Datetime | FieldType::File => Value::Null,
        _ => Value::String(String::new()),
    }
}

/// Whether `value` already counts as "nothing entered" for clearing purposes.
pub fn is_cleared(field: &FieldSchema, value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) if text.is_empty() => true,
        Some(other) => *other == empty_value(field),
    }
}

fn empty_range() -> Value {
    json!({"start": null, "end": null})
}
