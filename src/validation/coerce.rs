use serde_json::{Number, Value};

use crate::domain::{FieldSchema, FieldType};

pub(crate) const NUMBER_MESSAGE: &str = "Must be a number";
pub(crate) const BOOLEAN_MESSAGE: &str = "Expected true or false";
pub(crate) const TEXT_MESSAGE: &str = "Expected text";
pub(crate) const CHOICE_MESSAGE: &str = "Expected a single option";
pub(crate) const CHOICE_LIST_MESSAGE: &str = "Expected a list of options";
pub(crate) const RANGE_MESSAGE: &str = "Expected a date range";

/// Shape a field's value is coerced to before any rule runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseKind {
    Number,
    Boolean,
    DateRange,
    Choice,
    ChoiceList,
    Text,
    Any,
}

impl BaseKind {
    pub fn for_field(field: &FieldSchema) -> Self {
        match field.field_type {
            FieldType::Number => BaseKind::Number,
            FieldType::Checkbox | FieldType::Switch => BaseKind::Boolean,
            FieldType::Daterange => BaseKind::DateRange,
            FieldType::Radio | FieldType::Select | FieldType::Autocomplete => {
                if field.multiple {
                    BaseKind::ChoiceList
                } else {
                    BaseKind::Choice
                }
            }
            FieldType::Date | FieldType::Time | FieldType::Datetime | FieldType::File => {
                BaseKind::Any
            }
            FieldType::Text
            | FieldType::Password
            | FieldType::Email
            | FieldType::Url
            | FieldType::Tel
            | FieldType::Textarea => BaseKind::Text,
        }
    }
}

/// Result of base coercion. `Empty` is "no value yet", not a type error.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Empty,
    Present(Value),
}

pub fn coerce(kind: BaseKind, value: Option<&Value>) -> Result<Coerced, &'static str> {
    let Some(value) = value else {
        return Ok(Coerced::Empty);
    };
    if value.is_null() || value.as_str() == Some("") {
        return Ok(Coerced::Empty);
    }

    match kind {
        BaseKind::Number => coerce_number(value),
        BaseKind::Boolean => match value {
            Value::Bool(_) => Ok(Coerced::Present(value.clone())),
            _ => Err(BOOLEAN_MESSAGE),
        },
        BaseKind::DateRange => match value {
            Value::Object(_) => Ok(Coerced::Present(value.clone())),
            _ => Err(RANGE_MESSAGE),
        },
        BaseKind::Choice => match value {
            Value::String(_) | Value::Number(_) => Ok(Coerced::Present(value.clone())),
            _ => Err(CHOICE_MESSAGE),
        },
        BaseKind::ChoiceList => match value {
            Value::Array(items) if items.iter().all(is_primitive_choice) => {
                if items.is_empty() {
                    Ok(Coerced::Empty)
                } else {
                    Ok(Coerced::Present(value.clone()))
                }
            }
            _ => Err(CHOICE_LIST_MESSAGE),
        },
        BaseKind::Text => match value {
            Value::String(_) => Ok(Coerced::Present(value.clone())),
            _ => Err(TEXT_MESSAGE),
        },
        BaseKind::Any => Ok(Coerced::Present(value.clone())),
    }
}

fn coerce_number(value: &Value) -> Result<Coerced, &'static str> {
    match value {
        Value::Number(_) => Ok(Coerced::Present(value.clone())),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(Coerced::Empty);
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(|number| Coerced::Present(Value::Number(number)))
                .ok_or(NUMBER_MESSAGE)
        }
        _ => Err(NUMBER_MESSAGE),
    }
}

fn is_primitive_choice(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_))
}

/// The `required` test, applied after every other rule.
pub fn satisfies_required(kind: BaseKind, coerced: &Coerced) -> bool {
    let Coerced::Present(value) = coerced else {
        return false;
    };
    match kind {
        BaseKind::Boolean => value == &Value::Bool(true),
        BaseKind::DateRange => {
            let side = |key: &str| value.get(key).is_some_and(is_truthy);
            side("start") && side("end")
        }
        _ => true,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
