use serde_json::Value;

/// Input events a rendering layer feeds into a `FormController`.
#[derive(Debug, Clone, PartialEq)]
pub enum FormCommand {
    SetValue {
        name: String,
        value: Value,
        revalidate: bool,
    },
    Blur {
        name: String,
    },
    /// Reset one field to its type's empty value.
    Clear {
        name: String,
    },
    Submit,
    Reset,
}

impl FormCommand {
    pub fn set(name: impl Into<String>, value: impl Into<Value>) -> Self {
        FormCommand::SetValue {
            name: name.into(),
            value: value.into(),
            revalidate: false,
        }
    }

    pub fn blur(name: impl Into<String>) -> Self {
        FormCommand::Blur { name: name.into() }
    }

    pub fn clear(name: impl Into<String>) -> Self {
        FormCommand::Clear { name: name.into() }
    }
}

/// Result of a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The error map was empty and the submit handler ran.
    Submitted,
    /// Validation failed with this many field errors; nothing was submitted.
    Rejected { errors: usize },
}

/// What a dispatched command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Changed { cleared: Vec<String> },
    /// The value was refused by the field's input restriction.
    Rejected,
    Blurred,
    Submitted(SubmitOutcome),
    Reset,
}
