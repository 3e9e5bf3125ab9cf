#![deny(rust_2018_idioms)]

pub mod domain;
pub mod form;
pub mod io;
pub mod options;
pub mod path;
pub mod rules;
pub mod theme;
pub mod validation;

pub use domain::{
    ConditionRule, FieldOption, FieldSchema, FieldType, FormSchema, Operator, SchemaError,
    ValidationKind, ValidationRule, document_schema, parse_form_schema,
};
pub use form::{
    FormCommand, FormController, FormEvent, FormOptions, RenderDecision, SubmitOutcome,
    ValidationMode, generate_defaults,
};
pub use io::{
    DocumentFormat, form_schema_from_str, parse_document_str, render_document, theme_from_str,
    values_from_str,
};
pub use options::{OptionLookup, OptionProvider, filter_options};
pub use path::{ValueBag, get_by_path};
pub use rules::{is_disabled, is_visible, should_clear};
pub use theme::{ComponentState, ComponentTheme, Slot, StyleValue, Theme, resolve_slots};
pub use validation::{Backend, ErrorMap, FormValidator};

pub mod prelude {
    pub use super::{
        Backend, FormCommand, FormController, FormOptions, FormSchema, Theme, ValidationMode,
        ValueBag, generate_defaults, resolve_slots,
    };
}
