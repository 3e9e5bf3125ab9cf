use indexmap::IndexSet;
use serde_json::Value;

use crate::domain::{FieldSchema, FormSchema};
use crate::path::{ValueBag, get_by_path, set_flat};
use crate::rules;
use crate::validation::{self, ErrorMap, FormValidator};

use super::actions::{FormCommand, FormEvent, SubmitOutcome};
use super::defaults::{empty_value, generate_defaults, is_cleared};
use super::options::{FormOptions, ValidationMode};
use super::render::RenderDecision;

/// Owns the value bag of one form instance and drives every change through
/// rule evaluation and validation.
#[derive(Debug)]
pub struct FormController {
    schema: FormSchema,
    validator: FormValidator,
    options: FormOptions,
    initial: ValueBag,
    values: ValueBag,
    previous: Option<ValueBag>,
    errors: ErrorMap,
    touched: IndexSet<String>,
    is_submitted: bool,
}

impl FormController {
    pub fn new(schema: FormSchema, options: FormOptions) -> Self {
        let validator = FormValidator::compile(&schema, options.backend);
        let mut initial = generate_defaults(&schema);
        if let Some(provided) = &options.initial_values {
            for (name, value) in provided {
                initial.insert(name.clone(), value.clone());
            }
        }
        Self {
            values: initial.clone(),
            schema,
            validator,
            options,
            initial,
            previous: None,
            errors: ErrorMap::new(),
            touched: IndexSet::new(),
            is_submitted: false,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &ValueBag {
        &self.values
    }

    /// The bag as it was before the most recent change, if any.
    pub fn previous_values(&self) -> Option<&ValueBag> {
        self.previous.as_ref()
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        get_by_path(&self.values, name)
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn touched(&self) -> &IndexSet<String> {
        &self.touched
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    pub fn is_submitted(&self) -> bool {
        self.is_submitted
    }

    pub fn mode(&self) -> ValidationMode {
        self.options.mode
    }

    pub fn dispatch(&mut self, command: FormCommand) -> FormEvent {
        match command {
            FormCommand::SetValue {
                name,
                value,
                revalidate,
            } => {
                if !self.accepts_input(&name, &value) {
                    return FormEvent::Rejected;
                }
                FormEvent::Changed {
                    cleared: self.set_field_value(&name, value, revalidate),
                }
            }
            FormCommand::Blur { name } => {
                self.handle_blur(&name);
                FormEvent::Blurred
            }
            FormCommand::Clear { name } => FormEvent::Changed {
                cleared: self.clear_field(&name),
            },
            FormCommand::Submit => FormEvent::Submitted(self.handle_submit()),
            FormCommand::Reset => {
                self.reset();
                FormEvent::Reset
            }
        }
    }

    /// Write `value` under the flat key `name`, apply clear rules and
    /// revalidate when the mode asks for it. Returns the names of fields whose
    /// values were cleared during this change.
    ///
    /// Text that fails the pattern of a `restrictInput` field leaves the bag
    /// untouched.
    pub fn set_field_value(&mut self, name: &str, value: Value, revalidate: bool) -> Vec<String> {
        if !self.accepts_input(name, &value) {
            tracing::debug!(field = name, "input rejected by pattern");
            return Vec::new();
        }
        self.write_value(name, value, revalidate)
    }

    /// Whether `value` may be written to `name`. Only text aimed at a
    /// `restrictInput` field can be refused.
    pub fn accepts_input(&self, name: &str, value: &Value) -> bool {
        match (self.schema.field(name), value.as_str()) {
            (Some(field), Some(text)) => validation::accepts_input(field, text),
            _ => true,
        }
    }

    /// Reset `name` to the empty value of its type (see [`empty_value`]).
    /// Clear rules depending on it fire as for any other change.
    pub fn clear_field(&mut self, name: &str) -> Vec<String> {
        let Some(field) = self.schema.field(name) else {
            tracing::debug!(field = name, "clear of unknown field ignored");
            return Vec::new();
        };
        let empty = empty_value(field);
        self.write_value(name, empty, false)
    }

    fn write_value(&mut self, name: &str, value: Value, revalidate: bool) -> Vec<String> {
        let before = self.values.clone();
        set_flat(&mut self.values, name, value);
        let cleared = self.apply_clear_rules(name, &before);
        self.previous = Some(before);

        let field_wants_validation = self
            .schema
            .field(name)
            .is_some_and(|field| field.validate_on_change);
        if revalidate
            || field_wants_validation
            || self.options.mode == ValidationMode::OnChange
            || (self.is_submitted && self.options.revalidate_after_submit)
        {
            self.validate();
        }
        self.notify_values();
        cleared
    }

    pub fn handle_blur(&mut self, name: &str) {
        self.touched.insert(name.to_string());
        if self.options.mode == ValidationMode::OnBlur {
            self.validate();
        }
    }

    /// Validate everything and hand the values to the submit handler when the
    /// error map is empty. Safe to call again after fixing errors.
    pub fn handle_submit(&mut self) -> SubmitOutcome {
        self.is_submitted = true;
        self.validate();
        if !self.errors.is_empty() {
            tracing::debug!(errors = self.errors.len(), "submit rejected");
            return SubmitOutcome::Rejected {
                errors: self.errors.len(),
            };
        }
        if let Some(handler) = self.options.on_submit.as_mut() {
            handler(&self.values);
        }
        tracing::debug!("submit accepted");
        SubmitOutcome::Submitted
    }

    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.previous = None;
        self.errors.clear();
        self.touched.clear();
        self.is_submitted = false;
        self.notify_values();
    }

    /// Regenerate the error map from the current values.
    pub fn validate(&mut self) -> &ErrorMap {
        let mut errors = self.validator.validate(&self.values);
        if let Some(custom) = &self.options.validator {
            errors.extend(custom(&self.values));
        }
        self.errors = errors;
        &self.errors
    }

    /// Error for `name` if the user should see it: the field was touched or a
    /// submit was attempted.
    pub fn displayed_error(&self, name: &str) -> Option<&str> {
        if !self.is_submitted && !self.touched.contains(name) {
            return None;
        }
        self.errors.get(name).map(String::as_str)
    }

    pub fn render_decision(&self, field: &FieldSchema) -> RenderDecision {
        let visible = !field.hidden && rules::is_visible(field, &self.values);
        RenderDecision {
            visible,
            disabled: rules::is_disabled(field, &self.values),
            reserve_space: !visible && field.reserve_space,
            error: self.displayed_error(&field.name).map(str::to_string),
        }
    }

    pub fn render_decisions(&self) -> Vec<(&FieldSchema, RenderDecision)> {
        self.schema
            .fields
            .iter()
            .map(|field| (field, self.render_decision(field)))
            .collect()
    }

    fn notify_values(&mut self) {
        if let Some(listener) = self.options.on_values_change.as_mut() {
            listener(&self.values);
        }
    }

    /// Clear fields whose clear rules fire because a field they depend on
    /// changed. A cleared field counts as a change for the next pass; every
    /// field is cleared at most once per change and the edited field is
    /// never cleared by its own edit.
    fn apply_clear_rules(&mut self, origin: &str, before: &ValueBag) -> Vec<String> {
        let mut cleared: Vec<String> = Vec::new();
        let mut reference = before.clone();
        loop {
            let snapshot = self.values.clone();
            let mut pass = Vec::new();
            for field in &self.schema.fields {
                if field.name == origin || cleared.contains(&field.name) {
                    continue;
                }
                if !depends_on_change(field, &snapshot, &reference)
                    || !rules::should_clear(field, &snapshot, Some(&reference))
                    || is_cleared(field, get_by_path(&snapshot, &field.name))
                {
                    continue;
                }
                pass.push((field.name.clone(), empty_value(field)));
            }
            if pass.is_empty() {
                break;
            }
            for (name, empty) in pass {
                tracing::debug!(field = %name, "clear rule fired");
                set_flat(&mut self.values, &name, empty);
                cleared.push(name);
            }
            reference = snapshot;
        }
        cleared
    }
}

fn depends_on_change(field: &FieldSchema, current: &ValueBag, reference: &ValueBag) -> bool {
    field
        .clear_value_rules
        .iter()
        .any(|rule| get_by_path(current, &rule.field) != get_by_path(reference, &rule.field))
}
