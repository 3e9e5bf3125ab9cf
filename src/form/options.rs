use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::ValueBag;
use crate::validation::{Backend, ErrorMap};

pub type SubmitHandler = Box<dyn FnMut(&ValueBag)>;
pub type CrossFieldValidator = Box<dyn Fn(&ValueBag) -> ErrorMap>;
pub type ValuesListener = Box<dyn FnMut(&ValueBag)>;

/// When the error map is recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationMode {
    /// Only at submit time.
    #[default]
    OnSubmit,
    /// On every value change.
    OnChange,
    /// Whenever a field loses focus.
    OnBlur,
}

pub struct FormOptions {
    pub mode: ValidationMode,
    pub backend: Backend,
    /// Revalidate on every change once a submit has been attempted.
    pub revalidate_after_submit: bool,
    pub initial_values: Option<ValueBag>,
    pub(crate) validator: Option<CrossFieldValidator>,
    pub(crate) on_submit: Option<SubmitHandler>,
    pub(crate) on_values_change: Option<ValuesListener>,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            mode: ValidationMode::default(),
            backend: Backend::default(),
            revalidate_after_submit: true,
            initial_values: None,
            validator: None,
            on_submit: None,
            on_values_change: None,
        }
    }
}

impl fmt::Debug for FormOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormOptions")
            .field("mode", &self.mode)
            .field("backend", &self.backend)
            .field("revalidate_after_submit", &self.revalidate_after_submit)
            .field("initial_values", &self.initial_values)
            .field("validator", &self.validator.is_some())
            .field("on_submit", &self.on_submit.is_some())
            .field("on_values_change", &self.on_values_change.is_some())
            .finish()
    }
}

impl FormOptions {
    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_revalidate_after_submit(mut self, enabled: bool) -> Self {
        self.revalidate_after_submit = enabled;
        self
    }

    /// Values layered over the schema defaults; missing keys keep defaults.
    pub fn with_initial_values(mut self, values: ValueBag) -> Self {
        self.initial_values = Some(values);
        self
    }

    /// Cross-field validation whose entries override the compiled ones.
    pub fn with_validator(mut self, validator: impl Fn(&ValueBag) -> ErrorMap + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn with_submit_handler(mut self, handler: impl FnMut(&ValueBag) + 'static) -> Self {
        self.on_submit = Some(Box::new(handler));
        self
    }

    /// Called with the full bag after every change, clear and reset.
    pub fn with_values_listener(mut self, listener: impl FnMut(&ValueBag) + 'static) -> Self {
        self.on_values_change = Some(Box::new(listener));
        self
    }
}
