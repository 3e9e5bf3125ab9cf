//! Three-tier style resolution: global theme, component theme, instance
//! overrides.

mod resolve;

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use resolve::{ResolvedSlots, SlotOverrides, resolve_field_slots, resolve_slots};

/// Named visual region of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Slot {
    Root,
    Label,
    Input,
    HelperText,
    ErrorText,
    Wrapper,
    Icon,
    Track,
    Thumb,
    List,
    Item,
    Tag,
}

impl Slot {
    pub const ALL: [Slot; 12] = [
        Slot::Root,
        Slot::Label,
        Slot::Input,
        Slot::HelperText,
        Slot::ErrorText,
        Slot::Wrapper,
        Slot::Icon,
        Slot::Track,
        Slot::Thumb,
        Slot::List,
        Slot::Item,
        Slot::Tag,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Root => "root",
            Slot::Label => "label",
            Slot::Input => "input",
            Slot::HelperText => "helperText",
            Slot::ErrorText => "errorText",
            Slot::Wrapper => "wrapper",
            Slot::Icon => "icon",
            Slot::Track => "track",
            Slot::Thumb => "thumb",
            Slot::List => "list",
            Slot::Item => "item",
            Slot::Tag => "tag",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Outline,
    Filled,
    Standard,
    Floating,
}

/// State a computed style can inspect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentState {
    pub error: bool,
    pub disabled: bool,
    pub focused: bool,
    pub checked: bool,
    pub value: Option<Value>,
    pub variant: Option<Variant>,
}

impl ComponentState {
    pub fn with_error(mut self, error: bool) -> Self {
        self.error = error;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }
}

type StyleFn = dyn Fn(&ComponentState) -> String + Send + Sync;

/// A slot style: fixed class string or a function of component state.
#[derive(Clone)]
pub enum StyleValue {
    Static(String),
    Computed(Arc<StyleFn>),
}

impl StyleValue {
    pub fn computed(style: impl Fn(&ComponentState) -> String + Send + Sync + 'static) -> Self {
        StyleValue::Computed(Arc::new(style))
    }

    pub fn resolve(&self, state: &ComponentState) -> Cow<'_, str> {
        match self {
            StyleValue::Static(class) => Cow::Borrowed(class),
            StyleValue::Computed(style) => Cow::Owned(style(state)),
        }
    }
}

impl fmt::Debug for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Static(class) => f.debug_tuple("Static").field(class).finish(),
            StyleValue::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(class: &str) -> Self {
        StyleValue::Static(class.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(class: String) -> Self {
        StyleValue::Static(class)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComponentTheme {
    slots: IndexMap<Slot, StyleValue>,
}

impl ComponentTheme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(mut self, slot: Slot, style: impl Into<StyleValue>) -> Self {
        self.slots.insert(slot, style.into());
        self
    }

    pub fn with_computed(
        self,
        slot: Slot,
        style: impl Fn(&ComponentState) -> String + Send + Sync + 'static,
    ) -> Self {
        self.with_slot(slot, StyleValue::computed(style))
    }

    pub fn get(&self, slot: Slot) -> Option<&StyleValue> {
        self.slots.get(&slot)
    }
}

/// Theme for a form subtree. Component keys are free-form (`textInput`,
/// `select`, ...); `global` applies to every component.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    pub global: Option<ComponentTheme>,
    components: IndexMap<String, ComponentTheme>,
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global(mut self, global: ComponentTheme) -> Self {
        self.global = Some(global);
        self
    }

    pub fn with_component(mut self, key: impl Into<String>, theme: ComponentTheme) -> Self {
        self.components.insert(key.into(), theme);
        self
    }

    pub fn component(&self, key: &str) -> Option<&ComponentTheme> {
        self.components.get(key)
    }
}

/// Theme documents only carry static class strings.
impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, IndexMap<Slot, String>>::deserialize(deserializer)?;
        let mut theme = Theme::new();
        for (key, slots) in raw {
            let component = ComponentTheme {
                slots: slots
                    .into_iter()
                    .map(|(slot, class)| (slot, StyleValue::Static(class)))
                    .collect(),
            };
            if key == "global" {
                theme.global = Some(component);
            } else {
                theme.components.insert(key, component);
            }
        }
        Ok(theme)
    }
}
