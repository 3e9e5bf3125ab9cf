use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::FieldSchema;

use super::{ComponentState, ComponentTheme, Slot, Theme};

/// Per-instance class strings appended after the theme layers.
pub type SlotOverrides = IndexMap<Slot, String>;

/// Final class string per slot. Slots that resolved to nothing are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedSlots(IndexMap<Slot, String>);

impl ResolvedSlots {
    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.0.get(&slot).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, &str)> {
        self.0.iter().map(|(slot, class)| (*slot, class.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Resolve every slot as `global component override`, skipping empty parts.
///
/// Pure: call again whenever the theme, state or overrides change, since
/// computed styles depend on the state.
pub fn resolve_slots(
    theme: &Theme,
    component_key: &str,
    state: &ComponentState,
    overrides: Option<&SlotOverrides>,
    use_global: bool,
) -> ResolvedSlots {
    let global = theme.global.as_ref().filter(|_| use_global);
    let component = theme.component(component_key);

    let mut resolved = IndexMap::new();
    for slot in Slot::ALL {
        let mut parts: Vec<String> = Vec::with_capacity(3);
        for layer in [global, component].into_iter().flatten() {
            push_part(&mut parts, layer_class(layer, slot, state));
        }
        if let Some(extra) = overrides.and_then(|overrides| overrides.get(&slot)) {
            push_part(&mut parts, Some(extra.clone()));
        }
        if !parts.is_empty() {
            resolved.insert(slot, parts.join(" "));
        }
    }
    ResolvedSlots(resolved)
}

/// Resolve slots for a schema field using its type's component key.
pub fn resolve_field_slots(
    theme: &Theme,
    field: &FieldSchema,
    state: &ComponentState,
    overrides: Option<&SlotOverrides>,
) -> ResolvedSlots {
    resolve_slots(
        theme,
        field.field_type.component_key(),
        state,
        overrides,
        true,
    )
}

fn layer_class(layer: &ComponentTheme, slot: Slot, state: &ComponentState) -> Option<String> {
    layer
        .get(slot)
        .map(|style| style.resolve(state).into_owned())
}

fn push_part(parts: &mut Vec<String>, class: Option<String>) {
    if let Some(class) = class {
        let trimmed = class.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed.to_string());
        }
    }
}
