//! Value bag access keyed by field name.
//!
//! Field names are opaque keys: an exact (flat) key always wins over dotted
//! traversal, so `"a.b"` only reaches `{"a": {"b": ..}}` when the bag has no
//! literal `"a.b"` entry.

use serde_json::{Map, Value};

/// Mutable mapping from field name to value.
pub type ValueBag = Map<String, Value>;

/// Resolve `path` in `bag`. `None` means "undefined"; it is never an error.
pub fn get_by_path<'a>(bag: &'a ValueBag, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    if let Some(value) = bag.get(path) {
        return Some(value);
    }

    let mut segments = path.split('.');
    let mut current = bag.get(segments.next()?)?;
    for segment in segments {
        match current {
            Value::Object(map) => current = map.get(segment)?,
            Value::Array(items) => current = items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Write `value` under the literal key `name`, mirroring the flat-first read.
pub fn set_flat(bag: &mut ValueBag, name: &str, value: Value) -> Option<Value> {
    bag.insert(name.to_string(), value)
}
