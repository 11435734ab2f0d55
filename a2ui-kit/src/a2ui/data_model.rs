//! A2UI Data Model
//!
//! The live value tree a surface's bindings read from. Reads go through
//! slash-delimited paths; writes arrive as keyed entries from
//! `dataModelUpdate` messages and are assigned shallowly.

use serde_json::{Map, Value};

use super::message::DataEntry;
use super::value::resolve_path;

/// A surface's data model.
///
/// # Path Format
///
/// - `/` - the whole model
/// - `/foo` or `foo` - property "foo"
/// - `/foo/bar` - nested property
/// - `/items/0/name` - property of array element
///
/// # Example
///
/// ```rust,ignore
/// let mut model = DataModel::new();
/// model.set("/user/name", json!("Alice"));
/// assert_eq!(model.get_string("/user/name"), Some("Alice"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataModel {
    data: Value,

    /// Bumped on every applied write
    version: u64,
}

impl Default for DataModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DataModel {
    /// Create a new empty data model
    pub fn new() -> Self {
        DataModel {
            data: Value::Object(Map::new()),
            version: 0,
        }
    }

    /// Create a data model with initial data
    pub fn with_data(data: Value) -> Self {
        DataModel { data, version: 0 }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get the entire data as a Value
    pub fn as_value(&self) -> &Value {
        &self.data
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        resolve_path(&self.data, path)
    }

    pub fn get_string(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }

    pub fn get_number(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(|v| v.as_f64())
    }

    /// Set a value at the given path.
    ///
    /// Missing or non-object intermediates are replaced by empty objects.
    /// Array elements are only descended into when the index exists.
    pub fn set(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((last, parents)) = segments.split_last() else {
            self.data = value;
            self.version += 1;
            return;
        };

        let Some(current) = descend_all(&mut self.data, parents) else {
            return;
        };
        match current {
            Value::Array(items) => match last.parse::<usize>() {
                Ok(index) if index < items.len() => items[index] = value,
                Ok(index) if index == items.len() => items.push(value),
                _ => {
                    log::warn!("[A2UI] Cannot set `{}`: `{}` is not a valid index", path, last);
                    return;
                }
            },
            other => {
                if let Some(map) = ensure_object(other) {
                    map.insert((*last).to_string(), value);
                }
            }
        }
        self.version += 1;
    }

    /// Apply the entries of a `dataModelUpdate`.
    ///
    /// Each entry is a keyed assignment into the object at `base_path`
    /// (`/` being the model root). Keys are taken literally, a `/` inside a
    /// key does not descend. Existing siblings are kept; an existing value
    /// under the same key is replaced wholesale, never deep-merged.
    /// Returns the keys that were written, in order.
    pub fn apply_updates(&mut self, base_path: &str, entries: &[DataEntry]) -> Vec<String> {
        let segments: Vec<&str> = base_path.split('/').filter(|s| !s.is_empty()).collect();
        let Some(map) = descend_all(&mut self.data, &segments).and_then(ensure_object) else {
            return Vec::new();
        };

        let written = entries
            .iter()
            .map(|entry| {
                map.insert(entry.key.clone(), entry.value.to_json());
                entry.key.clone()
            })
            .collect();
        self.version += 1;
        written
    }

    /// Replace the entire data model
    pub fn replace(&mut self, data: Value) {
        self.data = data;
        self.version += 1;
    }
}

fn descend_all<'v>(root: &'v mut Value, segments: &[&str]) -> Option<&'v mut Value> {
    segments
        .iter()
        .try_fold(root, |current, segment| descend_or_create(current, segment))
}

fn descend_or_create<'v>(current: &'v mut Value, segment: &str) -> Option<&'v mut Value> {
    let index = match &*current {
        Value::Array(items) => segment.parse::<usize>().ok().filter(|i| *i < items.len()),
        _ => None,
    };

    match (current, index) {
        (Value::Array(items), Some(index)) => items.get_mut(index),
        (slot, _) => ensure_object(slot).map(|map| {
            map.entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()))
        }),
    }
}

/// The object held in `slot`; any other value is first replaced by `{}`.
fn ensure_object(slot: &mut Value) -> Option<&mut Map<String, Value>> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    slot.as_object_mut()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a2ui::message::DataValue;
    use serde_json::json;

    fn entry(key: &str, value: DataValue) -> DataEntry {
        DataEntry {
            key: key.to_string(),
            value,
        }
    }

    #[test]
    fn test_get_set_basic() {
        let mut model = DataModel::new();

        model.set("/name", json!("Alice"));
        assert_eq!(model.get_string("/name"), Some("Alice"));

        model.set("count", json!(42));
        assert_eq!(model.get_number("/count"), Some(42.0));
    }

    #[test]
    fn test_nested_set_creates_objects() {
        let mut model = DataModel::new();
        model.set("/user/name", json!("Alice"));
        model.set("/user/email", json!("alice@example.com"));

        assert_eq!(
            model.as_value(),
            &json!({"user": {"name": "Alice", "email": "alice@example.com"}})
        );
    }

    #[test]
    fn test_set_into_array() {
        let mut model = DataModel::with_data(json!({"items": [{"id": 1}, {"id": 2}]}));
        model.set("/items/1/id", json!(20));
        model.set("/items/2", json!({"id": 3}));
        model.set("/items/9", json!({"id": 9}));

        assert_eq!(model.get_number("/items/1/id"), Some(20.0));
        assert_eq!(model.get_number("/items/2/id"), Some(3.0));
        assert_eq!(model.get("/items/9"), None);
    }

    #[test]
    fn test_apply_updates_is_shallow() {
        let mut model = DataModel::with_data(json!({
            "user": {"name": "Alice", "age": 30},
            "keep": true
        }));

        let written = model.apply_updates(
            "/",
            &[entry(
                "user",
                DataValue::ValueMap(vec![entry("name", DataValue::ValueString("Bob".into()))]),
            )],
        );

        assert_eq!(written, vec!["user".to_string()]);
        // The old `user` value is replaced, not merged
        assert_eq!(model.get("/user/age"), None);
        assert_eq!(model.get("/keep"), Some(&json!(true)));
    }

    #[test]
    fn test_apply_updates_under_base_path() {
        let mut model = DataModel::new();
        model.apply_updates("/form/", &[entry("email", DataValue::ValueString("a@b.c".into()))]);
        assert_eq!(model.get_string("form/email"), Some("a@b.c"));
    }

    #[test]
    fn test_apply_updates_takes_keys_literally() {
        let mut model = DataModel::with_data(json!({"user": [{"name": "Alice"}], "title": "T"}));
        model.apply_updates("/", &[entry("user/0/name", DataValue::ValueString("Bob".into()))]);

        assert_eq!(model.get_string("/user/0/name"), Some("Alice"));
        assert_eq!(model.as_value()["user/0/name"], json!("Bob"));
        assert_eq!(model.get_string("/title"), Some("T"));
    }

    #[test]
    fn test_apply_updates_replaces_scalar_base() {
        let mut model = DataModel::with_data(json!({"form": "draft", "keep": 1}));
        model.apply_updates("/form", &[entry("email", DataValue::ValueString("a@b.c".into()))]);
        assert_eq!(model.as_value(), &json!({"form": {"email": "a@b.c"}, "keep": 1}));
    }

    #[test]
    fn test_nested_set_replaces_scalars() {
        let mut model = DataModel::with_data(json!({"user": "Alice"}));
        model.set("/user/profile/name", json!("Bob"));
        assert_eq!(model.as_value(), &json!({"user": {"profile": {"name": "Bob"}}}));
    }

    #[test]
    fn test_version() {
        let mut model = DataModel::new();

        let v0 = model.version();
        model.set("/name", json!("Alice"));
        assert!(model.version() > v0);
    }
}
