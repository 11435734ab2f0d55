//! Template expansion for data-bound children.
//!
//! A template names one component and a binding to a collection. Two
//! strategies are supported, matching what hosts have historically done:
//!
//! - **Scoped**: the template component is rendered once per item with the
//!   item as its data scope. Used by `List`.
//! - **Synthetic id**: one child id `"{templateId}-{key}"` is produced per
//!   item key (or array index). The ids are looked up in the registry as
//!   plain components and rendered in the enclosing scope. Used by `Column`.

use serde_json::Value;

use super::value::resolve_path;

/// Items of the collection at `binding`, in order, each with its key.
///
/// Arrays yield their elements keyed by index; objects yield their values
/// keyed by property name. A missing binding or a scalar yields nothing.
pub fn expand_scoped<'v>(binding: &str, data: &'v Value) -> Vec<(String, &'v Value)> {
    match resolve_path(data, binding) {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect(),
        Some(Value::Object(map)) => map.iter().map(|(key, item)| (key.clone(), item)).collect(),
        Some(other) => {
            log::debug!("[A2UI] Template binding `{}` is not a collection: {}", binding, other);
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// Synthetic child ids for the collection at `binding`.
///
/// Object keys are used as-is; array items are keyed by index.
pub fn expand_synthetic(template_id: &str, binding: &str, data: &Value) -> Vec<String> {
    match resolve_path(data, binding) {
        Some(Value::Object(map)) => map
            .keys()
            .map(|key| format!("{}-{}", template_id, key))
            .collect(),
        Some(Value::Array(items)) => (0..items.len())
            .map(|index| format!("{}-{}", template_id, index))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scoped_over_array() {
        let data = json!({"files": [{"name": "a.txt"}, {"name": "b.txt"}]});
        let items = expand_scoped("/files", &data);
        assert_eq!(
            items,
            vec![
                ("0".to_string(), &json!({"name": "a.txt"})),
                ("1".to_string(), &json!({"name": "b.txt"}))
            ]
        );
    }

    #[test]
    fn test_scoped_over_object_values() {
        let data = json!({"people": {"p1": {"n": "Ann"}, "p2": {"n": "Bo"}}});
        let items = expand_scoped("people", &data);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], ("p2".to_string(), &json!({"n": "Bo"})));
    }

    #[test]
    fn test_scoped_missing_or_scalar() {
        let data = json!({"count": 3});
        assert!(expand_scoped("/count", &data).is_empty());
        assert!(expand_scoped("/nope", &data).is_empty());
    }

    #[test]
    fn test_synthetic_ids() {
        let data = json!({"menu": {"home": {}, "settings": {}}, "rows": [1, 2]});
        assert_eq!(
            expand_synthetic("item", "/menu", &data),
            vec!["item-home".to_string(), "item-settings".to_string()]
        );
        assert_eq!(
            expand_synthetic("row", "/rows", &data),
            vec!["row-0".to_string(), "row-1".to_string()]
        );
        assert!(expand_synthetic("row", "/missing", &data).is_empty());
    }
}
