//! A2UI Value Types
//!
//! Value descriptors used for data binding, and the binding primitives that
//! resolve them against a data model scope.

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A value that is either a literal or a path into the data model.
///
/// When both a literal and a path are present the literal wins.
///
/// # Examples
///
/// ```json
/// {"literalString": "Hello World"}
/// {"literalNumber": 42}
/// {"path": "/user/name"}
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal_string: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal_number: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal_boolean: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl BoundValue {
    /// Create a literal string value
    pub fn literal(s: impl Into<String>) -> Self {
        BoundValue {
            literal_string: Some(s.into()),
            ..Default::default()
        }
    }

    /// Create a literal number value
    pub fn number(n: f64) -> Self {
        BoundValue {
            literal_number: Some(n),
            ..Default::default()
        }
    }

    /// Create a literal boolean value
    pub fn boolean(b: bool) -> Self {
        BoundValue {
            literal_boolean: Some(b),
            ..Default::default()
        }
    }

    /// Create a path reference
    pub fn path(p: impl Into<String>) -> Self {
        BoundValue {
            path: Some(p.into()),
            ..Default::default()
        }
    }

    pub fn is_literal(&self) -> bool {
        self.literal_string.is_some()
            || self.literal_number.is_some()
            || self.literal_boolean.is_some()
    }

    pub fn as_path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The literal as JSON. String beats number beats boolean.
    pub fn literal_value(&self) -> Option<Value> {
        if let Some(s) = &self.literal_string {
            return Some(Value::String(s.clone()));
        }
        if let Some(n) = self.literal_number {
            return serde_json::Number::from_f64(n).map(Value::Number);
        }
        self.literal_boolean.map(Value::Bool)
    }

    /// Resolve against a data scope. `None` means unbound or unresolved.
    pub fn resolve<'v>(&self, data: &'v Value) -> Option<Cow<'v, Value>> {
        if let Some(literal) = self.literal_value() {
            return Some(Cow::Owned(literal));
        }
        let path = self.path.as_deref()?;
        resolve_path(data, path).map(Cow::Borrowed)
    }
}

impl<'de> Deserialize<'de> for BoundValue {
    /// Bare JSON scalars are accepted as literals; in an object each field
    /// is read on its own so one bad field does not void the others.
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(d)?;
        let bound = match value {
            Value::String(s) => BoundValue::literal(s),
            Value::Number(n) => n.as_f64().map(BoundValue::number).unwrap_or_default(),
            Value::Bool(b) => BoundValue::boolean(b),
            Value::Object(map) => BoundValue {
                literal_string: map.get("literalString").and_then(|v| v.as_str()).map(str::to_owned),
                literal_number: map.get("literalNumber").and_then(Value::as_f64),
                literal_boolean: map.get("literalBoolean").and_then(Value::as_bool),
                path: map.get("path").and_then(|v| v.as_str()).map(str::to_owned),
            },
            _ => BoundValue::default(),
        };
        Ok(bound)
    }
}

/// Lenient field deserializer: anything that does not decode as `T` becomes `None`.
pub(crate) fn lenient<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Walk a slash-delimited path from `data`.
///
/// `"/"` is the whole scope. Empty segments are ignored, so `"/a/b"` and
/// `"a/b"` address the same value. Array elements are addressed by index.
/// The walk stops with `None` at the first missing member or scalar.
pub fn resolve_path<'v>(data: &'v Value, path: &str) -> Option<&'v Value> {
    if path == "/" {
        return Some(data);
    }
    let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();
    segments.peek()?;

    segments.try_fold(data, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Resolve a descriptor to display text. Unresolved bindings give `""`.
pub fn resolve_text(value: &BoundValue, data: &Value) -> String {
    value
        .resolve(data)
        .map(|v| coerce_to_string(&v))
        .unwrap_or_default()
}

/// Resolve a descriptor to a number; unresolved or non-numeric gives `0`.
///
/// Numeric strings are accepted since agents often quote numbers.
pub fn resolve_number(value: &BoundValue, data: &Value) -> f64 {
    match value.resolve(data).as_deref() {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Resolve a descriptor to a flag; only `true` and `"true"` are set.
pub fn resolve_bool(value: &BoundValue, data: &Value) -> bool {
    match value.resolve(data).as_deref() {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        _ => false,
    }
}

/// Resolve a descriptor to a list of strings.
///
/// Arrays are coerced item by item; a single non-empty value is a list of one.
pub fn resolve_strings(value: &BoundValue, data: &Value) -> Vec<String> {
    match value.resolve(data).as_deref() {
        Some(Value::Array(items)) => items.iter().map(coerce_to_string).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(single) => {
            let text = coerce_to_string(single);
            if text.is_empty() { Vec::new() } else { vec![text] }
        }
    }
}

/// Join a path onto a base path into an absolute one, e.g. `/files/0/name`.
pub fn join_path(base: &str, path: &str) -> String {
    let segments: Vec<&str> = base
        .split('/')
        .chain(path.split('/'))
        .filter(|s| !s.is_empty())
        .collect();
    format!("/{}", segments.join("/"))
}

/// String coercion used by every text-bearing component.
///
/// `null` becomes empty, integral numbers drop the fractional part and
/// containers are shown as compact JSON.
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn format_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_path_nested() {
        let data = json!({"a": {"b": 5}});
        assert_eq!(resolve_path(&data, "a/b"), Some(&json!(5)));
        assert_eq!(resolve_path(&data, "a/x"), None);
        assert_eq!(resolve_path(&data, "/"), Some(&data));
    }

    #[test]
    fn test_resolve_path_leading_slash_and_index() {
        let data = json!({"files": [{"name": "a.txt"}, {"name": "b.txt"}]});
        assert_eq!(resolve_path(&data, "/files/1/name"), Some(&json!("b.txt")));
        assert_eq!(resolve_path(&data, "files/7/name"), None);
        assert_eq!(resolve_path(&data, "files/first"), None);
    }

    #[test]
    fn test_resolve_path_through_null() {
        let data = json!({"a": null});
        assert_eq!(resolve_path(&data, "a/b/c"), None);
        assert_eq!(resolve_path(&data, ""), None);
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/", "/name"), "/name");
        assert_eq!(join_path("/files/0", "name"), "/files/0/name");
        assert_eq!(join_path("/files/0/", "/"), "/files/0");
        assert_eq!(join_path("", ""), "/");
    }

    #[test]
    fn test_resolve_number_and_bool() {
        let data = json!({"volume": 7.5, "quoted": " 3 ", "on": true, "off": "no"});
        assert_eq!(resolve_number(&BoundValue::path("/volume"), &data), 7.5);
        assert_eq!(resolve_number(&BoundValue::path("/quoted"), &data), 3.0);
        assert_eq!(resolve_number(&BoundValue::path("/on"), &data), 0.0);
        assert_eq!(resolve_number(&BoundValue::number(2.0), &data), 2.0);

        assert!(resolve_bool(&BoundValue::path("/on"), &data));
        assert!(!resolve_bool(&BoundValue::path("/off"), &data));
        assert!(!resolve_bool(&BoundValue::path("/missing"), &data));
        assert!(resolve_bool(&BoundValue::boolean(true), &data));
    }

    #[test]
    fn test_resolve_strings() {
        let data = json!({"many": ["a", 2], "one": "b", "none": ""});
        assert_eq!(resolve_strings(&BoundValue::path("/many"), &data), vec!["a", "2"]);
        assert_eq!(resolve_strings(&BoundValue::path("/one"), &data), vec!["b"]);
        assert!(resolve_strings(&BoundValue::path("/none"), &data).is_empty());
        assert!(resolve_strings(&BoundValue::path("/missing"), &data).is_empty());
    }

    #[test]
    fn test_literal_beats_path() {
        let data = json!({"a": {"b": "from path"}});
        let value: BoundValue =
            serde_json::from_value(json!({"literalString": "X", "path": "a/b"})).unwrap();
        assert_eq!(resolve_text(&value, &data), "X");
    }

    #[test]
    fn test_resolve_text_coercion() {
        let data = json!({"n": 3.0, "f": 2.5, "t": true, "z": null, "o": {"k": 1}});
        assert_eq!(resolve_text(&BoundValue::path("n"), &data), "3");
        assert_eq!(resolve_text(&BoundValue::path("f"), &data), "2.5");
        assert_eq!(resolve_text(&BoundValue::path("t"), &data), "true");
        assert_eq!(resolve_text(&BoundValue::path("z"), &data), "");
        assert_eq!(resolve_text(&BoundValue::path("o"), &data), r#"{"k":1}"#);
        assert_eq!(resolve_text(&BoundValue::path("missing"), &data), "");
        assert_eq!(resolve_text(&BoundValue::default(), &data), "");
        assert_eq!(resolve_text(&BoundValue::number(42.0), &data), "42");
    }

    #[test]
    fn test_lenient_descriptor_shapes() {
        let bare: BoundValue = serde_json::from_value(json!("Hello")).unwrap();
        assert_eq!(bare.literal_string.as_deref(), Some("Hello"));

        let odd: BoundValue =
            serde_json::from_value(json!({"literalString": 5, "path": "/name"})).unwrap();
        assert!(!odd.is_literal());
        assert_eq!(odd.as_path(), Some("/name"));

        let junk: BoundValue = serde_json::from_value(json!([1, 2])).unwrap();
        assert_eq!(junk, BoundValue::default());
    }
}
