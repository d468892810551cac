//! Wire-format helpers shared by the entity model and the dispatcher.
//!
//! The service encodes booleans as the strings `"T"` and `"F"` and omits or empties
//! fields freely, so field access goes through these helpers rather than typed
//! deserialization.

use serde_json::{Map, Value};

/// JSON serialization capability shared by entities and request wrappers.
pub trait ToJson {
    /// The full JSON representation.
    fn to_json(&self) -> Value;
}

impl ToJson for Value {
    fn to_json(&self) -> Value {
        self.clone()
    }
}

/// Encode a boolean the way the service expects it.
pub fn bool_to_str(value: bool) -> &'static str {
    if value { "T" } else { "F" }
}

/// Decode a service boolean. Anything other than `"T"` is false.
pub fn str_to_bool(value: &str) -> bool {
    value == "T"
}

/// A non-empty string field.
pub(crate) fn opt_str(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// First non-empty string among several alternative field names.
pub(crate) fn first_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| opt_str(value, key))
}

/// A `"T"`/`"F"` field, `None` when missing.
pub(crate) fn opt_flag(value: &Value, key: &str) -> Option<bool> {
    value.get(key).and_then(Value::as_str).map(str_to_bool)
}

/// An array field, empty when missing or of another type.
pub(crate) fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Insert a string field only when a value is present.
pub(crate) fn put_opt(map: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bool_coercion() {
        assert_eq!(bool_to_str(true), "T");
        assert_eq!(bool_to_str(false), "F");
        assert!(str_to_bool("T"));
        assert!(!str_to_bool("F"));
        assert!(!str_to_bool("true"));
    }

    #[test]
    fn test_field_helpers() {
        let value = json!({"name": "a:b", "empty": "", "flag": "T", "items": [1, 2]});
        assert_eq!(opt_str(&value, "name").as_deref(), Some("a:b"));
        assert_eq!(opt_str(&value, "empty"), None);
        assert_eq!(first_str(&value, &["missing", "name"]).as_deref(), Some("a:b"));
        assert_eq!(opt_flag(&value, "flag"), Some(true));
        assert_eq!(opt_flag(&value, "missing"), None);
        assert_eq!(array(&value, "items").len(), 2);
        assert!(array(&value, "name").is_empty());
    }
}
