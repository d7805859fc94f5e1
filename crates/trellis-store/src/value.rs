//! Store values
//!
//! Properties hold dynamic JSON values; rendering stringifies them the way
//! templates expect: strings bare, everything else in canonical JSON form.

pub use serde_json::Value;

/// Store data: a flat property map
pub type StoreData = serde_json::Map<String, Value>;

/// Stringify a value for template substitution
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Stringify a property; a missing property renders as the empty string
pub fn display_property(data: &StoreData, name: &str) -> String {
    data.get(name).map(display_value).unwrap_or_default()
}
