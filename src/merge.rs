//! Deep merge of an environment overlay onto the base configuration
//!
//! Rules, applied field by field:
//!
//! | base      | overlay   | result                         |
//! |-----------|-----------|--------------------------------|
//! | mapping   | mapping   | merged recursively, key by key |
//! | sequence  | sequence  | overlay replaces base          |
//! | scalar    | scalar    | overlay wins (same type only)  |
//! | missing   | any       | overlay                        |
//! | any       | missing   | base                           |
//! | null      | any       | overlay                        |
//! | any       | null      | base                           |
//! | type A    | type B    | [`SiteError::MergeConflict`]   |
//!
//! `null` means "not set": keys still null after merging are dropped.
//! Integers and floats count as the same type, since TOML and JSON
//! disagree on how to spell whole-number values.

use crate::error::{Result, SiteError};
use serde_json::{Map, Value};

/// Merge `overlay` onto `base`
pub fn deep_merge(base: &Value, overlay: &Value) -> Result<Value> {
    let mut merged = merge_at(base, overlay, "")?;
    drop_nulls(&mut merged);
    Ok(merged)
}

fn drop_nulls(value: &mut Value) {
    if let Value::Object(map) = value {
        map.retain(|_, v| !v.is_null());
        map.values_mut().for_each(drop_nulls);
    }
}

fn merge_at(base: &Value, overlay: &Value, path: &str) -> Result<Value> {
    match (base, overlay) {
        (Value::Object(b), Value::Object(o)) => merge_maps(b, o, path).map(Value::Object),
        (Value::Array(_), Value::Array(_)) => Ok(overlay.clone()),
        // Null means "not set" in either format
        (Value::Null, _) => Ok(overlay.clone()),
        (_, Value::Null) => Ok(base.clone()),
        (b, o) if type_name(b) == type_name(o) => Ok(o.clone()),
        (b, o) => Err(SiteError::MergeConflict {
            path: if path.is_empty() {
                "<root>".to_string()
            } else {
                path.to_string()
            },
            base: type_name(b),
            overlay: type_name(o),
        }),
    }
}

fn merge_maps(base: &Map<String, Value>, overlay: &Map<String, Value>, path: &str) -> Result<Map<String, Value>> {
    let mut merged = base.clone();
    for (key, value) in overlay {
        let child = if path.is_empty() {
            key.clone()
        } else {
            format!("{path}.{key}")
        };
        let next = match base.get(key) {
            Some(existing) => merge_at(existing, value, &child)?,
            None => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    Ok(merged)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
