//! The value context threaded through a flow.

use serde_json::Value;
use std::collections::HashMap;

/// Named values shared by the steps of a flow.
///
/// A key mapped to `Value::Null` is distinct from a missing key.
pub type Values = HashMap<String, Value>;

/// Merges `update` into `values`; entries of `update` win, nulls included.
pub fn merge_into(values: &mut Values, update: Values) {
    values.extend(update);
}

/// Converts a JSON object into [`Values`].
#[must_use]
pub fn from_object(object: serde_json::Map<String, Value>) -> Values {
    object.into_iter().collect()
}

/// Builds [`Values`] from a `json!` literal.
///
/// Anything but an object yields an empty map.
#[must_use]
pub fn from_json(value: Value) -> Values {
    match value {
        Value::Object(object) => from_object(object),
        _ => Values::new(),
    }
}
