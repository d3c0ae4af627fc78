//! Ready-made steps.

use crate::steps::{FnStep, Step};
use serde_json::{json, Value};

/// A step that appends `value` to the array bound as `x`.
///
/// A missing or non-array `x` starts a new array.
#[must_use]
pub fn push_to_array(value: Value) -> Step {
    FnStep::named("push_to_array", &["x"], move |mut args| {
        let mut items = match args.take(0) {
            Value::Array(items) => items,
            _ => Vec::new(),
        };
        items.push(value.clone());
        Ok(json!({ "x": items }))
    })
    .into()
}

/// A step that returns `result` unchanged.
#[must_use]
pub fn returning(result: Value) -> Step {
    FnStep::named("returning", &[], move |_args| Ok(result.clone())).into()
}

/// A step that always fails with `message`.
#[must_use]
pub fn failing(message: impl Into<String>) -> Step {
    let message = message.into();
    FnStep::named("failing", &[], move |_args| Err(anyhow::anyhow!(message.clone()))).into()
}
