//! Mock steps for testing.

use crate::steps::{Arguments, Callable, Signature};
use parking_lot::Mutex;
use serde_json::Value;

/// A step that records the arguments of every call and returns nothing.
#[derive(Debug)]
pub struct RecordingStep {
    signature: Signature,
    calls: Mutex<Vec<Vec<Value>>>,
}

impl RecordingStep {
    /// Creates a recording step binding `parameters`.
    #[must_use]
    #[track_caller]
    pub fn new(name: impl Into<String>, parameters: &[&str]) -> Self {
        Self {
            signature: Signature::new(name, parameters),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Returns the bound arguments of each call, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<Value>> {
        self.calls.lock().clone()
    }

    /// Returns the number of calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Resets call tracking.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }
}

impl Callable for RecordingStep {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, args: Arguments<'_>) -> anyhow::Result<Value> {
        let bound = (0..args.len())
            .map(|i| args.get(i).cloned().unwrap_or(Value::Null))
            .collect();
        self.calls.lock().push(bound);
        Ok(Value::Null)
    }
}
