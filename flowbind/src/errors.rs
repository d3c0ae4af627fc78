//! Error types for the flowbind engine.
//!
//! The engine reports its own failures (bad step results, misuse of the flow
//! API, unknown named callables, failing default value providers) as
//! [`FlowError`] variants. Failures raised by a step's own logic are carried
//! through [`FlowError::Step`] without being interpreted.

use crate::steps::Signature;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for flow operations.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A step returned a value that is neither null nor an object.
    #[error(
        "Flow step {step}, defined in {location}, returned an invalid result type: {found}. \
         The result must be either an object or null."
    )]
    InvalidResult {
        /// Name of the offending step.
        step: String,
        /// Where the step was defined, as `file(line)`.
        location: String,
        /// JSON type name of the returned value.
        found: &'static str,
    },

    /// The flow API was used in a state where the operation is not allowed.
    #[error("{0}")]
    Misuse(#[from] MisuseError),

    /// A named step could not be found in the registry.
    #[error("Unknown callable: {name}")]
    UnknownCallable {
        /// The name that was looked up.
        name: String,
    },

    /// The flow configuration is not usable.
    #[error("Invalid flow configuration: {0}")]
    Config(String),

    /// A default value provider failed for a reason other than a missing key.
    #[error("Default value provider failed for '{name}': {source}")]
    Provider {
        /// The parameter being resolved.
        name: String,
        /// The provider's failure.
        #[source]
        source: anyhow::Error,
    },

    /// A failure raised by a step itself.
    #[error(transparent)]
    Step(anyhow::Error),
}

impl FlowError {
    /// Builds an invalid-result error for the step described by `signature`.
    #[must_use]
    pub fn invalid_result(signature: &Signature, result: &Value) -> Self {
        Self::InvalidResult {
            step: signature.name().to_string(),
            location: signature.location(),
            found: json_type_name(result),
        }
    }

    /// Converts a step's failure into a flow error.
    ///
    /// A step that propagates a `FlowError` with `?` (for example a misuse
    /// raised by calling back into its own flow) yields that same error.
    /// Anything else is wrapped in [`FlowError::Step`].
    #[must_use]
    pub fn from_step(err: anyhow::Error) -> Self {
        match err.downcast::<Self>() {
            Ok(flow_err) => flow_err,
            Err(other) => Self::Step(other),
        }
    }

    /// Returns true if this is a misuse of the flow API.
    #[must_use]
    pub fn is_misuse(&self) -> bool {
        matches!(self, Self::Misuse(_))
    }

    /// Returns the step's own failure, if this error came from a step.
    #[must_use]
    pub fn step_error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Step(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the default value provider's own failure, if a provider failed.
    #[must_use]
    pub fn provider_error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Provider { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, Value> {
        let mut map = HashMap::new();

        match self {
            Self::InvalidResult { step, location, found } => {
                map.insert("type".to_string(), serde_json::json!("InvalidResult"));
                map.insert("step".to_string(), serde_json::json!(step));
                map.insert("location".to_string(), serde_json::json!(location));
                map.insert("found".to_string(), serde_json::json!(found));
            }
            Self::Misuse(_) => {
                map.insert("type".to_string(), serde_json::json!("Misuse"));
            }
            Self::UnknownCallable { name } => {
                map.insert("type".to_string(), serde_json::json!("UnknownCallable"));
                map.insert("name".to_string(), serde_json::json!(name));
            }
            Self::Config(_) => {
                map.insert("type".to_string(), serde_json::json!("Config"));
            }
            Self::Provider { name, .. } => {
                map.insert("type".to_string(), serde_json::json!("Provider"));
                map.insert("name".to_string(), serde_json::json!(name));
            }
            Self::Step(_) => {
                map.insert("type".to_string(), serde_json::json!("Step"));
            }
        }

        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Programming errors in how a flow is driven.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MisuseError {
    /// The operation would restructure a flow that is running.
    #[error("This operation ({operation}) cannot be performed while the flow is being executed")]
    WhileExecuting {
        /// The rejected operation.
        operation: &'static str,
    },

    /// The operation only makes sense from inside a running flow.
    #[error("This operation ({operation}) can only be performed while the flow is being executed")]
    NotExecuting {
        /// The rejected operation.
        operation: &'static str,
    },

    /// A nested flow was entered while it was already running.
    #[error("Nested flow is already running")]
    NestedFlowBusy,
}

/// Failures reported by a [`Container`](crate::providers::Container).
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The container has no entry for the identifier.
    #[error("No entry found for '{id}'")]
    NotFound {
        /// The requested identifier.
        id: String,
    },

    /// Any other container failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ContainerError {
    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}

/// Returns the JSON type name of a value, as used in diagnostics.
#[must_use]
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_result_message_names_step_and_location() {
        let signature = Signature::new("make_total", &["x"]);
        let err = FlowError::invalid_result(&signature, &serde_json::json!("test"));

        let message = err.to_string();
        assert!(message.contains("make_total"));
        assert!(message.contains("errors.rs("));
        assert!(message.contains("invalid result type: string"));
    }

    #[test]
    fn test_from_step_unwraps_flow_errors() {
        let inner = FlowError::from(MisuseError::NotExecuting { operation: "break_flow" });
        let err = FlowError::from_step(anyhow::Error::new(inner));

        assert!(err.is_misuse());
    }

    #[test]
    fn test_from_step_wraps_other_errors() {
        let err = FlowError::from_step(anyhow::anyhow!("Test exception"));

        assert_eq!(err.to_string(), "Test exception");
        assert!(err.step_error().is_some());
    }

    #[test]
    fn test_to_dict() {
        let err = FlowError::UnknownCallable {
            name: "missing".to_string(),
        };
        let dict = err.to_dict();

        assert_eq!(dict.get("type").unwrap(), "UnknownCallable");
        assert_eq!(dict.get("name").unwrap(), "missing");
    }

    #[test]
    fn test_json_type_name() {
        assert_eq!(json_type_name(&Value::Null), "null");
        assert_eq!(json_type_name(&serde_json::json!(1)), "number");
        assert_eq!(json_type_name(&serde_json::json!([1])), "array");
    }
}
