//! Flow configuration.

use crate::errors::FlowError;
use serde::{Deserialize, Serialize};

/// Default name of the parameter that binds the running flow.
pub const THIS_FLOW: &str = "this_flow";

/// Default flow name used in spans and diagnostics.
pub const DEFAULT_FLOW_NAME: &str = "flow";

/// Configuration for a flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Name used in tracing spans and diagnostics.
    #[serde(default = "default_name")]
    pub name: String,
    /// Parameter name that binds the running flow instead of a value.
    #[serde(default = "default_this_flow_parameter")]
    pub this_flow_parameter: String,
}

fn default_name() -> String {
    DEFAULT_FLOW_NAME.to_string()
}

fn default_this_flow_parameter() -> String {
    THIS_FLOW.to_string()
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            this_flow_parameter: default_this_flow_parameter(),
        }
    }
}

impl FlowConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flow name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the reserved flow parameter name.
    #[must_use]
    pub fn with_this_flow_parameter(mut self, name: impl Into<String>) -> Self {
        self.this_flow_parameter = name.into();
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Config`] if the name or the flow parameter is
    /// empty or whitespace-only.
    pub fn validate(&self) -> Result<(), FlowError> {
        if self.name.trim().is_empty() {
            return Err(FlowError::Config(
                "Flow name cannot be empty or whitespace-only".to_string(),
            ));
        }
        if self.this_flow_parameter.trim().is_empty() {
            return Err(FlowError::Config(
                "Flow parameter name cannot be empty or whitespace-only".to_string(),
            ));
        }
        Ok(())
    }
}
