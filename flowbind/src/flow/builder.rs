//! Flow builder with validation.

use super::{Flow, FlowConfig, SharedFlow};
use crate::errors::FlowError;
use crate::providers::DefaultValueProvider;
use crate::reflection::Registry;
use crate::steps::Step;
use crate::values::Values;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Builder for creating configured flows.
#[derive(Clone, Default)]
pub struct FlowBuilder {
    config: FlowConfig,
    steps: Vec<Step>,
    values: Values,
    default_value_provider: Option<Arc<dyn DefaultValueProvider>>,
    registry: Option<Arc<Registry>>,
}

impl FlowBuilder {
    /// Creates a builder for a flow called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_config(FlowConfig::new().with_name(name))
    }

    /// Creates a builder starting from `config`.
    #[must_use]
    pub fn from_config(config: FlowConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Appends a step.
    #[must_use]
    pub fn step(mut self, step: impl Into<Step>) -> Self {
        self.steps.push(step.into());
        self
    }

    /// Appends several steps.
    #[must_use]
    pub fn steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps.extend(steps);
        self
    }

    /// Sets the reserved flow parameter name.
    #[must_use]
    pub fn this_flow_parameter(mut self, name: impl Into<String>) -> Self {
        self.config.this_flow_parameter = name.into();
        self
    }

    /// Sets the default value provider.
    #[must_use]
    pub fn default_value_provider(mut self, provider: impl DefaultValueProvider + 'static) -> Self {
        self.default_value_provider = Some(Arc::new(provider));
        self
    }

    /// Sets the registry for named steps.
    #[must_use]
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(Arc::new(registry));
        self
    }

    /// Seeds a value before the first invocation.
    #[must_use]
    pub fn value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Returns the flow name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Builds the flow.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Config`] if the configuration is invalid.
    pub fn build(self) -> Result<Flow, FlowError> {
        self.config.validate()?;

        let mut flow = Flow::with_config(self.config, self.steps);
        flow.set_values(self.values);
        flow.set_default_value_provider(self.default_value_provider);
        if let Some(registry) = self.registry {
            flow.set_registry(registry);
        }
        Ok(flow)
    }

    /// Builds the flow behind a [`SharedFlow`] handle.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Config`] if the configuration is invalid.
    pub fn build_shared(self) -> Result<SharedFlow, FlowError> {
        self.build().map(Flow::into_shared)
    }
}

impl fmt::Debug for FlowBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowBuilder")
            .field("config", &self.config)
            .field("steps", &self.steps.len())
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}
