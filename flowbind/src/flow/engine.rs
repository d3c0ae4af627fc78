//! The flow engine.
//!
//! A [`Flow`] runs its steps in order against one shared map of values.
//! Each ordinary step has its parameters bound from the values by name and
//! its returned object merged back; a nested flow receives all values and
//! hands back its own final values.

use super::{FlowConfig, SharedFlow};
use crate::errors::{FlowError, MisuseError};
use crate::providers::DefaultValueProvider;
use crate::reflection::{self, Invocable, Registry};
use crate::steps::{Arguments, Bound, Signature, Step};
use crate::values::{self, Values};
use serde_json::Value;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, trace};
use uuid::Uuid;

/// A synchronous pipeline of steps sharing one value context.
pub struct Flow {
    config: FlowConfig,
    steps: Vec<Step>,
    executing: bool,
    values: Values,
    breaked: bool,
    default_value_provider: Option<Arc<dyn DefaultValueProvider>>,
    registry: Arc<Registry>,
}

impl Default for Flow {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl fmt::Debug for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flow")
            .field("name", &self.config.name)
            .field("steps", &self.steps.len())
            .field("executing", &self.executing)
            .field("breaked", &self.breaked)
            .field("values", &self.values)
            .field("default_value_provider", &self.default_value_provider.is_some())
            .finish_non_exhaustive()
    }
}

impl Flow {
    /// Creates a flow running `steps`.
    #[must_use]
    pub fn new(steps: Vec<Step>) -> Self {
        Self::with_config(FlowConfig::default(), steps)
    }

    /// Creates a flow with an explicit configuration.
    #[must_use]
    pub fn with_config(config: FlowConfig, steps: Vec<Step>) -> Self {
        Self {
            config,
            steps,
            executing: false,
            values: Values::new(),
            breaked: false,
            default_value_provider: None,
            registry: Arc::new(Registry::new()),
        }
    }

    /// Creates a flow from `steps` and invokes it once with `values`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while running the steps.
    pub fn run(steps: Vec<Step>, values: Values) -> Result<Values, FlowError> {
        Self::new(steps).invoke(values)
    }

    /// Returns the flow name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Returns true while the flow is being invoked.
    #[must_use]
    pub fn is_executing(&self) -> bool {
        self.executing
    }

    /// Returns true if a step requested a break during the last invocation.
    #[must_use]
    pub fn is_breaked(&self) -> bool {
        self.breaked
    }

    /// Adds a step to the end of the flow.
    ///
    /// # Errors
    ///
    /// Returns [`MisuseError::WhileExecuting`] if the flow is running.
    pub fn append_step(&mut self, step: impl Into<Step>) -> Result<(), FlowError> {
        self.assert_not_executing("append_step")?;
        self.steps.push(step.into());
        Ok(())
    }

    /// Adds a step to the beginning of the flow.
    ///
    /// # Errors
    ///
    /// Returns [`MisuseError::WhileExecuting`] if the flow is running.
    pub fn prepend_step(&mut self, step: impl Into<Step>) -> Result<(), FlowError> {
        self.assert_not_executing("prepend_step")?;
        self.steps.insert(0, step.into());
        Ok(())
    }

    /// Returns the default value provider.
    #[must_use]
    pub fn default_value_provider(&self) -> Option<&Arc<dyn DefaultValueProvider>> {
        self.default_value_provider.as_ref()
    }

    /// Sets or clears the default value provider.
    pub fn set_default_value_provider(&mut self, provider: Option<Arc<dyn DefaultValueProvider>>) {
        self.default_value_provider = provider;
    }

    /// Returns the registry used to resolve named steps.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Replaces the registry used to resolve named steps.
    pub fn set_registry(&mut self, registry: Arc<Registry>) {
        self.registry = registry;
    }

    /// Returns all values.
    #[must_use]
    pub fn values(&self) -> &Values {
        &self.values
    }

    /// Replaces all values.
    pub fn set_values(&mut self, values: Values) {
        self.values = values;
    }

    /// Merges `values` into the flow's values; `None` changes nothing.
    pub fn merge_values(&mut self, values: Option<Values>) {
        if let Some(values) = values {
            values::merge_into(&mut self.values, values);
        }
    }

    /// Returns the value for `name`.
    ///
    /// Falls back to the default value provider when `name` is missing,
    /// and to `Value::Null` when the provider has nothing either.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Provider`] if the provider fails. The provider's
    /// own error is kept as the source and is reachable through
    /// [`FlowError::provider_error`].
    pub fn get_value(&self, name: &str) -> Result<Value, FlowError> {
        match self.values.get(name) {
            Some(value) => Ok(value.clone()),
            None => self.default_value(name),
        }
    }

    /// Sets a single value.
    pub fn set_value(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Stops the running invocation after the current step.
    ///
    /// # Errors
    ///
    /// Returns [`MisuseError::NotExecuting`] if the flow is not running.
    pub fn break_flow(&mut self) -> Result<(), FlowError> {
        self.assert_executing("break_flow")?;
        self.breaked = true;
        Ok(())
    }

    /// Merges `values` and runs every step, returning the final values.
    ///
    /// The flow is marked as executing for the duration of the call. On every
    /// way out, including an error or a panicking step, the flag goes back to
    /// what it was on entry, so a step re-invoking its own flow leaves the
    /// outer run still executing.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a step or by the engine.
    pub fn invoke(&mut self, values: Values) -> Result<Values, FlowError> {
        let run_id = Uuid::new_v4();
        let span = tracing::debug_span!("flow.invoke", flow = %self.config.name, %run_id);
        let _entered = span.enter();

        self.merge_values(Some(values));
        let was_executing = std::mem::replace(&mut self.executing, true);
        self.breaked = false;
        debug!(steps = self.steps.len(), reentrant = was_executing, "Flow started");

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_steps()));
        self.executing = was_executing;

        match outcome {
            Ok(Ok(())) => {
                debug!(values = self.values.len(), breaked = self.breaked, "Flow finished");
                Ok(self.values.clone())
            }
            Ok(Err(err)) => Err(err),
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Applies a single step to the current values.
    ///
    /// Works whether or not the flow is being invoked; the results are
    /// visible through [`Flow::values`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns the step's failure, an invalid result, or a binding error.
    pub fn apply_step(&mut self, step: &Step) -> Result<(), FlowError> {
        match step {
            Step::Flow(flow) => self.apply_flow_step(flow),
            Step::Invoke(invocable) => self.apply_invocable(invocable),
        }
    }

    /// Wraps the flow in a handle that can be nested as a step.
    #[must_use]
    pub fn into_shared(self) -> SharedFlow {
        SharedFlow::new(self)
    }

    fn run_steps(&mut self) -> Result<(), FlowError> {
        // The step list cannot change while executing, so indices stay valid.
        for index in 0..self.steps.len() {
            let step = self.steps[index].clone();
            self.apply_step(&step)?;
            if self.breaked {
                debug!(index, step = %step.label(), "Flow break requested");
                break;
            }
        }
        Ok(())
    }

    fn apply_flow_step(&mut self, flow: &SharedFlow) -> Result<(), FlowError> {
        let mut nested = flow.try_lock().ok_or(MisuseError::NestedFlowBusy)?;
        trace!(nested = %nested.name(), "Entering nested flow");
        self.values = nested.invoke(self.values.clone())?;
        Ok(())
    }

    fn apply_invocable(&mut self, invocable: &Invocable) -> Result<(), FlowError> {
        let callable = reflection::resolve(invocable, &self.registry)?;
        let signature = callable.signature();
        let bound = self.bind_arguments(signature.parameters())?;

        let args = Arguments::new(self, signature.parameters(), bound);
        let result = callable.call(args).map_err(FlowError::from_step)?;
        let update = validate_result(result, signature)?;

        debug!(
            step = %signature.name(),
            parameters = ?signature.parameters(),
            produced = ?update.as_ref().map(|u| u.keys().collect::<Vec<_>>()),
            "Step applied"
        );
        self.merge_values(update);
        Ok(())
    }

    fn bind_arguments(&self, parameters: &[String]) -> Result<Vec<Bound>, FlowError> {
        parameters
            .iter()
            .map(|name| {
                if *name == self.config.this_flow_parameter {
                    Ok(Bound::ThisFlow)
                } else {
                    let value = self.get_value(name)?;
                    trace!(parameter = %name, value = %value, "Bound parameter");
                    Ok(Bound::Value(value))
                }
            })
            .collect()
    }

    fn default_value(&self, name: &str) -> Result<Value, FlowError> {
        let Some(provider) = &self.default_value_provider else {
            return Ok(Value::Null);
        };
        provider
            .get_value(name)
            .map(Option::unwrap_or_default)
            .map_err(|source| FlowError::Provider {
                name: name.to_string(),
                source,
            })
    }

    fn assert_executing(&self, operation: &'static str) -> Result<(), MisuseError> {
        if self.executing {
            Ok(())
        } else {
            Err(MisuseError::NotExecuting { operation })
        }
    }

    fn assert_not_executing(&self, operation: &'static str) -> Result<(), MisuseError> {
        if self.executing {
            Err(MisuseError::WhileExecuting { operation })
        } else {
            Ok(())
        }
    }
}

fn validate_result(result: Value, signature: &Signature) -> Result<Option<Values>, FlowError> {
    match result {
        Value::Null => Ok(None),
        Value::Object(object) => Ok(Some(values::from_object(object))),
        other => Err(FlowError::invalid_result(signature, &other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MapProvider, MockDefaultValueProvider};
    use crate::steps::FnStep;
    use crate::values::from_json;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_get_and_set_default_value_provider() {
        let mut flow = Flow::default();
        assert!(flow.default_value_provider().is_none());

        let provider: Arc<dyn DefaultValueProvider> = Arc::new(MapProvider::default());
        flow.set_default_value_provider(Some(Arc::clone(&provider)));
        assert!(Arc::ptr_eq(flow.default_value_provider().unwrap(), &provider));

        flow.set_default_value_provider(None);
        assert!(flow.default_value_provider().is_none());
    }

    #[test]
    fn test_get_value_missing_from_provider_is_null() {
        let mut provider = MockDefaultValueProvider::new();
        provider
            .expect_get_value()
            .withf(|name| name == "fromContainer")
            .returning(|_| Ok(None));

        let mut flow = Flow::default();
        flow.set_default_value_provider(Some(Arc::new(provider)));
        assert_eq!(flow.get_value("fromContainer").unwrap(), Value::Null);
    }

    #[test]
    fn test_get_value_from_provider() {
        let mut provider = MockDefaultValueProvider::new();
        provider
            .expect_get_value()
            .withf(|name| name == "fromContainer")
            .returning(|_| Ok(Some(json!("the_value"))));

        let mut flow = Flow::default();
        flow.set_default_value_provider(Some(Arc::new(provider)));
        assert_eq!(flow.get_value("fromContainer").unwrap(), json!("the_value"));
    }

    #[test]
    fn test_explicit_null_shadows_provider() {
        let mut provider = MockDefaultValueProvider::new();
        provider.expect_get_value().never();

        let mut flow = Flow::default();
        flow.set_default_value_provider(Some(Arc::new(provider)));
        flow.set_value("x", Value::Null);
        assert_eq!(flow.get_value("x").unwrap(), Value::Null);
    }

    #[test]
    fn test_provider_failure() {
        let mut provider = MockDefaultValueProvider::new();
        provider
            .expect_get_value()
            .returning(|_| Err(anyhow::anyhow!("lookup exploded")));

        let mut flow = Flow::default();
        flow.set_default_value_provider(Some(Arc::new(provider)));

        let err = flow.get_value("x").unwrap_err();
        assert!(matches!(err, FlowError::Provider { ref name, .. } if name == "x"));
        assert_eq!(
            err.provider_error().map(ToString::to_string).as_deref(),
            Some("lookup exploded")
        );
        assert!(err.step_error().is_none());
    }

    #[test]
    fn test_values_accessors() {
        let mut flow = Flow::default();
        flow.set_values(from_json(json!({"x": 1, "y": 2})));
        assert_eq!(flow.values(), &from_json(json!({"x": 1, "y": 2})));

        flow.merge_values(Some(from_json(json!({"x": null, "z": 3}))));
        assert_eq!(flow.values(), &from_json(json!({"x": null, "y": 2, "z": 3})));

        flow.merge_values(None);
        assert_eq!(flow.values(), &from_json(json!({"x": null, "y": 2, "z": 3})));
    }

    #[test]
    fn test_break_while_idle() {
        let mut flow = Flow::default();
        let err = flow.break_flow().unwrap_err();

        assert!(matches!(
            err,
            FlowError::Misuse(MisuseError::NotExecuting { operation: "break_flow" })
        ));
    }

    #[test]
    fn test_apply_step_while_idle() {
        let mut flow = Flow::default();
        flow.set_value("x", json!(1));

        let step = Step::from(FnStep::new(&["x"], |args| {
            Ok(json!({ "y": args[0].as_i64().unwrap_or_default() + 1 }))
        }));
        flow.apply_step(&step).unwrap();

        assert_eq!(flow.values(), &from_json(json!({"x": 1, "y": 2})));
        assert!(!flow.is_executing());
    }

    #[test]
    fn test_invalid_result_rejected() {
        let mut flow = Flow::new(vec![FnStep::named("stringly", &[], |_args| Ok(json!(42))).into()]);
        let err = flow.invoke(Values::new()).unwrap_err();

        match err {
            FlowError::InvalidResult { step, location, found } => {
                assert_eq!(step, "stringly");
                assert!(location.starts_with(file!()));
                assert_eq!(found, "number");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!flow.is_executing());
    }

    #[test]
    fn test_unknown_named_step() {
        let err = Flow::run(vec![Step::named("nowhere")], Values::new()).unwrap_err();
        assert!(matches!(err, FlowError::UnknownCallable { ref name } if name == "nowhere"));
    }

    #[test]
    fn test_custom_flow_parameter() {
        let config = FlowConfig::new().with_this_flow_parameter("flow");
        let step = FnStep::new(&["flow", "this_flow"], |mut args| {
            let plain = args[1].clone();
            let flow = args.this_flow().expect("flow parameter is bound");
            Ok(json!({ "name": flow.name(), "plain": plain }))
        });

        let mut flow = Flow::with_config(config.with_name("custom"), vec![step.into()]);
        let result = flow.invoke(from_json(json!({"this_flow": "just a value"}))).unwrap();

        assert_eq!(result.get("name"), Some(&json!("custom")));
        assert_eq!(result.get("plain"), Some(&json!("just a value")));
    }

    #[test]
    fn test_executing_reset_after_panic() {
        let step = FnStep::new(&[], |_args| -> anyhow::Result<Value> { panic!("step blew up") });
        let mut flow = Flow::new(vec![step.into()]);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| flow.invoke(Values::new())));
        assert!(outcome.is_err());
        assert!(!flow.is_executing());
        assert!(flow.append_step(crate::steps::NoOpStep::new("after")).is_ok());
    }
}
