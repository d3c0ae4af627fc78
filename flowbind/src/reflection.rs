//! Resolving invocables to callables and their parameter names.
//!
//! Invocable shapes and the adapters that carry them:
//!
//! - free or anonymous function: [`FnStep`](crate::steps::FnStep)
//! - method bound to a receiver: [`MethodStep`](crate::steps::MethodStep)
//! - object with a call operator: a type implementing [`Callable`]
//! - `"function"` string: [`Invocable::Named`] resolved through [`Registry`]
//! - `"Type::method"` string: [`Invocable::Named`] resolved through the
//!   registry's static method table
//!
//! All of them end up as an `Arc<dyn Callable>` whose signature lists the
//! parameter names of the code that actually runs.

use crate::errors::FlowError;
use crate::steps::Callable;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Separator between a type name and a method name in named invocables.
pub const METHOD_SEPARATOR: &str = "::";

/// A reference to something that can be called as a step.
#[derive(Debug, Clone)]
pub enum Invocable {
    /// A callable value.
    Callable(Arc<dyn Callable>),
    /// A function or `Type::method` registered by name.
    Named(String),
}

/// Named functions and static methods available to [`Invocable::Named`].
#[derive(Debug, Clone, Default)]
pub struct Registry {
    functions: HashMap<String, Arc<dyn Callable>>,
    methods: HashMap<String, HashMap<String, Arc<dyn Callable>>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a free function under `name`.
    pub fn register_function(&mut self, name: impl Into<String>, callable: impl Callable + 'static) {
        self.functions.insert(name.into(), Arc::new(callable));
    }

    /// Registers a static method reachable as `type_name::method_name`.
    pub fn register_method(
        &mut self,
        type_name: impl Into<String>,
        method_name: impl Into<String>,
        callable: impl Callable + 'static,
    ) {
        self.methods
            .entry(type_name.into())
            .or_default()
            .insert(method_name.into(), Arc::new(callable));
    }

    /// Registers a free function, builder style.
    #[must_use]
    pub fn with_function(mut self, name: impl Into<String>, callable: impl Callable + 'static) -> Self {
        self.register_function(name, callable);
        self
    }

    /// Registers a static method, builder style.
    #[must_use]
    pub fn with_method(
        mut self,
        type_name: impl Into<String>,
        method_name: impl Into<String>,
        callable: impl Callable + 'static,
    ) -> Self {
        self.register_method(type_name, method_name, callable);
        self
    }

    /// Looks up a callable by `"function"` or `"Type::method"`.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::UnknownCallable`] if nothing is registered under
    /// the name.
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn Callable>, FlowError> {
        let found = match name.split_once(METHOD_SEPARATOR) {
            Some((type_name, method_name)) => self
                .methods
                .get(type_name)
                .and_then(|methods| methods.get(method_name)),
            None => self.functions.get(name),
        };

        found.cloned().ok_or_else(|| FlowError::UnknownCallable {
            name: name.to_string(),
        })
    }

    /// Returns the number of registered functions and methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len() + self.methods.values().map(HashMap::len).sum::<usize>()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolves an invocable to the callable that will run.
///
/// # Errors
///
/// Returns [`FlowError::UnknownCallable`] for a name the registry does not know.
pub fn resolve(invocable: &Invocable, registry: &Registry) -> Result<Arc<dyn Callable>, FlowError> {
    match invocable {
        Invocable::Callable(callable) => Ok(Arc::clone(callable)),
        Invocable::Named(name) => {
            trace!(name = %name, "Resolving named callable");
            registry.lookup(name)
        }
    }
}

/// Returns the ordered parameter names of an invocable.
///
/// # Errors
///
/// Returns [`FlowError::UnknownCallable`] for a name the registry does not know.
pub fn parameter_names_of(invocable: &Invocable, registry: &Registry) -> Result<Vec<String>, FlowError> {
    let callable = resolve(invocable, registry)?;
    Ok(callable.signature().parameters().to_vec())
}
