//! Adapters turning functions and methods into callables.

use super::{Arguments, Callable, Signature};
use serde_json::Value;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// A function-based step.
///
/// Covers free and anonymous functions: the closure is called with the
/// arguments bound for the parameter names given at construction.
pub struct FnStep<F>
where
    F: Fn(Arguments<'_>) -> anyhow::Result<Value> + Send + Sync,
{
    signature: Signature,
    func: F,
}

impl<F> FnStep<F>
where
    F: Fn(Arguments<'_>) -> anyhow::Result<Value> + Send + Sync,
{
    /// Creates an anonymous function step.
    #[track_caller]
    pub fn new(parameters: &[&str], func: F) -> Self {
        Self {
            signature: Signature::new("{closure}", parameters),
            func,
        }
    }

    /// Creates a named function step.
    #[track_caller]
    pub fn named(name: impl Into<String>, parameters: &[&str], func: F) -> Self {
        Self {
            signature: Signature::new(name, parameters),
            func,
        }
    }
}

impl<F> Debug for FnStep<F>
where
    F: Fn(Arguments<'_>) -> anyhow::Result<Value> + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStep")
            .field("signature", &self.signature)
            .finish()
    }
}

impl<F> Callable for FnStep<F>
where
    F: Fn(Arguments<'_>) -> anyhow::Result<Value> + Send + Sync,
{
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, args: Arguments<'_>) -> anyhow::Result<Value> {
        (self.func)(args)
    }
}

/// A method bound to its receiver.
pub struct MethodStep<T> {
    receiver: Arc<T>,
    signature: Signature,
    method: fn(&T, Arguments<'_>) -> anyhow::Result<Value>,
}

impl<T> MethodStep<T>
where
    T: Send + Sync + 'static,
{
    /// Binds `method` to `receiver`.
    ///
    /// The signature name is `Type::method_name`.
    #[track_caller]
    pub fn new(
        receiver: Arc<T>,
        method_name: &str,
        parameters: &[&str],
        method: fn(&T, Arguments<'_>) -> anyhow::Result<Value>,
    ) -> Self {
        let name = format!("{}::{}", short_type_name::<T>(), method_name);
        Self {
            receiver,
            signature: Signature::new(name, parameters),
            method,
        }
    }

    /// Returns the receiver.
    #[must_use]
    pub fn receiver(&self) -> &Arc<T> {
        &self.receiver
    }
}

impl<T> Debug for MethodStep<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodStep")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl<T> Callable for MethodStep<T>
where
    T: Send + Sync + 'static,
{
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, args: Arguments<'_>) -> anyhow::Result<Value> {
        (self.method)(&self.receiver, args)
    }
}

/// A step that does nothing.
#[derive(Debug, Clone)]
pub struct NoOpStep {
    signature: Signature,
}

impl NoOpStep {
    /// Creates a new no-op step.
    #[must_use]
    #[track_caller]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            signature: Signature::new(name, &[]),
        }
    }
}

impl Callable for NoOpStep {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, _args: Arguments<'_>) -> anyhow::Result<Value> {
        Ok(Value::Null)
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}
