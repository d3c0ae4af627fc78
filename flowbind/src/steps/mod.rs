//! Steps and the callable abstraction they are built on.
//!
//! Every ordinary step is a [`Callable`]: something that can report its
//! [`Signature`] (name, definition site and ordered parameter names) and be
//! called with the [`Arguments`] bound from those names.

mod arguments;
mod function;

pub use arguments::Arguments;
pub(crate) use arguments::Bound;
pub use function::{FnStep, MethodStep, NoOpStep};

use crate::flow::SharedFlow;
use crate::reflection::Invocable;
use serde_json::Value;
use std::fmt::{self, Debug};
use std::panic::Location;
use std::sync::Arc;

/// Trait for invocable steps.
///
/// A step declares the names of its inputs through its signature; the flow
/// resolves each name against its values and passes them positionally.
/// The returned value must be `Value::Null` (nothing to merge) or an object
/// whose entries are merged into the flow's values.
pub trait Callable: Send + Sync + Debug {
    /// Returns the signature of the step.
    fn signature(&self) -> &Signature;

    /// Calls the step with its bound arguments.
    fn call(&self, args: Arguments<'_>) -> anyhow::Result<Value>;
}

/// The binding contract of a callable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    name: String,
    parameters: Vec<String>,
    location: Option<&'static Location<'static>>,
}

impl Signature {
    /// Creates a signature, recording the caller as the definition site.
    #[must_use]
    #[track_caller]
    pub fn new(name: impl Into<String>, parameters: &[&str]) -> Self {
        Self {
            name: name.into(),
            parameters: parameters.iter().map(|p| (*p).to_string()).collect(),
            location: Some(Location::caller()),
        }
    }

    /// Creates a signature without a known definition site.
    #[must_use]
    pub fn unlocated(name: impl Into<String>, parameters: &[&str]) -> Self {
        Self {
            name: name.into(),
            parameters: parameters.iter().map(|p| (*p).to_string()).collect(),
            location: None,
        }
    }

    /// Returns the callable's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared parameter names, in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Returns the definition site as `file(line)`.
    #[must_use]
    pub fn location(&self) -> String {
        self.location.map_or_else(
            || "<unknown>".to_string(),
            |loc| format!("{}({})", loc.file(), loc.line()),
        )
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.parameters.join(", "))
    }
}

/// One unit of flow work.
#[derive(Debug, Clone)]
pub enum Step {
    /// An ordinary invocable whose parameters are bound by name.
    Invoke(Invocable),
    /// A nested flow that receives the whole value context.
    Flow(SharedFlow),
}

impl Step {
    /// Wraps a callable.
    pub fn callable(callable: impl Callable + 'static) -> Self {
        Self::Invoke(Invocable::Callable(Arc::new(callable)))
    }

    /// Refers to a callable registered under `name` (`"func"` or `"Type::method"`).
    pub fn named(name: impl Into<String>) -> Self {
        Self::Invoke(Invocable::Named(name.into()))
    }

    /// Returns a short label for diagnostics.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Invoke(Invocable::Callable(callable)) => callable.signature().name().to_string(),
            Self::Invoke(Invocable::Named(name)) => name.clone(),
            Self::Flow(flow) => format!("flow:{}", flow.name()),
        }
    }
}

impl<F> From<FnStep<F>> for Step
where
    F: Fn(Arguments<'_>) -> anyhow::Result<Value> + Send + Sync + 'static,
{
    fn from(step: FnStep<F>) -> Self {
        Self::callable(step)
    }
}

impl<T> From<MethodStep<T>> for Step
where
    T: Send + Sync + 'static,
{
    fn from(step: MethodStep<T>) -> Self {
        Self::callable(step)
    }
}

impl From<NoOpStep> for Step {
    fn from(step: NoOpStep) -> Self {
        Self::callable(step)
    }
}

impl From<Arc<dyn Callable>> for Step {
    fn from(callable: Arc<dyn Callable>) -> Self {
        Self::Invoke(Invocable::Callable(callable))
    }
}

impl From<Invocable> for Step {
    fn from(invocable: Invocable) -> Self {
        Self::Invoke(invocable)
    }
}

impl From<SharedFlow> for Step {
    fn from(flow: SharedFlow) -> Self {
        Self::Flow(flow)
    }
}

impl From<&str> for Step {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}
