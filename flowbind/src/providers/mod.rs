//! Default value providers.
//!
//! A flow consults its provider only for names that are missing from its
//! values. Providers answer `Ok(None)` when they have nothing for a name.

mod composite;
mod container;

pub use composite::ProviderComposite;
pub use container::{Container, ContainerAdapter};

#[cfg(test)]
pub use container::MockContainer;

use crate::values::Values;
use serde_json::Value;
use std::sync::Arc;

/// A fallback lookup for names missing from a flow's values.
#[cfg_attr(test, mockall::automock)]
pub trait DefaultValueProvider: Send + Sync {
    /// Returns the value for `name`, or `None` if there is none.
    fn get_value(&self, name: &str) -> anyhow::Result<Option<Value>>;
}

impl<P> DefaultValueProvider for Arc<P>
where
    P: DefaultValueProvider + ?Sized,
{
    fn get_value(&self, name: &str) -> anyhow::Result<Option<Value>> {
        (**self).get_value(name)
    }
}

/// A provider backed by a fixed map.
#[derive(Debug, Clone, Default)]
pub struct MapProvider {
    values: Values,
}

impl MapProvider {
    /// Creates a provider serving `values`.
    #[must_use]
    pub fn new(values: Values) -> Self {
        Self { values }
    }

    /// Adds a value.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.values.insert(name.into(), value);
        self
    }
}

impl DefaultValueProvider for MapProvider {
    fn get_value(&self, name: &str) -> anyhow::Result<Option<Value>> {
        Ok(self.values.get(name).cloned())
    }
}
