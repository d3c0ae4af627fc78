//! Adapter from a service container to a default value provider.

use super::DefaultValueProvider;
use crate::errors::ContainerError;
use serde_json::Value;
use tracing::trace;

/// A bounded lookup service, typically a dependency-injection container.
#[cfg_attr(test, mockall::automock)]
pub trait Container: Send + Sync {
    /// Returns the entry for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::NotFound`] when there is no such entry, or
    /// [`ContainerError::Other`] when the lookup itself failed.
    fn get(&self, id: &str) -> Result<Value, ContainerError>;
}

/// Serves default values from a [`Container`].
///
/// A missing entry yields no value; any other container failure propagates.
#[derive(Debug, Clone)]
pub struct ContainerAdapter<C> {
    container: C,
}

impl<C> ContainerAdapter<C>
where
    C: Container,
{
    /// Wraps `container`.
    #[must_use]
    pub fn new(container: C) -> Self {
        Self { container }
    }

    /// Returns the wrapped container.
    #[must_use]
    pub fn container(&self) -> &C {
        &self.container
    }
}

impl<C> DefaultValueProvider for ContainerAdapter<C>
where
    C: Container,
{
    fn get_value(&self, name: &str) -> anyhow::Result<Option<Value>> {
        match self.container.get(name) {
            Ok(value) => Ok(Some(value)),
            Err(ContainerError::NotFound { id }) => {
                trace!(id = %id, "Container has no entry");
                Ok(None)
            }
            Err(ContainerError::Other(err)) => Err(err),
        }
    }
}
