//! First-match chain of providers.

use super::DefaultValueProvider;
use serde_json::Value;
use std::fmt::{self, Debug};

/// Tries each provider in order and returns the first present value.
///
/// A provider answering `Some(Value::Null)` counts as having no value, so a
/// null default can never win over a later provider.
#[derive(Default)]
pub struct ProviderComposite {
    providers: Vec<Box<dyn DefaultValueProvider>>,
}

impl ProviderComposite {
    /// Creates a composite over `providers`, queried in order.
    #[must_use]
    pub fn new(providers: Vec<Box<dyn DefaultValueProvider>>) -> Self {
        Self { providers }
    }

    /// Appends a provider to the end of the chain.
    #[must_use]
    pub fn with_provider(mut self, provider: impl DefaultValueProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Returns the number of providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Debug for ProviderComposite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderComposite")
            .field("providers", &self.providers.len())
            .finish()
    }
}

impl DefaultValueProvider for ProviderComposite {
    fn get_value(&self, name: &str) -> anyhow::Result<Option<Value>> {
        for provider in &self.providers {
            match provider.get_value(name)? {
                None | Some(Value::Null) => continue,
                Some(value) => return Ok(Some(value)),
            }
        }
        Ok(None)
    }
}
