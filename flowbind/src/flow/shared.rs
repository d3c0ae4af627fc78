//! Shared handles for nesting flows.

use super::Flow;
use crate::errors::{FlowError, MisuseError};
use crate::values::Values;
use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::sync::Arc;

/// A flow that can be used as a step of other flows.
///
/// Cloning the handle shares the same flow. A nested flow keeps its own
/// state between runs, like any other flow.
#[derive(Clone)]
pub struct SharedFlow {
    inner: Arc<Mutex<Flow>>,
}

impl SharedFlow {
    /// Wraps `flow`.
    #[must_use]
    pub fn new(flow: Flow) -> Self {
        Self {
            inner: Arc::new(Mutex::new(flow)),
        }
    }

    /// Locks the flow for direct access.
    ///
    /// Blocks while the flow is running on another thread; locking it from
    /// one of its own steps deadlocks, use [`SharedFlow::try_lock`] there.
    pub fn lock(&self) -> MutexGuard<'_, Flow> {
        self.inner.lock()
    }

    /// Locks the flow if it is not already in use.
    #[must_use]
    pub fn try_lock(&self) -> Option<MutexGuard<'_, Flow>> {
        self.inner.try_lock()
    }

    /// Invokes the flow with `values`.
    ///
    /// # Errors
    ///
    /// Returns [`MisuseError::NestedFlowBusy`] if the flow is already
    /// running, or whatever the run itself fails with.
    pub fn invoke(&self, values: Values) -> Result<Values, FlowError> {
        let mut flow = self.try_lock().ok_or(MisuseError::NestedFlowBusy)?;
        flow.invoke(values)
    }

    /// Returns the flow name, or `"<running>"` while the flow is in use.
    #[must_use]
    pub fn name(&self) -> String {
        self.try_lock()
            .map_or_else(|| "<running>".to_string(), |flow| flow.name().to_string())
    }

    /// Returns true if both handles share the same flow.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl From<Flow> for SharedFlow {
    fn from(flow: Flow) -> Self {
        Self::new(flow)
    }
}

impl fmt::Debug for SharedFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_lock() {
            Some(flow) => f.debug_tuple("SharedFlow").field(&*flow).finish(),
            None => f.debug_tuple("SharedFlow").field(&"<running>").finish(),
        }
    }
}
