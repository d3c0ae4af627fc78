//! Arguments bound for a single step call.

use crate::flow::Flow;
use serde_json::Value;
use std::ops::Index;

static NULL: Value = Value::Null;

/// One bound parameter.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Bound {
    /// A value resolved from the flow (or its default value provider).
    Value(Value),
    /// The running flow itself.
    ThisFlow,
}

/// The arguments a step is called with.
///
/// Values are positional, in the order the step declared its parameters.
/// A parameter named after the flow's reserved parameter (`this_flow` by
/// default) is not looked up; instead the running flow is reachable through
/// [`Arguments::this_flow`].
#[derive(Debug)]
pub struct Arguments<'a> {
    names: &'a [String],
    bound: Vec<Bound>,
    flow: &'a mut Flow,
}

impl<'a> Arguments<'a> {
    pub(crate) fn new(flow: &'a mut Flow, names: &'a [String], bound: Vec<Bound>) -> Self {
        Self { names, bound, flow }
    }

    /// Returns the number of declared parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    /// Returns true if the step declared no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    /// Returns the declared parameter names.
    #[must_use]
    pub fn names(&self) -> &[String] {
        self.names
    }

    /// Returns the value bound at `index`.
    ///
    /// `None` if the index is out of range or refers to the flow parameter.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        match self.bound.get(index)? {
            Bound::Value(value) => Some(value),
            Bound::ThisFlow => None,
        }
    }

    /// Returns the value bound to the parameter called `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        let index = self.names.iter().position(|n| n == name)?;
        self.get(index)
    }

    /// Moves the value bound at `index` out, leaving null behind.
    pub fn take(&mut self, index: usize) -> Value {
        match self.bound.get_mut(index) {
            Some(Bound::Value(value)) => std::mem::take(value),
            _ => Value::Null,
        }
    }

    /// Returns the running flow if the step declared the flow parameter.
    pub fn this_flow(&mut self) -> Option<&mut Flow> {
        if self.bound.contains(&Bound::ThisFlow) {
            Some(&mut *self.flow)
        } else {
            None
        }
    }
}

impl Index<usize> for Arguments<'_> {
    type Output = Value;

    /// Positional access; the flow parameter reads as null.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    fn index(&self, index: usize) -> &Value {
        match &self.bound[index] {
            Bound::Value(value) => value,
            Bound::ThisFlow => &NULL,
        }
    }
}
