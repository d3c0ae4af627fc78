//! Testing utilities for flows.
//!
//! This module provides:
//! - Ready-made steps for common flow shapes
//! - A recording step that captures bound arguments

mod fixtures;
mod mocks;

pub use fixtures::{failing, push_to_array, returning};
pub use mocks::RecordingStep;
