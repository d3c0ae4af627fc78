//! Flow building and execution.
//!
//! This module provides:
//! - The [`Flow`] engine and its step loop
//! - [`SharedFlow`] handles for nesting flows as steps
//! - Flow configuration and a builder

mod builder;
mod config;
mod engine;
mod shared;


pub use builder::FlowBuilder;
pub use config::{FlowConfig, DEFAULT_FLOW_NAME, THIS_FLOW};
pub use engine::Flow;
pub use shared::SharedFlow;
