//! # Flowbind
//!
//! A synchronous flow executor that binds step inputs by parameter name.
//!
//! A flow runs an ordered list of steps against one map of named values.
//! Flowbind provides:
//!
//! - **Binding by name**: each step declares parameter names and receives
//!   the matching values, falling back to a default value provider
//! - **Result merging**: a step returns an object whose entries are merged
//!   back into the values, or null to leave them unchanged
//! - **Nested flows**: a whole flow can be used as a step of another flow
//! - **Early exit**: a step that asks for the running flow can break it
//!
//! ## Quick Start
//!
//! ```rust
//! use flowbind::prelude::*;
//! use serde_json::json;
//!
//! let mut flow = FlowBuilder::new("greeting")
//!     .step(FnStep::named("greet", &["who"], |args| {
//!         Ok(json!({ "greeting": format!("hello {}", args[0].as_str().unwrap_or("nobody")) }))
//!     }))
//!     .default_value_provider(MapProvider::default().with_value("who", json!("world")))
//!     .build()?;
//!
//! let values = flow.invoke(Values::new())?;
//! assert_eq!(values["greeting"], json!("hello world"));
//! # Ok::<(), flowbind::errors::FlowError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod errors;
pub mod flow;
pub mod observability;
pub mod providers;
pub mod reflection;
pub mod steps;
pub mod testing;
pub mod values;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::{ContainerError, FlowError, MisuseError};
    pub use crate::flow::{Flow, FlowBuilder, FlowConfig, SharedFlow, THIS_FLOW};
    pub use crate::observability::{init_tracing, LoggingConfig};
    pub use crate::providers::{
        Container, ContainerAdapter, DefaultValueProvider, MapProvider, ProviderComposite,
    };
    pub use crate::reflection::{Invocable, Registry};
    pub use crate::steps::{Arguments, Callable, FnStep, MethodStep, NoOpStep, Signature, Step};
    pub use crate::values::Values;
}
