//! Filter nodes and the registry that names them.
//!
//! `builtin` holds every node the CLI and the demo windows use.

pub mod registry;
pub mod builtin;

pub use registry::{FilterRegistry, FilterFactory};
