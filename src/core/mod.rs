//! Core types and traits for slidefx.
//!
//! - Value types (Image, Integer, ...)
//! - Port and parameter definitions
//! - The `FilterNode` trait and its metadata
//! - Error types
//! - Execution and validation contexts

pub mod types;
pub mod port;
pub mod error;
pub mod context;
pub mod node;

pub use types::{Value, PortType, ImageValue, ImageFormat, ImageMetadata};
pub use port::{PortDefinition, ParameterDefinition, Constraint, UiHint};
pub use error::{SlideFxError, ValidationError, ExecutionError, KernelError, DisplayError, ConfigError};
pub use context::{ValidationContext, ExecutionContext};
pub use node::{FilterNode, NodeMetadata, Category};
