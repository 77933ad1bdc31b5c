//! Error types for slidefx.
//!
//! Uses thiserror for structured errors with context. Every error names the
//! filter (or window) it came from so a failed recompute can be traced back
//! to the slider that triggered it.

use crate::core::types::PortType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for slidefx.
#[derive(Error, Debug)]
pub enum SlideFxError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("Display error: {0}")]
    Display(#[from] DisplayError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read image {}: {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Cannot load label font: {0}")]
    Font(#[from] ab_glyph::InvalidFont),

    #[error("{0}")]
    Other(String),
}

/// Errors raised while checking parameters before a recompute.
///
/// A rejected value never reaches the filter, and the window keeps its
/// previous trackbar positions.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: PortType, got: PortType },

    #[error("Missing required input '{port}' on filter '{filter}'")]
    MissingRequiredInput { filter: String, port: String },

    #[error("Constraint violation on filter '{filter}', parameter '{parameter}': {error}")]
    ConstraintViolation {
        filter: String,
        parameter: String,
        error: String,
    },

    #[error("Filter '{filter}' has no parameter '{parameter}'")]
    UnknownParameter { filter: String, parameter: String },

    #[error("Custom validation failed on filter '{filter}': {error}")]
    CustomValidation { filter: String, error: String },

    #[error("Resource not found: {resource} (referenced by filter '{filter}')")]
    ResourceNotFound { filter: String, resource: String },
}

/// Errors during filter execution.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Filter '{filter}' failed: {error}")]
    NodeExecution { filter: String, error: String },

    #[error("Missing input '{port}' for filter '{filter}'")]
    MissingInput { filter: String, port: String },

    #[error("Missing parameter '{parameter}' for filter '{filter}'")]
    MissingParameter { filter: String, parameter: String },

    #[error("Output '{port}' was not set by filter '{filter}'")]
    OutputNotSet { filter: String, port: String },

    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error("Failed to decode {}: {source}", .path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Errors from building kernel or pipeline parameters.
///
/// Raised when parameters are constructed, so `apply` itself cannot fail.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    #[error("Unsupported kernel size {0}: expected 3, 5 or 7")]
    UnsupportedSize(usize),

    #[error("Invalid kernel size selector {0}: expected 0, 1 or 2")]
    InvalidSelector(i64),

    #[error("{parameter} {value} is out of range [0, {max}]")]
    OutOfRange {
        parameter: &'static str,
        value: i64,
        max: i64,
    },
}

/// Errors from a display sink. These are fatal to the caller.
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Failed to present window '{window}': {source}")]
    Io {
        window: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode frame for window '{window}': {source}")]
    Image {
        window: String,
        #[source]
        source: image::ImageError,
    },
}

/// Errors while loading or overriding configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid override '{0}': expected name=integer")]
    InvalidOverride(String),

    #[error("Unknown setting '{0}'")]
    UnknownSetting(String),
}

// ============================================================================
// Error Utilities
// ============================================================================

impl ValidationError {
    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            ValidationError::MissingRequiredInput { port, .. } => {
                Some(format!("Provide an image for the '{}' input", port))
            }
            ValidationError::ResourceNotFound { resource, .. } => {
                Some(format!("Check that the file '{}' exists", resource))
            }
            ValidationError::ConstraintViolation { parameter, error, .. } => {
                Some(format!("Adjust '{}': {}", parameter, error))
            }
            ValidationError::UnknownParameter { filter, .. } => {
                Some(format!("Run `slidefx info {}` to list its parameters", filter))
            }
            _ => None,
        }
    }
}

impl SlideFxError {
    /// Hint printed by the CLI under a failed run.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            SlideFxError::Validation(e) => e.suggested_fix(),
            SlideFxError::FileNotFound(path) => {
                Some(format!("Check the input path '{}' or set `input` in the config", path.display()))
            }
            _ => None,
        }
    }
}

/// Result type alias for slidefx operations.
pub type SlideFxResult<T> = Result<T, SlideFxError>;
