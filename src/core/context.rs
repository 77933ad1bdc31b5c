//! Execution and validation contexts.
//!
//! Contexts carry a filter's inputs, parameters and outputs. A trackbar
//! window builds a fresh pair for every recompute, so the slider state a
//! filter sees is always a typed snapshot rather than shared mutable data.

use crate::core::error::{ExecutionError, ValidationError};
use crate::core::types::{ImageValue, PortType, Value};
use std::collections::HashMap;

/// Inputs and parameters bound for one run of one filter.
#[derive(Debug, Clone, Default)]
struct Bindings {
    inputs: HashMap<String, Value>,
    parameters: HashMap<String, Value>,
}

/// What a filter's `validate` sees.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// ID of the filter being validated.
    pub filter: String,
    bindings: Bindings,
}

impl ValidationContext {
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            bindings: Bindings::default(),
        }
    }

    pub fn add_input(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.inputs.insert(name.into(), value);
    }

    pub fn add_parameter(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.parameters.insert(name.into(), value);
    }

    pub fn get_input_image(&self, name: &str) -> Result<&ImageValue, ValidationError> {
        let value = self.bindings.inputs.get(name).ok_or_else(|| {
            ValidationError::MissingRequiredInput {
                filter: self.filter.clone(),
                port: name.to_string(),
            }
        })?;
        value.as_image().ok_or(ValidationError::TypeMismatch {
            expected: PortType::Image,
            got: value.get_type(),
        })
    }

    pub fn get_parameter(&self, name: &str) -> Result<&Value, ValidationError> {
        self.bindings.parameters.get(name).ok_or_else(|| ValidationError::ConstraintViolation {
            filter: self.filter.clone(),
            parameter: name.to_string(),
            error: "Parameter not set".to_string(),
        })
    }

    pub fn get_integer(&self, name: &str) -> Result<i64, ValidationError> {
        let value = self.get_parameter(name)?;
        value.as_integer().ok_or_else(|| mismatch(PortType::Integer, value))
    }

    pub fn get_float(&self, name: &str) -> Result<f64, ValidationError> {
        let value = self.get_parameter(name)?;
        value.as_float().ok_or_else(|| mismatch(PortType::Float, value))
    }

    pub fn get_string(&self, name: &str) -> Result<&str, ValidationError> {
        let value = self.get_parameter(name)?;
        value.as_string().ok_or_else(|| mismatch(PortType::String, value))
    }
}

fn mismatch(expected: PortType, value: &Value) -> ValidationError {
    ValidationError::TypeMismatch {
        expected,
        got: value.get_type(),
    }
}

/// What a filter's `execute` reads from and writes its outputs to.
#[derive(Debug)]
pub struct ExecutionContext {
    /// ID of the filter being executed.
    pub filter: String,
    bindings: Bindings,
    outputs: HashMap<String, Value>,
}

impl ExecutionContext {
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            bindings: Bindings::default(),
            outputs: HashMap::new(),
        }
    }

    pub fn add_input(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.inputs.insert(name.into(), value);
    }

    pub fn add_parameter(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.parameters.insert(name.into(), value);
    }

    pub fn get_input(&self, name: &str) -> Result<&Value, ExecutionError> {
        self.bindings.inputs.get(name).ok_or_else(|| ExecutionError::MissingInput {
            filter: self.filter.clone(),
            port: name.to_string(),
        })
    }

    pub fn get_input_image(&self, name: &str) -> Result<&ImageValue, ExecutionError> {
        self.get_input(name)?
            .as_image()
            .ok_or_else(|| self.wrong_kind("Input", name, "an image"))
    }

    pub fn get_parameter(&self, name: &str) -> Result<&Value, ExecutionError> {
        self.bindings.parameters.get(name).ok_or_else(|| ExecutionError::MissingParameter {
            filter: self.filter.clone(),
            parameter: name.to_string(),
        })
    }

    pub fn get_integer(&self, name: &str) -> Result<i64, ExecutionError> {
        self.get_parameter(name)?
            .as_integer()
            .ok_or_else(|| self.wrong_kind("Parameter", name, "an integer"))
    }

    pub fn get_float(&self, name: &str) -> Result<f64, ExecutionError> {
        self.get_parameter(name)?
            .as_float()
            .ok_or_else(|| self.wrong_kind("Parameter", name, "a number"))
    }

    pub fn get_string(&self, name: &str) -> Result<&str, ExecutionError> {
        self.get_parameter(name)?
            .as_string()
            .ok_or_else(|| self.wrong_kind("Parameter", name, "a string"))
    }

    pub fn set_output(&mut self, name: impl Into<String>, value: Value) {
        self.outputs.insert(name.into(), value);
    }

    pub fn set_output_image(&mut self, name: impl Into<String>, image: ImageValue) {
        self.set_output(name, Value::Image(image))
    }

    /// Remove and return one output.
    pub fn take_output(&mut self, name: &str) -> Result<Value, ExecutionError> {
        self.outputs.remove(name).ok_or_else(|| ExecutionError::OutputNotSet {
            filter: self.filter.clone(),
            port: name.to_string(),
        })
    }

    fn wrong_kind(&self, what: &str, name: &str, expected: &str) -> ExecutionError {
        ExecutionError::NodeExecution {
            filter: self.filter.clone(),
            error: format!("{} '{}' is not {}", what, name, expected),
        }
    }
}

/// A validated snapshot becomes the execution snapshot unchanged.
impl From<ValidationContext> for ExecutionContext {
    fn from(ctx: ValidationContext) -> Self {
        Self {
            filter: ctx.filter,
            bindings: ctx.bindings,
            outputs: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_context_parameters() {
        let mut ctx = ValidationContext::new("edge_preview");
        ctx.add_parameter("sigma", Value::Integer(2));
        ctx.add_parameter("mode", Value::String("both".into()));

        assert_eq!(ctx.get_integer("sigma").unwrap(), 2);
        assert_eq!(ctx.get_float("sigma").unwrap(), 2.0);
        assert!(matches!(
            ctx.get_integer("missing"),
            Err(ValidationError::ConstraintViolation { .. })
        ));
        assert!(matches!(
            ctx.get_integer("mode"),
            Err(ValidationError::TypeMismatch { expected: PortType::Integer, got: PortType::String })
        ));
    }

    #[test]
    fn test_validation_context_missing_image() {
        let mut ctx = ValidationContext::new("filter_effects");
        assert!(matches!(
            ctx.get_input_image("image"),
            Err(ValidationError::MissingRequiredInput { .. })
        ));

        ctx.add_input("image", Value::Integer(1));
        assert!(matches!(
            ctx.get_input_image("image"),
            Err(ValidationError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_execution_context_outputs() {
        let mut ctx = ExecutionContext::new("passthrough");
        ctx.set_output("result", Value::Integer(100));

        assert_eq!(ctx.take_output("result").unwrap(), Value::Integer(100));
        assert!(matches!(
            ctx.take_output("result"),
            Err(ExecutionError::OutputNotSet { .. })
        ));
    }

    #[test]
    fn test_from_validation_context() {
        let mut val_ctx = ValidationContext::new("flip");
        val_ctx.add_parameter("mode", Value::String("both".to_string()));
        val_ctx.add_input("image", Value::None);

        let exec_ctx: ExecutionContext = val_ctx.into();
        assert_eq!(exec_ctx.filter, "flip");
        assert_eq!(exec_ctx.get_string("mode").unwrap(), "both");
        assert!(exec_ctx.get_input("image").is_ok());
        assert!(matches!(
            exec_ctx.get_input_image("image"),
            Err(ExecutionError::NodeExecution { .. })
        ));
        assert!(matches!(
            exec_ctx.get_integer("sigma"),
            Err(ExecutionError::MissingParameter { .. })
        ));
    }
}
