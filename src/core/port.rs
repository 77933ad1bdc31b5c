//! Port and parameter definitions for filter nodes.
//!
//! Ports describe the images a node consumes and produces. Parameters
//! describe its configuration; the ones hinted as sliders become trackbars
//! when the node is hosted in a [`TrackbarWindow`](crate::window::TrackbarWindow).

use crate::core::types::{PortType, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    Input,
    Output,
}

/// An image input or output of a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortDefinition {
    pub name: String,
    pub display_name: String,
    pub port_type: PortType,
    pub direction: PortDirection,
    pub description: String,
}

/// How a front end should present a parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "widget", content = "options")]
pub enum UiHint {
    #[default]
    Default,
    /// Integer trackbar; bounds come from the `Range` constraint
    Slider,
    Dropdown { options: Vec<String> },
    /// File picker with glob filters such as `*.png`
    FileChooser { filters: Vec<String> },
}

/// A named, typed, constrained node parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    /// Trackbar label for sliders
    pub display_name: String,
    pub param_type: PortType,
    /// Initial trackbar position for sliders
    pub default_value: Value,
    pub description: String,
    pub constraints: Vec<Constraint>,
    pub ui_hint: UiHint,
}

/// A check a parameter value must pass before the node sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params")]
pub enum Constraint {
    /// Inclusive numeric bounds
    Range { min: f64, max: f64 },
    NotEmpty,
    OneOf(Vec<Value>),
}

impl PortDefinition {
    pub fn input(name: impl Into<String>, port_type: PortType) -> Self {
        Self::with_direction(name.into(), port_type, PortDirection::Input)
    }

    pub fn output(name: impl Into<String>, port_type: PortType) -> Self {
        Self::with_direction(name.into(), port_type, PortDirection::Output)
    }

    fn with_direction(name: String, port_type: PortType, direction: PortDirection) -> Self {
        Self {
            display_name: title_case(&name),
            name,
            port_type,
            direction,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl ParameterDefinition {
    pub fn new(name: impl Into<String>, param_type: PortType, default_value: Value) -> Self {
        let name = name.into();
        Self {
            display_name: title_case(&name),
            name,
            param_type,
            default_value,
            description: String::new(),
            constraints: Vec::new(),
            ui_hint: UiHint::Default,
        }
    }

    /// An integer trackbar running from 0 to `max`.
    pub fn slider(name: impl Into<String>, default: i64, max: i64) -> Self {
        let mut param = Self::new(name, PortType::Integer, Value::Integer(default))
            .with_constraint(Constraint::Range { min: 0.0, max: max as f64 });
        param.ui_hint = UiHint::Slider;
        param
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_ui_hint(mut self, ui_hint: UiHint) -> Self {
        self.ui_hint = ui_hint;
        self
    }

    pub fn is_slider(&self) -> bool {
        self.ui_hint == UiHint::Slider
    }

    /// Integer bounds of the first range constraint.
    pub fn slider_range(&self) -> Option<(i64, i64)> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::Range { min, max } => Some((min.ceil() as i64, max.floor() as i64)),
            _ => None,
        })
    }

    /// Check a value's type, then every constraint in declaration order.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        if !self.param_type.matches(value) {
            return Err(format!(
                "Type mismatch for parameter '{}': expected {}, got {}",
                self.name,
                self.param_type,
                value.get_type()
            ));
        }
        self.constraints.iter().try_for_each(|c| c.validate(value))
    }
}

/// `l2_gradient` -> `L2 Gradient`.
fn title_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Constraint {
    /// Values of the wrong kind for a constraint pass it; the type check
    /// in [`ParameterDefinition::validate`] catches those.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match self {
            Constraint::Range { min, max } => match value.as_float() {
                Some(num) if num < *min || num > *max => {
                    Err(format!("Value {} is out of range [{}, {}]", num, min, max))
                }
                _ => Ok(()),
            },
            Constraint::NotEmpty => match value {
                Value::String(s) if s.is_empty() => Err("Value cannot be empty".to_string()),
                _ => Ok(()),
            },
            Constraint::OneOf(options) if !options.contains(value) => {
                Err(format!("Value {} is not one of the allowed options", value))
            }
            Constraint::OneOf(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_definition() {
        let param = ParameterDefinition::slider("emboss", 0, 7).with_display_name("Emboss Edges");

        assert_eq!(param.display_name, "Emboss Edges");
        assert!(param.is_slider());
        assert_eq!(param.slider_range(), Some((0, 7)));
        assert_eq!(param.default_value, Value::Integer(0));
    }

    #[test]
    fn test_constraint_range_validation() {
        let constraint = Constraint::Range { min: 0.0, max: 100.0 };

        assert!(constraint.validate(&Value::Float(50.0)).is_ok());
        assert!(constraint.validate(&Value::Integer(0)).is_ok());
        assert!(constraint.validate(&Value::Integer(100)).is_ok());
        assert!(constraint.validate(&Value::Integer(-1)).is_err());
        assert!(constraint.validate(&Value::Integer(101)).is_err());
    }

    #[test]
    fn test_parameter_type_check() {
        let param = ParameterDefinition::slider("kernel_size", 0, 2);
        let err = param.validate(&Value::String("3".to_string())).unwrap_err();
        assert!(err.contains("kernel_size"));
        assert!(param.validate(&Value::Integer(3)).is_err());
        assert!(param.validate(&Value::Integer(2)).is_ok());
    }

    #[test]
    fn test_not_empty_and_one_of() {
        assert!(Constraint::NotEmpty.validate(&Value::String(String::new())).is_err());
        assert!(Constraint::NotEmpty.validate(&Value::String("walt.jpg".into())).is_ok());

        let constraint = Constraint::OneOf(vec![
            Value::String("horizontal".to_string()),
            Value::String("both".to_string()),
        ]);
        assert!(constraint.validate(&Value::String("both".to_string())).is_ok());
        assert!(constraint.validate(&Value::String("diagonal".to_string())).is_err());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("l2_gradient"), "L2 Gradient");
        assert_eq!(title_case("threshold1"), "Threshold1");
        assert_eq!(PortDefinition::input("image", PortType::Image).display_name, "Image");
    }
}
