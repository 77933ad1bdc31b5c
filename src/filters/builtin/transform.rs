//! Geometric transforms.

use super::input_image;
use crate::core::context::{ExecutionContext, ValidationContext};
use crate::core::error::{ExecutionError, ValidationError};
use crate::core::node::{Category, FilterNode, NodeMetadata};
use crate::core::port::{Constraint, ParameterDefinition, PortDefinition, UiHint};
use crate::core::types::{ImageValue, PortType, Value};
use crate::filters::registry::FilterRegistry;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Register transform filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|| Box::new(Flip));
}

/// Flip axis selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipMode {
    /// Mirror left to right.
    Horizontal,
    /// Mirror top to bottom.
    Vertical,
    /// Both axes, i.e. a 180 degree rotation.
    Both,
}

impl FlipMode {
    pub const NAMES: [&'static str; 3] = ["horizontal", "vertical", "both"];

    pub fn name(self) -> &'static str {
        match self {
            FlipMode::Horizontal => "horizontal",
            FlipMode::Vertical => "vertical",
            FlipMode::Both => "both",
        }
    }

    /// Apply the flip.
    pub fn apply(self, image: &DynamicImage) -> DynamicImage {
        match self {
            FlipMode::Horizontal => image.fliph(),
            FlipMode::Vertical => image.flipv(),
            FlipMode::Both => image.rotate180(),
        }
    }
}

impl FromStr for FlipMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(FlipMode::Horizontal),
            "vertical" => Ok(FlipMode::Vertical),
            "both" => Ok(FlipMode::Both),
            other => Err(format!(
                "Unknown flip mode '{}': expected one of {}",
                other,
                Self::NAMES.join(", ")
            )),
        }
    }
}

/// Flips an image around one or both axes.
#[derive(Debug, Clone)]
pub struct Flip;

impl FilterNode for Flip {
    fn metadata(&self) -> NodeMetadata {
        NodeMetadata::builder("flip", "Flip")
            .description("Flip an image horizontally, vertically, or both")
            .category(Category::Transform)
            .input(PortDefinition::input("image", PortType::Image).with_description("Input image"))
            .output(PortDefinition::output("image", PortType::Image).with_description("Flipped image"))
            .parameter(
                ParameterDefinition::new("mode", PortType::String, Value::String("both".to_string()))
                    .with_description("Axis to flip around")
                    .with_ui_hint(UiHint::Dropdown {
                        options: FlipMode::NAMES.iter().map(|s| s.to_string()).collect(),
                    })
                    .with_constraint(Constraint::OneOf(
                        FlipMode::NAMES.iter().map(|s| Value::String(s.to_string())).collect(),
                    )),
            )
            .build()
    }

    fn validate(&self, ctx: &ValidationContext) -> Result<(), ValidationError> {
        let mode = ctx.get_string("mode").unwrap_or("both");
        mode.parse::<FlipMode>()
            .map(|_| ())
            .map_err(|error| ValidationError::ConstraintViolation {
                filter: ctx.filter.clone(),
                parameter: "mode".to_string(),
                error,
            })
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), ExecutionError> {
        let mode = ctx
            .get_string("mode")
            .unwrap_or("both")
            .parse::<FlipMode>()
            .map_err(|error| ExecutionError::NodeExecution {
                filter: ctx.filter.clone(),
                error,
            })?;

        let flipped = mode.apply(input_image(ctx, "image")?);
        ctx.set_output_image("image", ImageValue::new(flipped));
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn FilterNode> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn numbered() -> DynamicImage {
        // 0 1 2
        // 3 4 5
        DynamicImage::ImageLuma8(GrayImage::from_fn(3, 2, |x, y| Luma([(y * 3 + x) as u8])))
    }

    #[test]
    fn test_flip_modes() {
        let img = numbered();
        assert_eq!(FlipMode::Horizontal.apply(&img).as_bytes(), &[2, 1, 0, 5, 4, 3]);
        assert_eq!(FlipMode::Vertical.apply(&img).as_bytes(), &[3, 4, 5, 0, 1, 2]);
        assert_eq!(FlipMode::Both.apply(&img).as_bytes(), &[5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_mode_parsing() {
        for name in FlipMode::NAMES {
            assert_eq!(name.parse::<FlipMode>().unwrap().name(), name);
        }
        assert!("diagonal".parse::<FlipMode>().is_err());
    }

    #[test]
    fn test_flip_node() {
        let mut ctx = ExecutionContext::new("flip");
        ctx.add_input("image", Value::Image(ImageValue::new(numbered())));
        ctx.add_parameter("mode", Value::String("both".to_string()));
        Flip.execute(&mut ctx).unwrap();

        let out = ctx.take_output("image").unwrap();
        let bytes = out.as_image().unwrap().get_image().unwrap().as_bytes().to_vec();
        assert_eq!(bytes, vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_flip_validation() {
        let mut ctx = ValidationContext::new("flip");
        ctx.add_parameter("mode", Value::String("sideways".to_string()));
        assert!(matches!(
            Flip.validate(&ctx),
            Err(ValidationError::ConstraintViolation { .. })
        ));
    }
}
