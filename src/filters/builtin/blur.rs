//! Gaussian blur filter.

use super::input_image;
use crate::core::context::{ExecutionContext, ValidationContext};
use crate::core::error::{ExecutionError, ValidationError};
use crate::core::node::{Category, FilterNode, NodeMetadata};
use crate::core::port::{Constraint, ParameterDefinition, PortDefinition};
use crate::core::types::{ImageValue, PortType, Value};
use crate::filters::registry::FilterRegistry;
use image::DynamicImage;
use imageproc::filter::gaussian_blur_f32;

/// Register blur filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|| Box::new(GaussianBlur));
}

/// Applies a Gaussian blur to an image.
#[derive(Debug, Clone)]
pub struct GaussianBlur;

impl FilterNode for GaussianBlur {
    fn metadata(&self) -> NodeMetadata {
        NodeMetadata::builder("gaussian_blur", "Gaussian Blur")
            .description("Apply a Gaussian blur to an image")
            .category(Category::Blur)
            .input(PortDefinition::input("image", PortType::Image).with_description("Input image"))
            .output(PortDefinition::output("image", PortType::Image).with_description("Blurred image"))
            .parameter(
                ParameterDefinition::new("sigma", PortType::Float, Value::Float(1.0))
                    .with_description("Blur intensity (standard deviation)")
                    .with_constraint(Constraint::Range { min: 0.1, max: 100.0 }),
            )
            .build()
    }

    fn validate(&self, ctx: &ValidationContext) -> Result<(), ValidationError> {
        let sigma = ctx.get_float("sigma")?;
        if sigma.is_finite() && sigma > 0.0 {
            Ok(())
        } else {
            Err(ValidationError::CustomValidation {
                filter: ctx.filter.clone(),
                error: format!("Sigma must be positive, got {}", sigma),
            })
        }
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), ExecutionError> {
        let sigma = ctx.get_float("sigma")? as f32;
        let blurred = blur(input_image(ctx, "image")?, sigma);

        ctx.set_output_image("image", ImageValue::new(blurred));
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn FilterNode> {
        Box::new(self.clone())
    }
}

/// Blur keeping grayscale images grayscale and alpha where present.
pub fn blur(image: &DynamicImage, sigma: f32) -> DynamicImage {
    if image.width() == 0 || image.height() == 0 {
        return image.clone();
    }

    match image {
        DynamicImage::ImageLuma8(gray) => DynamicImage::ImageLuma8(gaussian_blur_f32(gray, sigma)),
        other if other.color().has_alpha() => {
            DynamicImage::ImageRgba8(gaussian_blur_f32(&other.to_rgba8(), sigma))
        }
        other => DynamicImage::ImageRgb8(gaussian_blur_f32(&other.to_rgb8(), sigma)),
    }
}
