//! Color conversion filters.

use super::input_image;
use crate::core::context::{ExecutionContext, ValidationContext};
use crate::core::error::{ExecutionError, ValidationError};
use crate::core::node::{Category, FilterNode, NodeMetadata};
use crate::core::port::PortDefinition;
use crate::core::types::{ImageValue, PortType};
use crate::filters::registry::FilterRegistry;
use image::{DynamicImage, GrayImage, Luma};

/// Register color filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|| Box::new(Grayscale));
}

/// Converts an image to single-channel grayscale.
#[derive(Debug, Clone)]
pub struct Grayscale;

impl FilterNode for Grayscale {
    fn metadata(&self) -> NodeMetadata {
        NodeMetadata::builder("grayscale", "Grayscale")
            .description("Convert an image to 8-bit grayscale (0.299 R + 0.587 G + 0.114 B)")
            .category(Category::Color)
            .input(PortDefinition::input("image", PortType::Image).with_description("Input image"))
            .output(PortDefinition::output("image", PortType::Image).with_description("Grayscale image"))
            .build()
    }

    fn validate(&self, _ctx: &ValidationContext) -> Result<(), ValidationError> {
        Ok(())
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), ExecutionError> {
        let gray = to_gray(input_image(ctx, "image")?);
        ctx.set_output_image("image", ImageValue::new(DynamicImage::ImageLuma8(gray)));
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn FilterNode> {
        Box::new(self.clone())
    }
}

/// Luma conversion with BT.601 weights. Grayscale input is returned as is.
pub fn to_gray(image: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = image {
        return gray.clone();
    }

    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        Luma([luma.round().clamp(0.0, 255.0) as u8])
    })
}
