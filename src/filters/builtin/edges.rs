//! Edge preview filter.

use super::color::to_gray;
use super::input_image;
use crate::config::{APERTURE_MAX, SIGMA_MAX, THRESHOLD_MAX};
use crate::core::context::{ExecutionContext, ValidationContext};
use crate::core::error::{ExecutionError, ValidationError};
use crate::core::node::{Category, FilterNode, NodeMetadata};
use crate::core::port::{ParameterDefinition, PortDefinition};
use crate::core::types::{ImageValue, PortType};
use crate::effects::edges::{edge_preview, EdgeParameters};
use crate::effects::label::bundled_font;
use crate::filters::registry::FilterRegistry;
use ab_glyph::FontArc;
use image::DynamicImage;
use log::error;

/// Register edge filters. The registered preview labels with the bundled font.
pub fn register(registry: &mut FilterRegistry) {
    match bundled_font() {
        Ok(font) => registry.register(move || Box::new(EdgePreview::new(font.clone()))),
        Err(e) => error!("edge_preview not registered: {}", e),
    }
}

/// Blurs a grayscale image and runs Canny on it, with a label naming the
/// gradient norm in use.
#[derive(Clone)]
pub struct EdgePreview {
    font: FontArc,
}

impl EdgePreview {
    /// Create the filter with its label font.
    pub fn new(font: FontArc) -> Self {
        Self { font }
    }
}

impl FilterNode for EdgePreview {
    fn metadata(&self) -> NodeMetadata {
        NodeMetadata::builder("edge_preview", "Edge Preview")
            .description("Gaussian blur followed by Canny edge detection")
            .category(Category::Edge)
            .input(PortDefinition::input("image", PortType::Image).with_description("Input image, converted to grayscale"))
            .output(PortDefinition::output("image", PortType::Image).with_description("Edge map, or the blur when both thresholds are 0"))
            .parameter(
                ParameterDefinition::slider("sigma", 2, SIGMA_MAX)
                    .with_display_name("Sigma")
                    .with_description("Blur standard deviation; values below 1 use 1"),
            )
            .parameter(
                ParameterDefinition::slider("threshold1", 20, THRESHOLD_MAX)
                    .with_display_name("Threshold1")
                    .with_description("First hysteresis threshold"),
            )
            .parameter(
                ParameterDefinition::slider("threshold2", 60, THRESHOLD_MAX)
                    .with_display_name("Threshold2")
                    .with_description("Second hysteresis threshold"),
            )
            .parameter(
                ParameterDefinition::slider("aperture", 0, APERTURE_MAX)
                    .with_display_name("Aperture")
                    .with_description("Sobel aperture selector: 0, 1, 2 for 3, 5, 7"),
            )
            .parameter(
                ParameterDefinition::slider("l2_gradient", 0, 1)
                    .with_display_name("L2gradient")
                    .with_description("Use the L2 gradient norm instead of L1"),
            )
            .build()
    }

    fn validate(&self, ctx: &ValidationContext) -> Result<(), ValidationError> {
        EdgeParameters::new(
            ctx.get_integer("sigma")?,
            ctx.get_integer("threshold1")?,
            ctx.get_integer("threshold2")?,
            ctx.get_integer("aperture")?,
            ctx.get_integer("l2_gradient")?,
        )
        .map(|_| ())
        .map_err(|e| ValidationError::CustomValidation {
            filter: ctx.filter.clone(),
            error: e.to_string(),
        })
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), ExecutionError> {
        let params = EdgeParameters::new(
            ctx.get_integer("sigma")?,
            ctx.get_integer("threshold1")?,
            ctx.get_integer("threshold2")?,
            ctx.get_integer("aperture")?,
            ctx.get_integer("l2_gradient")?,
        )?;

        let gray = to_gray(input_image(ctx, "image")?);
        let preview = edge_preview(&gray, &params, &self.font);
        ctx.set_output_image("image", ImageValue::new(DynamicImage::ImageLuma8(preview)));
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn FilterNode> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Value;
    use image::{GrayImage, Luma};

    fn preview() -> EdgePreview {
        EdgePreview::new(bundled_font().unwrap())
    }

    fn context(threshold1: i64, threshold2: i64) -> ExecutionContext {
        let img = GrayImage::from_fn(32, 24, |x, _| Luma([if x >= 16 { 220 } else { 10 }]));
        let mut ctx = ExecutionContext::new("edge_preview");
        ctx.add_input("image", Value::Image(ImageValue::new(DynamicImage::ImageLuma8(img))));
        for (name, value) in [
            ("sigma", 1),
            ("threshold1", threshold1),
            ("threshold2", threshold2),
            ("aperture", 0),
            ("l2_gradient", 0),
        ] {
            ctx.add_parameter(name, Value::Integer(value));
        }
        ctx
    }

    #[test]
    fn test_metadata_defaults() {
        let metadata = preview().metadata();
        let defaults: Vec<_> = metadata
            .sliders()
            .map(|p| (p.name.as_str(), p.default_value.as_integer()))
            .collect();
        assert_eq!(
            defaults,
            vec![
                ("sigma", Some(2)),
                ("threshold1", Some(20)),
                ("threshold2", Some(60)),
                ("aperture", Some(0)),
                ("l2_gradient", Some(0)),
            ]
        );
    }

    #[test]
    fn test_edges_are_binary() {
        let mut ctx = context(20, 60);
        preview().execute(&mut ctx).unwrap();
        let out = ctx.take_output("image").unwrap();
        let out = out.as_image().unwrap().get_image().unwrap().to_luma8();
        assert!(out.as_raw().iter().all(|&v| v == 0 || v == 255));
        assert!(out.as_raw().iter().any(|&v| v == 255));
    }

    #[test]
    fn test_zero_thresholds_give_blur() {
        let mut ctx = context(0, 0);
        preview().execute(&mut ctx).unwrap();
        let out = ctx.take_output("image").unwrap();
        let out = out.as_image().unwrap().get_image().unwrap().to_luma8();
        // The blurred step has intermediate values near the boundary.
        assert!(out.as_raw().iter().any(|&v| v != 10 && v != 220 && v != 0 && v != 255));
    }

    #[test]
    fn test_label_drawn_below_tall_frames() {
        let img = GrayImage::from_pixel(160, 64, Luma([0]));
        let mut ctx = ExecutionContext::new("edge_preview");
        ctx.add_input("image", Value::Image(ImageValue::new(DynamicImage::ImageLuma8(img))));
        for (name, value) in [("sigma", 2), ("threshold1", 20), ("threshold2", 60), ("aperture", 0), ("l2_gradient", 1)] {
            ctx.add_parameter(name, Value::Integer(value));
        }

        preview().execute(&mut ctx).unwrap();
        let out = ctx.take_output("image").unwrap();
        let out = out.as_image().unwrap().get_image().unwrap().to_luma8();
        assert!(out.enumerate_pixels().any(|(x, y, p)| p[0] > 0 && x >= 10 && y < 40));
        assert!(out.enumerate_pixels().all(|(_, y, p)| p[0] == 0 || (20..48).contains(&y)));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut ctx = context(20, 101);
        assert!(matches!(
            preview().execute(&mut ctx),
            Err(ExecutionError::Kernel(_))
        ));
    }
}
