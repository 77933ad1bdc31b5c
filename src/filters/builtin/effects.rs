//! Enhancement and emboss filter.

use super::input_image;
use crate::config::{EMBOSS_MAX, ENHANCE_MAX, KERNEL_SIZE_MAX};
use crate::core::context::{ExecutionContext, ValidationContext};
use crate::core::error::{ExecutionError, ValidationError};
use crate::core::node::{Category, FilterNode, NodeMetadata};
use crate::core::port::{ParameterDefinition, PortDefinition};
use crate::core::types::{ImageValue, PortType};
use crate::effects::pipeline::{apply, FilterParameters};
use crate::filters::registry::FilterRegistry;
use log::info;

/// Register effect filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|| Box::new(FilterEffects));
}

/// Sharpens and then embosses an image with kernels sized by a slider.
#[derive(Debug, Clone)]
pub struct FilterEffects;

impl FilterNode for FilterEffects {
    fn metadata(&self) -> NodeMetadata {
        NodeMetadata::builder("filter_effects", "Filter Effects")
            .description("Enhance edges with a sharpening kernel, then emboss")
            .category(Category::Effects)
            .input(PortDefinition::input("image", PortType::Image).with_description("Input image"))
            .output(PortDefinition::output("image", PortType::Image).with_description("Filtered image"))
            .parameter(
                ParameterDefinition::slider("enhance", 0, ENHANCE_MAX)
                    .with_display_name("Enhance Edges")
                    .with_description("Sharpening strength; applied above 25"),
            )
            .parameter(
                ParameterDefinition::slider("emboss", 0, EMBOSS_MAX)
                    .with_display_name("Emboss Edges")
                    .with_description("Emboss kernel magnitude; 0 disables"),
            )
            .parameter(
                ParameterDefinition::slider("kernel_size", 0, KERNEL_SIZE_MAX)
                    .with_display_name("Kernel Size")
                    .with_description("Kernel size selector: 0, 1, 2 for 3x3, 5x5, 7x7"),
            )
            .build()
    }

    fn validate(&self, ctx: &ValidationContext) -> Result<(), ValidationError> {
        FilterParameters::new(
            ctx.get_integer("kernel_size")?,
            ctx.get_integer("enhance")?,
            ctx.get_integer("emboss")?,
        )
        .map(|_| ())
        .map_err(|e| ValidationError::CustomValidation {
            filter: ctx.filter.clone(),
            error: e.to_string(),
        })
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), ExecutionError> {
        let params = FilterParameters::new(
            ctx.get_integer("kernel_size")?,
            ctx.get_integer("enhance")?,
            ctx.get_integer("emboss")?,
        )?;
        info!("Kernel size: {}", params.kernel_size().size());

        let filtered = apply(input_image(ctx, "image")?, &params);
        ctx.set_output_image("image", ImageValue::new(filtered));
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
    use image::{DynamicImage, Rgb, RgbImage};

    fn context(enhance: i64, emboss: i64, kernel_size: i64) -> ExecutionContext {
        let img = RgbImage::from_fn(12, 10, |x, y| Rgb([(x * 20) as u8, (y * 25) as u8, 90]));
        let mut ctx = ExecutionContext::new("filter_effects");
        ctx.add_input("image", Value::Image(ImageValue::new(DynamicImage::ImageRgb8(img))));
        ctx.add_parameter("enhance", Value::Integer(enhance));
        ctx.add_parameter("emboss", Value::Integer(emboss));
        ctx.add_parameter("kernel_size", Value::Integer(kernel_size));
        ctx
    }

    fn run(ctx: &mut ExecutionContext) -> Vec<u8> {
        FilterEffects.execute(ctx).unwrap();
        let out = ctx.take_output("image").unwrap();
        out.as_image().unwrap().get_image().unwrap().as_bytes().to_vec()
    }

    #[test]
    fn test_metadata_sliders() {
        let metadata = FilterEffects.metadata();
        let sliders: Vec<_> = metadata
            .sliders()
            .map(|p| (p.display_name.as_str(), p.slider_range()))
            .collect();
        assert_eq!(
            sliders,
            vec![
                ("Enhance Edges", Some((0, 100))),
                ("Emboss Edges", Some((0, 7))),
                ("Kernel Size", Some((0, 2))),
            ]
        );
    }

    #[test]
    fn test_zero_sliders_pass_through() {
        let mut ctx = context(0, 0, 0);
        let input = ctx.get_input_image("image").unwrap().get_image().unwrap().as_bytes().to_vec();
        assert_eq!(run(&mut ctx), input);
    }

    #[test]
    fn test_sliders_change_output() {
        let mut ctx = context(100, 3, 0);
        let input = ctx.get_input_image("image").unwrap().get_image().unwrap().as_bytes().to_vec();
        assert_ne!(run(&mut ctx), input);
    }

    #[test]
    fn test_bad_selector_is_an_error() {
        let mut ctx = context(0, 0, 3);
        assert!(matches!(
            FilterEffects.execute(&mut ctx),
            Err(ExecutionError::Kernel(_))
        ));

        let mut vctx = ValidationContext::new("filter_effects");
        vctx.add_parameter("enhance", Value::Integer(0));
        vctx.add_parameter("emboss", Value::Integer(9));
        vctx.add_parameter("kernel_size", Value::Integer(0));
        assert!(FilterEffects.validate(&vctx).is_err());
    }
}
