//! Image I/O filters: LoadImage, SaveImage

use super::input_image;
use crate::core::context::{ExecutionContext, ValidationContext};
use crate::core::error::{ExecutionError, ValidationError};
use crate::core::node::{Category, FilterNode, NodeMetadata};
use crate::core::port::{Constraint, ParameterDefinition, PortDefinition, UiHint};
use crate::core::types::{ImageFormat, ImageValue, PortType, Value};
use crate::filters::registry::FilterRegistry;
use image::DynamicImage;
use log::info;
use std::path::Path;

const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "tiff", "tif", "webp"];

/// Register I/O filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|| Box::new(LoadImage));
    registry.register(|| Box::new(SaveImage));
}

fn file_filters() -> UiHint {
    UiHint::FileChooser {
        filters: IMAGE_EXTENSIONS.iter().map(|ext| format!("*.{}", ext)).collect(),
    }
}

fn check_extension(ctx: &ValidationContext, path: &str) -> Result<(), ValidationError> {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(ValidationError::CustomValidation {
            filter: ctx.filter.clone(),
            error: format!("Unsupported image format: '{}'", extension),
        })
    }
}

/// Loads an image from disk.
#[derive(Debug, Clone)]
pub struct LoadImage;

impl FilterNode for LoadImage {
    fn metadata(&self) -> NodeMetadata {
        NodeMetadata::builder("load_image", "Load Image")
            .description("Load an image from a file path")
            .category(Category::Input)
            .output(PortDefinition::output("image", PortType::Image).with_description("The loaded image"))
            .parameter(
                ParameterDefinition::new("path", PortType::String, Value::String(String::new()))
                    .with_description("Path to the image file")
                    .with_ui_hint(file_filters())
                    .with_constraint(Constraint::NotEmpty),
            )
            .build()
    }

    fn validate(&self, ctx: &ValidationContext) -> Result<(), ValidationError> {
        let path = ctx.get_string("path").unwrap_or("");

        if path.is_empty() {
            return Err(ValidationError::ConstraintViolation {
                filter: ctx.filter.clone(),
                parameter: "path".to_string(),
                error: "Path cannot be empty".to_string(),
            });
        }

        if !Path::new(path).is_file() {
            return Err(ValidationError::ResourceNotFound {
                filter: ctx.filter.clone(),
                resource: path.to_string(),
            });
        }

        check_extension(ctx, path)
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), ExecutionError> {
        let path = ctx.get_string("path")?.to_string();

        let image = ImageValue::from_path(&path).map_err(|source| ExecutionError::ImageDecode {
            path: path.clone().into(),
            source,
        })?;
        info!(
            "Loaded {} ({}x{}, {} channels)",
            path, image.metadata.width, image.metadata.height, image.metadata.channels
        );

        ctx.set_output_image("image", image);
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn FilterNode> {
        Box::new(self.clone())
    }
}

/// Writes its input to disk and passes it through.
#[derive(Debug, Clone)]
pub struct SaveImage;

impl FilterNode for SaveImage {
    fn metadata(&self) -> NodeMetadata {
        NodeMetadata::builder("save_image", "Save Image")
            .description("Save an image; the format follows the file extension")
            .category(Category::Output)
            .input(PortDefinition::input("image", PortType::Image).with_description("The image to save"))
            .output(PortDefinition::output("image", PortType::Image).with_description("The saved image, unchanged"))
            .parameter(
                ParameterDefinition::new("path", PortType::String, Value::String(String::new()))
                    .with_description("Destination file")
                    .with_ui_hint(file_filters())
                    .with_constraint(Constraint::NotEmpty),
            )
            .build()
    }

    fn validate(&self, ctx: &ValidationContext) -> Result<(), ValidationError> {
        let path = ctx.get_string("path")?;
        check_extension(ctx, path)
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), ExecutionError> {
        let path = ctx.get_string("path")?.to_string();
        let image = input_image(ctx, "image")?;

        save(image, Path::new(&path)).map_err(|e| ExecutionError::NodeExecution {
            filter: ctx.filter.clone(),
            error: format!("Failed to save '{}': {}", path, e),
        })?;
        info!("Wrote {}", path);

        let passthrough = ctx.get_input_image("image")?.clone();
        ctx.set_output_image("image", passthrough);
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn FilterNode> {
        Box::new(self.clone())
    }
}

/// Save an image, dropping alpha for formats that cannot store it.
pub fn save(image: &DynamicImage, path: &Path) -> Result<(), image::ImageError> {
    if ImageFormat::from_path(path) == ImageFormat::Jpeg && image.color().has_alpha() {
        DynamicImage::ImageRgb8(image.to_rgb8()).save(path)
    } else {
        image.save(path)
    }
}
