//! Built-in filter implementations.

mod io;
mod blur;
mod color;
mod transform;
mod effects;
mod edges;

use crate::core::context::ExecutionContext;
use crate::core::error::ExecutionError;
use crate::filters::registry::FilterRegistry;
use image::DynamicImage;

/// Register all built-in filters.
pub fn register_all(registry: &mut FilterRegistry) {
    io::register(registry);
    transform::register(registry);
    color::register(registry);
    blur::register(registry);
    effects::register(registry);
    edges::register(registry);
}

// Re-export for direct access
pub use io::{save, LoadImage, SaveImage};
pub use blur::{blur, GaussianBlur};
pub use color::{to_gray, Grayscale};
pub use transform::{Flip, FlipMode};
pub use effects::FilterEffects;
pub use edges::EdgePreview;

/// Pixel data of an image input.
pub(crate) fn input_image<'a>(
    ctx: &'a ExecutionContext,
    name: &str,
) -> Result<&'a DynamicImage, ExecutionError> {
    ctx.get_input_image(name)?
        .get_image()
        .ok_or_else(|| ExecutionError::NodeExecution {
            filter: ctx.filter.clone(),
            error: format!("Input '{}' has no pixel data", name),
        })
}
