//! # slidefx - Slider-driven convolution filters
//!
//! slidefx runs an image through a small set of filter nodes whose integer
//! parameters behave like trackbars. Moving a trackbar re-runs its node over
//! the window's base image and shows the new frame.
//!
//! ## Features
//!
//! - **Kernel-parameterized effects**: an edge-enhancement kernel followed by
//!   an emboss kernel, both 3x3, 5x5 or 7x7
//! - **Edge preview**: Gaussian blur plus Canny with selectable aperture and
//!   gradient norm, labelled in the frame
//! - **Headless windows**: frames go to memory or to a preview directory
//! - **Extensible**: new filters implement the [`FilterNode`](core::node::FilterNode) trait
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use slidefx::prelude::*;
//!
//! let image = ImageValue::from_path("walt.jpg")?;
//! let mut display = HeadlessDisplay::new();
//!
//! let mut window = TrackbarWindow::new("Filter Effects", Box::new(FilterEffects), image);
//! window.set_trackbar("enhance", 60, &mut display)?;
//! window.set_trackbar("emboss", 3, &mut display)?;
//!
//! let frame = display.frame("Filter Effects").unwrap();
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: value types, node trait, contexts and errors
//! - [`effects`]: kernels, convolution, the filter pipeline and edge preview
//! - [`filters`]: filter registry and built-in filter nodes
//! - [`window`]: trackbar windows and display sinks
//! - [`config`]: TOML configuration and trackbar limits
//! - [`app`]: the demo sequence driven by a configuration

#![warn(clippy::all)]

pub mod app;
pub mod config;
pub mod core;
pub mod effects;
pub mod filters;
pub mod window;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use slidefx::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{ImageFormat, ImageMetadata, ImageValue, PortType, Value};

    // Node traits and types
    pub use crate::core::node::{Category, FilterNode, NodeMetadata};

    // Port definitions
    pub use crate::core::port::{Constraint, ParameterDefinition, PortDefinition, UiHint};

    // Contexts
    pub use crate::core::context::{ExecutionContext, ValidationContext};

    // Errors
    pub use crate::core::error::{
        ConfigError, DisplayError, ExecutionError, KernelError, SlideFxError, SlideFxResult,
        ValidationError,
    };

    // Effects
    pub use crate::effects::{
        apply, bundled_font, canny, edge_map, edge_preview, EdgeParameters, FilterParameters, Kernel,
        KernelSize,
    };

    // Windows
    pub use crate::window::{
        run_filter, Display, HeadlessDisplay, PreviewDirDisplay, Tee, TrackbarWindow,
    };

    // Filters
    pub use crate::filters::registry::{FilterFactory, FilterRegistry, RegistryEntry};
    pub use crate::filters::builtin::{
        EdgePreview, FilterEffects, Flip, FlipMode, GaussianBlur, Grayscale, LoadImage, SaveImage,
    };
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "slidefx");
    }

    #[test]
    fn test_registry_with_builtins() {
        let registry = FilterRegistry::with_builtins();
        assert!(registry.contains("filter_effects"));
        assert!(registry.contains("edge_preview"));
        assert!(registry.contains("flip"));
    }
}
