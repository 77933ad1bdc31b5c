//! Image effects driven by trackbar positions.
//!
//! - [`kernel`]: enhancement and emboss kernel builders
//! - [`convolve`]: square-kernel filtering with reflect-101 borders
//! - [`pipeline`]: the enhancement-then-emboss pipeline
//! - [`edges`]: blur plus Canny edge preview
//! - [`label`]: text overlay for the edge preview

pub mod kernel;
pub mod convolve;
pub mod pipeline;
pub mod edges;
pub mod label;

pub use kernel::{build_emboss_kernel, build_enhancement_kernel, enhancement_factor, Kernel, KernelSize};
pub use convolve::filter2d;
pub use pipeline::{apply, FilterParameters};
pub use edges::{canny, edge_map, edge_preview, EdgeParameters};
pub use label::{bundled_font, find_font, gradient_label};
