//! Two-stage enhancement-then-emboss pipeline.

use crate::config::{EMBOSS_MAX, ENHANCE_MAX};
use crate::core::error::KernelError;
use crate::effects::convolve::filter2d;
use crate::effects::kernel::{
    build_emboss_kernel, build_enhancement_kernel, enhancement_factor, KernelSize,
};
use image::DynamicImage;
use log::debug;
use serde::{Deserialize, Serialize};

/// The enhancement stage runs only when its factor exceeds this value,
/// i.e. for raw intensities above 25.
pub const ENHANCE_THRESHOLD: f32 = 0.5;

/// Validated slider positions for one recompute.
///
/// Deserialization goes through [`FilterParameters::new`], so a value read
/// from JSON or TOML is range-checked like a slider position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "RawFilterParameters")]
pub struct FilterParameters {
    kernel_size: KernelSize,
    enhancement_intensity: i64,
    emboss_intensity: i64,
}

#[derive(Deserialize)]
struct RawFilterParameters {
    kernel_size: KernelSize,
    enhancement_intensity: i64,
    emboss_intensity: i64,
}

impl TryFrom<RawFilterParameters> for FilterParameters {
    type Error = KernelError;

    fn try_from(raw: RawFilterParameters) -> Result<Self, Self::Error> {
        Self::new(raw.kernel_size.selector(), raw.enhancement_intensity, raw.emboss_intensity)
    }
}

impl FilterParameters {
    /// Build parameters from raw slider positions.
    ///
    /// The selector must be 0, 1 or 2; enhancement must lie in
    /// `[0, ENHANCE_MAX]` and emboss in `[0, EMBOSS_MAX]`.
    pub fn new(
        kernel_size_selector: i64,
        enhancement_intensity: i64,
        emboss_intensity: i64,
    ) -> Result<Self, KernelError> {
        let kernel_size = KernelSize::from_selector(kernel_size_selector)?;
        check_range("enhancement intensity", enhancement_intensity, ENHANCE_MAX)?;
        check_range("emboss intensity", emboss_intensity, EMBOSS_MAX)?;

        Ok(Self {
            kernel_size,
            enhancement_intensity,
            emboss_intensity,
        })
    }

    /// Kernel size shared by both stages.
    pub fn kernel_size(&self) -> KernelSize {
        self.kernel_size
    }

    /// Raw enhancement slider value.
    pub fn enhancement_intensity(&self) -> i64 {
        self.enhancement_intensity
    }

    /// Enhancement factor (`intensity / 50`).
    pub fn enhancement_factor(&self) -> f32 {
        enhancement_factor(self.enhancement_intensity)
    }

    /// Raw emboss slider value, also the emboss kernel magnitude.
    pub fn emboss_intensity(&self) -> i64 {
        self.emboss_intensity
    }
}

pub(crate) fn check_range(parameter: &'static str, value: i64, max: i64) -> Result<(), KernelError> {
    if (0..=max).contains(&value) {
        Ok(())
    } else {
        Err(KernelError::OutOfRange {
            parameter,
            value,
            max,
        })
    }
}

/// Run both stages over `image` and return a new image.
///
/// A skipped stage passes its input through untouched, so with both stages
/// skipped the output is byte-identical to the input. The function keeps no
/// state between calls.
pub fn apply(image: &DynamicImage, params: &FilterParameters) -> DynamicImage {
    let size = params.kernel_size();
    let factor = params.enhancement_factor();

    let enhanced = match build_enhancement_kernel(size, factor) {
        Some(kernel) if factor > ENHANCE_THRESHOLD => {
            debug!("enhancing with {} kernel, center {}", size, kernel.center());
            filter2d(image, &kernel)
        }
        _ => {
            debug!("enhancement skipped (factor {:.2})", factor);
            image.clone()
        }
    };

    let emboss = i32::try_from(params.emboss_intensity())
        .ok()
        .and_then(|magnitude| build_emboss_kernel(size, magnitude));
    match emboss {
        Some(kernel) => {
            debug!("embossing with {} kernel, magnitude {}", size, params.emboss_intensity());
            filter2d(&enhanced, &kernel)
        }
        None => {
            debug!("emboss skipped");
            enhanced
        }
    }
}
