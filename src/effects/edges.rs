//! Edge preview: Gaussian blur, optional Canny, and a gradient-norm label.
//!
//! Canny runs on the blurred image with a configurable Sobel aperture and
//! gradient norm. The derivative uses a replicated border; pixels outside
//! the image count as zero magnitude during non-maximum suppression, and
//! ties along a gradient direction resolve the way OpenCV's Canny does.

use crate::config::{SIGMA_MAX, THRESHOLD_MAX};
use crate::core::error::KernelError;
use crate::effects::kernel::KernelSize;
use crate::effects::label::{draw_label, gradient_label};
use crate::effects::pipeline::check_range;
use ab_glyph::FontArc;
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::filter::{gaussian_blur_f32, separable_filter};
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Sector boundaries for gradient directions: tan(22.5°) and tan(67.5°).
const TAN_22_5: f32 = 0.414_213_56;
const TAN_67_5: f32 = 2.414_213_6;

type Gradient = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Validated edge-window slider positions.
///
/// Deserialization goes through [`EdgeParameters::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEdgeParameters")]
pub struct EdgeParameters {
    sigma: i64,
    threshold1: i64,
    threshold2: i64,
    aperture: KernelSize,
    l2_gradient: bool,
}

#[derive(Deserialize)]
struct RawEdgeParameters {
    sigma: i64,
    threshold1: i64,
    threshold2: i64,
    aperture: KernelSize,
    l2_gradient: bool,
}

impl TryFrom<RawEdgeParameters> for EdgeParameters {
    type Error = KernelError;

    fn try_from(raw: RawEdgeParameters) -> Result<Self, Self::Error> {
        Self::new(
            raw.sigma,
            raw.threshold1,
            raw.threshold2,
            raw.aperture.selector(),
            i64::from(raw.l2_gradient),
        )
    }
}

impl Default for EdgeParameters {
    fn default() -> Self {
        Self {
            sigma: 2,
            threshold1: 20,
            threshold2: 60,
            aperture: KernelSize::Three,
            l2_gradient: false,
        }
    }
}

impl EdgeParameters {
    /// Build parameters from raw slider positions.
    pub fn new(
        sigma: i64,
        threshold1: i64,
        threshold2: i64,
        aperture_selector: i64,
        l2_gradient: i64,
    ) -> Result<Self, KernelError> {
        check_range("sigma", sigma, SIGMA_MAX)?;
        check_range("threshold1", threshold1, THRESHOLD_MAX)?;
        check_range("threshold2", threshold2, THRESHOLD_MAX)?;
        check_range("l2 gradient", l2_gradient, 1)?;
        let aperture = KernelSize::from_selector(aperture_selector)?;

        Ok(Self {
            sigma,
            threshold1,
            threshold2,
            aperture,
            l2_gradient: l2_gradient == 1,
        })
    }

    /// Raw sigma slider value.
    pub fn sigma(&self) -> i64 {
        self.sigma
    }

    /// Sigma actually used for blurring; never below 1.
    pub fn effective_sigma(&self) -> f32 {
        self.sigma.max(1) as f32
    }

    pub fn thresholds(&self) -> (i64, i64) {
        (self.threshold1, self.threshold2)
    }

    /// Sobel aperture used inside Canny.
    pub fn aperture(&self) -> KernelSize {
        self.aperture
    }

    pub fn l2_gradient(&self) -> bool {
        self.l2_gradient
    }

    /// Both thresholds at zero disable edge detection.
    pub fn detects_edges(&self) -> bool {
        self.threshold1 != 0 || self.threshold2 != 0
    }
}

/// Blur, detect edges, and label the result with the gradient norm.
pub fn edge_preview(gray: &GrayImage, params: &EdgeParameters, font: &FontArc) -> GrayImage {
    let mut out = edge_map(gray, params);
    draw_label(&mut out, gradient_label(params.l2_gradient()), font);
    out
}

/// The unlabelled preview: the Canny edge map, or the blurred image itself
/// when both thresholds are zero.
pub fn edge_map(gray: &GrayImage, params: &EdgeParameters) -> GrayImage {
    let sigma = params.effective_sigma();
    let blurred = if gray.width() == 0 || gray.height() == 0 {
        gray.clone()
    } else {
        gaussian_blur_f32(gray, sigma)
    };

    if params.detects_edges() {
        let (t1, t2) = params.thresholds();
        debug!(
            "canny: thresholds {}/{}, aperture {}, L2 {}",
            t1,
            t2,
            params.aperture(),
            params.l2_gradient()
        );
        canny(&blurred, t1 as f32, t2 as f32, params.aperture(), params.l2_gradient())
    } else {
        debug!("both thresholds are zero, showing blur (sigma {})", sigma);
        blurred
    }
}

/// Canny edge detection. Edges are 255 on a 0 background.
///
/// The thresholds may be given in either order; the smaller one is the
/// hysteresis low bound.
pub fn canny(
    gray: &GrayImage,
    threshold1: f32,
    threshold2: f32,
    aperture: KernelSize,
    l2_gradient: bool,
) -> GrayImage {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return GrayImage::new(width, height);
    }

    let low = threshold1.min(threshold2);
    let high = threshold1.max(threshold2);
    let w = width as usize;
    let h = height as usize;

    let (gx, gy) = sobel_gradients(gray, aperture);
    let magnitude: Vec<f32> = gx
        .par_iter()
        .zip(gy.par_iter())
        .map(|(&dx, &dy)| {
            if l2_gradient {
                (dx * dx + dy * dy).sqrt()
            } else {
                dx.abs() + dy.abs()
            }
        })
        .collect();

    let nms = non_max_suppression(w, h, &magnitude, &gx, &gy, low);
    hysteresis(w, h, &nms, low, high)
}

fn sobel_taps(aperture: KernelSize) -> (&'static [f32], &'static [f32]) {
    match aperture {
        KernelSize::Three => (&[-1.0, 0.0, 1.0], &[1.0, 2.0, 1.0]),
        KernelSize::Five => (&[-1.0, -2.0, 0.0, 2.0, 1.0], &[1.0, 4.0, 6.0, 4.0, 1.0]),
        KernelSize::Seven => (
            &[-1.0, -4.0, -5.0, 0.0, 5.0, 4.0, 1.0],
            &[1.0, 6.0, 15.0, 20.0, 15.0, 6.0, 1.0],
        ),
    }
}

/// Horizontal and vertical derivatives with a replicated border.
fn sobel_gradients(gray: &GrayImage, aperture: KernelSize) -> (Vec<f32>, Vec<f32>) {
    let (deriv, smooth) = sobel_taps(aperture);
    let src: Gradient = ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        Luma([f32::from(gray.get_pixel(x, y)[0])])
    });

    let gx = separable_filter(&src, deriv, smooth);
    let gy = separable_filter(&src, smooth, deriv);
    (gx.into_raw(), gy.into_raw())
}

fn non_max_suppression(
    w: usize,
    h: usize,
    mag: &[f32],
    gx: &[f32],
    gy: &[f32],
    low: f32,
) -> Vec<f32> {
    let at = |x: isize, y: isize| -> f32 {
        if x < 0 || y < 0 || x >= w as isize || y >= h as isize {
            0.0
        } else {
            mag[y as usize * w + x as usize]
        }
    };

    let mut out = vec![0.0f32; w * h];
    out.par_chunks_mut(w).enumerate().for_each(|(y, out_row)| {
        for x in 0..w {
            let idx = y * w + x;
            let m = mag[idx];
            if m <= low {
                continue;
            }

            let dx = gx[idx];
            let dy = gy[idx];
            let (ax, ay) = (dx.abs(), dy.abs());
            let (xi, yi) = (x as isize, y as isize);

            // The first neighbour must be strictly smaller; the second only
            // on diagonals.
            let keep = if ay < ax * TAN_22_5 {
                m > at(xi - 1, yi) && m >= at(xi + 1, yi)
            } else if ay > ax * TAN_67_5 {
                m > at(xi, yi - 1) && m >= at(xi, yi + 1)
            } else if (dx < 0.0) == (dy < 0.0) {
                m > at(xi - 1, yi - 1) && m > at(xi + 1, yi + 1)
            } else {
                m > at(xi + 1, yi - 1) && m > at(xi - 1, yi + 1)
            };

            if keep {
                out_row[x] = m;
            }
        }
    });

    out
}

fn hysteresis(w: usize, h: usize, nms: &[f32], low: f32, high: f32) -> GrayImage {
    const NONE: u8 = 0;
    const WEAK: u8 = 1;
    const STRONG: u8 = 2;

    let mut state: Vec<u8> = nms
        .iter()
        .map(|&m| {
            if m > high {
                STRONG
            } else if m > low {
                WEAK
            } else {
                NONE
            }
        })
        .collect();

    let mut stack: Vec<usize> = state
        .iter()
        .enumerate()
        .filter(|(_, &s)| s == STRONG)
        .map(|(i, _)| i)
        .collect();

    while let Some(idx) = stack.pop() {
        let (x, y) = (idx % w, idx / w);
        for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                let n = ny * w + nx;
                if state[n] == WEAK {
                    state[n] = STRONG;
                    stack.push(n);
                }
            }
        }
    }

    let pixels = state
        .into_iter()
        .map(|s| if s == STRONG { 255 } else { 0 })
        .collect();
    GrayImage::from_raw(w as u32, h as u32, pixels).unwrap_or_else(|| GrayImage::new(w as u32, h as u32))
}
