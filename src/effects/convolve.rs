//! Square-kernel 2D filtering with reflect-101 borders.
//!
//! This matches a `filter2D` call with output depth equal to input depth:
//! the kernel is correlated (not flipped) with its anchor at the center,
//! every channel is filtered on its own, and each sum is rounded half to
//! even and saturated to `u8`.

use crate::effects::kernel::Kernel;
use image::{DynamicImage, ImageBuffer, Pixel};
use rayon::prelude::*;

/// Filter a dynamic image, keeping its channel layout where possible.
///
/// 8-bit luma, luma-alpha, RGB and RGBA buffers are filtered natively.
/// Any other layout is converted to 8-bit RGB (or RGBA when it carries
/// alpha) first.
pub fn filter2d(image: &DynamicImage, kernel: &Kernel) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(buf) => DynamicImage::ImageLuma8(filter_buffer(buf, kernel)),
        DynamicImage::ImageLumaA8(buf) => DynamicImage::ImageLumaA8(filter_buffer(buf, kernel)),
        DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(filter_buffer(buf, kernel)),
        DynamicImage::ImageRgba8(buf) => DynamicImage::ImageRgba8(filter_buffer(buf, kernel)),
        other if other.color().has_alpha() => {
            DynamicImage::ImageRgba8(filter_buffer(&other.to_rgba8(), kernel))
        }
        other => DynamicImage::ImageRgb8(filter_buffer(&other.to_rgb8(), kernel)),
    }
}

/// Filter an 8-bit image buffer with a square kernel.
pub fn filter_buffer<P>(src: &ImageBuffer<P, Vec<u8>>, kernel: &Kernel) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8> + Send + Sync,
{
    let (width, height) = src.dimensions();
    let mut dst = ImageBuffer::<P, Vec<u8>>::new(width, height);
    if width == 0 || height == 0 {
        return dst;
    }

    let w = width as usize;
    let h = height as usize;
    let channels = P::CHANNEL_COUNT as usize;
    let stride = w * channels;
    let n = kernel.dim();
    let radius = kernel.size().radius() as isize;

    // Border lookups are resolved once per axis instead of per tap.
    let cols = border_table(w, n, radius);
    let rows = border_table(h, n, radius);

    let src_raw: &[u8] = src.as_raw();
    let weights = kernel.weights();
    let out: &mut [u8] = &mut dst;

    out.par_chunks_mut(stride).enumerate().for_each(|(y, out_row)| {
        let row_taps = &rows[y * n..(y + 1) * n];
        for x in 0..w {
            let col_taps = &cols[x * n..(x + 1) * n];
            for c in 0..channels {
                let mut acc = 0.0f32;
                for (ky, &sy) in row_taps.iter().enumerate() {
                    let src_row = &src_raw[sy * stride..(sy + 1) * stride];
                    let k_row = &weights[ky * n..(ky + 1) * n];
                    for (&k, &sx) in k_row.iter().zip(col_taps) {
                        acc += k * src_row[sx * channels + c] as f32;
                    }
                }
                out_row[x * channels + c] = saturate_u8(acc);
            }
        }
    });

    dst
}

/// Source index for every (position, tap) pair along one axis.
fn border_table(len: usize, n: usize, radius: isize) -> Vec<usize> {
    (0..len)
        .flat_map(|i| (0..n).map(move |k| reflect101(i as isize + k as isize - radius, len)))
        .collect()
}

/// Reflect an out-of-range index without repeating the edge sample
/// (`gfedcb|abcdefgh|gfedcba`).
pub(crate) fn reflect101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }

    let len = len as isize;
    let mut i = index;
    loop {
        if i < 0 {
            i = -i;
        } else if i >= len {
            i = 2 * len - 2 - i;
        } else {
            return i as usize;
        }
    }
}

fn saturate_u8(value: f32) -> u8 {
    value.round_ties_even().clamp(0.0, 255.0) as u8
}
