//! Enhancement and emboss kernel construction.
//!
//! Both families are square, odd-sized and built deterministically from
//! `(size, intensity)`. A non-positive intensity yields `None`, which the
//! pipeline reads as "skip this stage".

use crate::core::error::KernelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported kernel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KernelSize {
    #[default]
    Three,
    Five,
    Seven,
}

impl KernelSize {
    /// All supported sizes, smallest first.
    pub const ALL: [KernelSize; 3] = [KernelSize::Three, KernelSize::Five, KernelSize::Seven];

    /// Map a slider selector to a size: `size = 2 * selector + 3`.
    pub fn from_selector(selector: i64) -> Result<Self, KernelError> {
        match selector {
            0 => Ok(KernelSize::Three),
            1 => Ok(KernelSize::Five),
            2 => Ok(KernelSize::Seven),
            other => Err(KernelError::InvalidSelector(other)),
        }
    }

    /// Validate a raw kernel dimension.
    pub fn from_size(size: usize) -> Result<Self, KernelError> {
        match size {
            3 => Ok(KernelSize::Three),
            5 => Ok(KernelSize::Five),
            7 => Ok(KernelSize::Seven),
            other => Err(KernelError::UnsupportedSize(other)),
        }
    }

    /// Side length of the kernel.
    pub fn size(self) -> usize {
        match self {
            KernelSize::Three => 3,
            KernelSize::Five => 5,
            KernelSize::Seven => 7,
        }
    }

    /// Slider position that selects this size.
    pub fn selector(self) -> i64 {
        (self.size() as i64 - 3) / 2
    }

    /// Distance from the anchor to the kernel edge.
    pub fn radius(self) -> usize {
        self.size() / 2
    }
}

impl fmt::Display for KernelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.size())
    }
}

/// A square matrix of convolution weights, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: KernelSize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Build a kernel by evaluating `f(row, col)` for every cell.
    pub fn from_fn(size: KernelSize, f: impl Fn(usize, usize) -> f32) -> Self {
        let n = size.size();
        let weights = (0..n * n).map(|i| f(i / n, i % n)).collect();
        Self { size, weights }
    }

    /// Kernel size.
    pub fn size(&self) -> KernelSize {
        self.size
    }

    /// Side length.
    pub fn dim(&self) -> usize {
        self.size.size()
    }

    /// Weight at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.weights[row * self.dim() + col]
    }

    /// Weight at the anchor.
    pub fn center(&self) -> f32 {
        let r = self.size.radius();
        self.get(r, r)
    }

    /// Row-major weights.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.weights.chunks_exact(self.dim())
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let cells: Vec<String> = row.iter().map(|w| format!("{:>6}", w)).collect();
            writeln!(f, "[{}]", cells.join(" "))?;
        }
        Ok(())
    }
}

/// Enhancement intensity factor for a raw slider value (0..=100 maps to 0.0..=2.0).
pub fn enhancement_factor(intensity: i64) -> f32 {
    intensity as f32 / 50.0
}

/// Build a sharpening kernel.
///
/// Every off-center weight is -1 and the center is `1 + (n² - 1) * factor`,
/// so the weights always sum to `1 + (n² - 1) * (factor - 1)`.
pub fn build_enhancement_kernel(size: KernelSize, factor: f32) -> Option<Kernel> {
    if factor <= 0.0 {
        return None;
    }

    let n = size.size();
    let c = size.radius();
    let center = 1.0 + (n * n - 1) as f32 * factor;

    Some(Kernel::from_fn(size, |row, col| {
        if row == c && col == c {
            center
        } else {
            -1.0
        }
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tap {
    Neg,
    Zero,
    One,
    Pos,
}

use Tap::{Neg as N, One as I, Pos as P, Zero as Z};

// Reproduced cell for cell; it does not follow the 3x3/5x5 column rule
// and its center is 0.
const EMBOSS_7X7: [[Tap; 7]; 7] = [
    [N, N, N, Z, P, P, P],
    [N, N, N, Z, P, P, P],
    [N, N, N, I, P, P, P],
    [N, N, Z, Z, Z, P, P],
    [N, N, P, I, P, P, P],
    [N, P, P, P, P, P, P],
    [P, P, P, P, P, P, P],
];

fn emboss_tap(size: KernelSize, row: usize, col: usize) -> Tap {
    if size == KernelSize::Seven {
        return EMBOSS_7X7[row][col];
    }

    let c = size.radius();
    if col < c {
        Tap::Neg
    } else if col > c {
        Tap::Pos
    } else if row == c {
        Tap::One
    } else {
        Tap::Zero
    }
}

/// Build a directional emboss kernel of magnitude `intensity`.
///
/// For 3x3 and 5x5, columns left of the anchor weigh `-intensity`, columns
/// right of it `+intensity`, and the center column is zero except for a 1 at
/// the anchor. The 7x7 layout is a fixed table.
pub fn build_emboss_kernel(size: KernelSize, intensity: i32) -> Option<Kernel> {
    if intensity <= 0 {
        return None;
    }

    let m = intensity as f32;
    Some(Kernel::from_fn(size, |row, col| match emboss_tap(size, row, col) {
        Tap::Neg => -m,
        Tap::Zero => 0.0,
        Tap::One => 1.0,
        Tap::Pos => m,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_selector_mapping() {
        assert_eq!(KernelSize::from_selector(0).unwrap().size(), 3);
        assert_eq!(KernelSize::from_selector(1).unwrap().size(), 5);
        assert_eq!(KernelSize::from_selector(2).unwrap().size(), 7);
        assert_eq!(KernelSize::from_selector(3), Err(KernelError::InvalidSelector(3)));
        assert_eq!(KernelSize::from_selector(-1), Err(KernelError::InvalidSelector(-1)));

        for size in KernelSize::ALL {
            assert_eq!(KernelSize::from_selector(size.selector()), Ok(size));
        }
    }

    #[test]
    fn test_unsupported_sizes_rejected() {
        for bad in [0, 1, 2, 4, 6, 8, 9] {
            assert_eq!(KernelSize::from_size(bad), Err(KernelError::UnsupportedSize(bad)));
        }
    }

    #[test]
    fn test_enhancement_center_formula() {
        let factor = enhancement_factor(100);
        assert_eq!(factor, 2.0);

        for (size, expected) in [
            (KernelSize::Three, 17.0),
            (KernelSize::Five, 49.0),
            (KernelSize::Seven, 97.0),
        ] {
            let kernel = build_enhancement_kernel(size, factor).unwrap();
            assert_eq!(kernel.dim(), size.size());
            assert_eq!(kernel.weights().len(), size.size() * size.size());
            assert_eq!(kernel.center(), expected);

            let off_center = kernel.weights().iter().filter(|&&w| w == -1.0).count();
            assert_eq!(off_center, size.size() * size.size() - 1);
        }
    }

    #[test]
    fn test_zero_intensity_skips() {
        for size in KernelSize::ALL {
            assert!(build_enhancement_kernel(size, 0.0).is_none());
            assert!(build_enhancement_kernel(size, -0.5).is_none());
            assert!(build_emboss_kernel(size, 0).is_none());
            assert!(build_emboss_kernel(size, -3).is_none());
        }
    }

    #[test]
    fn test_emboss_3x3_layout() {
        let kernel = build_emboss_kernel(KernelSize::Three, 2).unwrap();
        let expected = [-2.0, 0.0, 2.0, -2.0, 1.0, 2.0, -2.0, 0.0, 2.0];
        assert_eq!(kernel.weights(), &expected);
    }

    #[test]
    fn test_emboss_center_and_magnitudes() {
        for size in [KernelSize::Three, KernelSize::Five] {
            for intensity in 1..=7 {
                let kernel = build_emboss_kernel(size, intensity).unwrap();
                let c = size.radius();
                assert_eq!(kernel.center(), 1.0);

                for row in 0..size.size() {
                    for col in 0..size.size() {
                        let w = kernel.get(row, col);
                        if (row, col) == (c, c) || w == 0.0 {
                            continue;
                        }
                        assert_eq!(w.abs(), intensity as f32, "{} at ({}, {})", size, row, col);
                        assert_eq!(w < 0.0, col < c);
                    }
                }
            }
        }
    }

    #[test]
    fn test_emboss_7x7_literal_table() {
        let kernel = build_emboss_kernel(KernelSize::Seven, 3).unwrap();
        let expected: [[f32; 7]; 7] = [
            [-3.0, -3.0, -3.0, 0.0, 3.0, 3.0, 3.0],
            [-3.0, -3.0, -3.0, 0.0, 3.0, 3.0, 3.0],
            [-3.0, -3.0, -3.0, 1.0, 3.0, 3.0, 3.0],
            [-3.0, -3.0, 0.0, 0.0, 0.0, 3.0, 3.0],
            [-3.0, -3.0, 3.0, 1.0, 3.0, 3.0, 3.0],
            [-3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0],
            [3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0],
        ];

        for (row, expected_row) in kernel.rows().zip(expected.iter()) {
            assert_eq!(row, expected_row);
        }
        assert_eq!(kernel.center(), 0.0);
    }

    #[test]
    fn test_kernel_display() {
        let kernel = build_emboss_kernel(KernelSize::Three, 1).unwrap();
        let text = kernel.to_string();
        assert_eq!(text.lines().count(), 3);
        assert_eq!(KernelSize::Five.to_string(), "5x5");
    }

    proptest! {
        #[test]
        fn enhancement_center_is_monotonic(a in 1i64..=100, b in 1i64..=100, selector in 0i64..=2) {
            let size = KernelSize::from_selector(selector).unwrap();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let k_lo = build_enhancement_kernel(size, enhancement_factor(lo)).unwrap();
            let k_hi = build_enhancement_kernel(size, enhancement_factor(hi)).unwrap();
            prop_assert!(k_lo.center() <= k_hi.center());
            if lo < hi {
                prop_assert!(k_lo.center() < k_hi.center());
            }
        }

        #[test]
        fn kernels_are_odd_and_sized(selector in 0i64..=2, enhance in 1i64..=100, emboss in 1i32..=7) {
            let size = KernelSize::from_selector(selector).unwrap();
            let enh = build_enhancement_kernel(size, enhancement_factor(enhance)).unwrap();
            let emb = build_emboss_kernel(size, emboss).unwrap();
            prop_assert_eq!(enh.dim() % 2, 1);
            prop_assert_eq!(emb.dim(), size.size());
            prop_assert_eq!(enh.rows().count(), size.size());
        }
    }
}
