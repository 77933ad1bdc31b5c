//! Text overlay for the edge preview.

use ab_glyph::{Font, FontArc, InvalidFont, PxScale, ScaleFont};
use image::{GrayImage, Luma};
use imageproc::drawing::draw_text_mut;
use log::{debug, warn};
use std::path::Path;

/// Baseline origin of the label, in pixels from the top-left corner.
pub const LABEL_ORIGIN: (i32, i32) = (10, 40);

/// Label height in pixels.
pub const LABEL_SCALE: f32 = 16.0;

/// DejaVu Sans, used when neither a configured nor a system font loads.
static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Fonts tried when none is configured.
const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Label text for the gradient-norm flag.
pub fn gradient_label(l2_gradient: bool) -> &'static str {
    if l2_gradient {
        "L2gradient: on"
    } else {
        "L2gradient: off"
    }
}

/// Load a TrueType/OpenType font file.
pub fn load_font(path: &Path) -> Option<FontArc> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("cannot read font {}: {}", path.display(), e);
            return None;
        }
    };

    match FontArc::try_from_vec(bytes) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!("{} is not a usable font: {}", path.display(), e);
            None
        }
    }
}

/// The font compiled into the crate.
pub fn bundled_font() -> Result<FontArc, InvalidFont> {
    FontArc::try_from_slice(BUNDLED_FONT)
}

/// Find a label font: `configured` first, then the system search list,
/// then the bundled font.
pub fn find_font(configured: Option<&Path>) -> Result<FontArc, InvalidFont> {
    if let Some(path) = configured {
        if let Some(font) = load_font(path) {
            return Ok(font);
        }
        warn!("configured font {} could not be loaded", path.display());
    }

    let system = FONT_SEARCH_PATHS
        .iter()
        .map(Path::new)
        .filter(|p| p.is_file())
        .find_map(load_font);

    match system {
        Some(font) => Ok(font),
        None => {
            debug!("no system font found, using the bundled one");
            bundled_font()
        }
    }
}

/// Draw `text` in white with its baseline at [`LABEL_ORIGIN`].
pub fn draw_label(image: &mut GrayImage, text: &str, font: &FontArc) {
    let scale = PxScale::from(LABEL_SCALE);
    let ascent = font.as_scaled(scale).ascent().round() as i32;
    let (x, baseline) = LABEL_ORIGIN;
    draw_text_mut(image, Luma([255u8]), x, baseline - ascent, scale, font, text);
}
