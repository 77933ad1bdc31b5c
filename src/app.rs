//! The demo sequence: main window, optional edge window, filter-effects window.

use crate::config::AppConfig;
use crate::core::error::{ExecutionError, SlideFxError, SlideFxResult, ValidationError};
use crate::core::types::{ImageValue, Value};
use crate::effects::label::find_font;
use crate::filters::builtin::{EdgePreview, FilterEffects, Flip, Grayscale, LoadImage, SaveImage};
use crate::window::{run_filter, Display, TrackbarWindow};
use std::path::Path;

/// Window showing the original, flipped and grayscale frames in turn.
pub const MAIN_WINDOW: &str = "Main Image";
/// Window hosting the edge preview.
pub const EDGES_WINDOW: &str = "Edges with Trackbar";
/// Window hosting the enhancement and emboss filter.
pub const EFFECTS_WINDOW: &str = "Filter Effects with Trackbars";

/// Windows left open after [`run`].
pub struct Session {
    pub edges: Option<TrackbarWindow>,
    pub effects: TrackbarWindow,
}

/// Run the demo sequence and write the result images.
///
/// The input is loaded once. The main window shows it, then the image
/// flipped around both axes, then the grayscale of the flipped image. The
/// edge window (when enabled) filters that grayscale image; the
/// filter-effects window filters the unflipped original.
pub fn run(config: &AppConfig, display: &mut dyn Display) -> SlideFxResult<Session> {
    let original = load(&config.input)?;
    display.show(MAIN_WINDOW, loaded(&original)?)?;

    let flipped = run_filter(&Flip, Some(&original), &[("mode", Value::String("both".to_string()))])?;
    display.show(MAIN_WINDOW, loaded(&flipped)?)?;

    let gray = run_filter(&Grayscale, Some(&flipped), &[])?;
    display.show(MAIN_WINDOW, loaded(&gray)?)?;

    let edges = if config.edges.enabled {
        let font = find_font(config.edges.font.as_deref())?;
        let mut window = TrackbarWindow::new(EDGES_WINDOW, Box::new(EdgePreview::new(font)), gray);
        window.set_positions(&config.edges.positions())?;
        window.refresh(display)?;
        save_output(&window, &config.edges.output)?;
        Some(window)
    } else {
        None
    };

    let mut effects = TrackbarWindow::new(EFFECTS_WINDOW, Box::new(FilterEffects), original);
    effects.set_positions(&config.effects.positions())?;
    effects.refresh(display)?;
    save_output(&effects, &config.output)?;

    Ok(Session { edges, effects })
}

/// Load the input image, failing fast when it is missing or unreadable.
pub fn load(path: &Path) -> SlideFxResult<ImageValue> {
    let path_value = Value::String(path.to_string_lossy().into_owned());
    run_filter(&LoadImage, None, &[("path", path_value)]).map_err(|err| match err {
        SlideFxError::Validation(ValidationError::ResourceNotFound { .. }) => {
            SlideFxError::FileNotFound(path.to_path_buf())
        }
        SlideFxError::Execution(ExecutionError::ImageDecode { path, source }) => {
            SlideFxError::ImageLoad { path, source }
        }
        other => other,
    })
}

fn loaded(image: &ImageValue) -> SlideFxResult<&image::DynamicImage> {
    image
        .get_image()
        .ok_or_else(|| SlideFxError::Other("image has no pixel data".to_string()))
}

fn save_output(window: &TrackbarWindow, path: &Path) -> SlideFxResult<()> {
    let frame = window
        .output()
        .ok_or_else(|| SlideFxError::Other(format!("window '{}' has no frame to save", window.name())))?;

    let path = Value::String(path.to_string_lossy().into_owned());
    run_filter(&SaveImage, Some(&ImageValue::new(frame.clone())), &[("path", path)])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::HeadlessDisplay;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::path::PathBuf;

    fn config_in(dir: &Path) -> AppConfig {
        let input = dir.join("walt.png");
        RgbImage::from_fn(24, 16, |x, y| Rgb([(x * 10) as u8, (y * 15) as u8, 128]))
            .save(&input)
            .unwrap();

        AppConfig {
            input,
            output: dir.join("effects.png"),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_missing_input_fails_fast() {
        let config = AppConfig {
            input: PathBuf::from("/nonexistent/walt.jpg"),
            ..AppConfig::default()
        };
        let mut display = HeadlessDisplay::new();
        let err = run(&config, &mut display).err().unwrap();
        assert!(matches!(err, SlideFxError::FileNotFound(_)));
        assert!(display.history().is_empty());
    }

    #[test]
    fn test_unreadable_input_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.png");
        std::fs::write(&input, b"not a png").unwrap();

        let err = load(&input).err().unwrap();
        assert!(matches!(err, SlideFxError::ImageLoad { ref path, .. } if *path == input));
    }

    #[test]
    fn test_default_run_shows_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut display = HeadlessDisplay::new();

        let session = run(&config, &mut display).unwrap();

        assert_eq!(
            display.history(),
            &[MAIN_WINDOW, MAIN_WINDOW, MAIN_WINDOW, EFFECTS_WINDOW]
        );
        assert!(session.edges.is_none());
        assert!(matches!(display.frame(MAIN_WINDOW), Some(DynamicImage::ImageLuma8(_))));

        // All sliders at zero: the effects frame is the original.
        let original = image::open(&config.input).unwrap();
        assert_eq!(
            display.frame(EFFECTS_WINDOW).unwrap().as_bytes(),
            original.to_rgb8().as_raw().as_slice()
        );
        assert!(config.output.is_file());
    }

    #[test]
    fn test_edges_window_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.edges.enabled = true;
        config.edges.output = dir.path().join("edges.png");
        config.edges.font = Some(dir.path().join("missing.ttf"));
        config.edges.threshold1 = 0;
        config.edges.threshold2 = 0;

        let mut display = HeadlessDisplay::new();
        let session = run(&config, &mut display).unwrap();

        let edges = session.edges.unwrap();
        assert_eq!(edges.trackbar("sigma"), Some(2));
        assert_eq!(edges.trackbar("threshold2"), Some(0));
        assert_eq!(display.history()[3], EDGES_WINDOW);
        assert!(config.edges.output.is_file());
    }

    #[test]
    fn test_out_of_range_initial_position() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.effects.emboss = 9;

        let mut display = HeadlessDisplay::new();
        let err = run(&config, &mut display).err().unwrap();
        assert!(matches!(err, SlideFxError::Validation(_)));
        assert!(!config.output.exists());
    }
}
