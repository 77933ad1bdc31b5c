//! End-to-end runs of the demo sequence from a TOML configuration.

use image::{DynamicImage, Rgb, RgbImage};
use slidefx::app::{self, EDGES_WINDOW, EFFECTS_WINDOW, MAIN_WINDOW};
use slidefx::config::AppConfig;
use slidefx::prelude::*;
use slidefx::window::display::slug;
use std::path::Path;

fn write_input(dir: &Path) -> RgbImage {
    let image = RgbImage::from_fn(40, 30, |x, y| {
        let check = if ((x / 5) + (y / 5)) % 2 == 0 { 90 } else { 10 };
        Rgb([(x * 6) as u8, check, (y * 8) as u8])
    });
    image.save(dir.join("walt.png")).unwrap();
    image
}

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("slidefx.toml");
    let header = format!(
        "input = {:?}\noutput = {:?}\npreview_dir = {:?}\n",
        dir.join("walt.png"),
        dir.join("effects.png"),
        dir.join("preview"),
    );
    std::fs::write(&path, header + body).unwrap();
    path
}

#[test]
fn stock_run_writes_preview_frames_and_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let config = AppConfig::from_file(write_config(dir.path(), "")).unwrap();

    let preview = config.preview_dir.clone().unwrap();
    let mut display = Tee(HeadlessDisplay::new(), PreviewDirDisplay::new(&preview));
    let session = app::run(&config, &mut display).unwrap();

    assert!(session.edges.is_none());
    assert_eq!(
        display.0.history(),
        &[MAIN_WINDOW, MAIN_WINDOW, MAIN_WINDOW, EFFECTS_WINDOW]
    );

    // The main window ends on the grayscale frame.
    let main = image::open(preview.join(format!("{}.png", slug(MAIN_WINDOW)))).unwrap();
    assert!(matches!(main, DynamicImage::ImageLuma8(_)));
    assert_eq!((main.width(), main.height()), (40, 30));

    // All sliders at zero leave the image untouched.
    let effects = image::open(preview.join(format!("{}.png", slug(EFFECTS_WINDOW)))).unwrap();
    assert_eq!(effects.to_rgb8(), input);
    assert_eq!(image::open(&config.output).unwrap().to_rgb8(), input);
}

#[test]
fn configured_positions_reach_the_windows() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let mut config = AppConfig::from_file(write_config(
        dir.path(),
        "[effects]\nkernel_size = 1\nenhance = 100\n\n[edges]\nenabled = true\nthreshold1 = 30\n",
    ))
    .unwrap();
    config.edges.output = dir.path().join("edges.png");
    config.apply_override("emboss=3").unwrap();
    config.apply_override("edges.aperture=2").unwrap();

    let mut display = HeadlessDisplay::new();
    let session = app::run(&config, &mut display).unwrap();

    let edges = session.edges.unwrap();
    assert_eq!(edges.trackbar("threshold1"), Some(30));
    assert_eq!(edges.trackbar("threshold2"), Some(60));
    assert_eq!(edges.trackbar("aperture"), Some(2));
    assert!(config.edges.output.is_file());

    let effects = &session.effects;
    assert_eq!(effects.trackbar("kernel_size"), Some(1));
    assert_eq!(effects.trackbar("enhance"), Some(100));
    assert_eq!(effects.trackbar("emboss"), Some(3));

    let expected = apply(
        &DynamicImage::ImageRgb8(input),
        &FilterParameters::new(1, 100, 3).unwrap(),
    );
    assert_eq!(display.frame(EFFECTS_WINDOW).unwrap().as_bytes(), expected.as_bytes());
    assert_eq!(display.frame(EDGES_WINDOW).unwrap().width(), 40);
}

#[test]
fn out_of_range_override_stops_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    write_input(dir.path());
    let mut config = AppConfig::from_file(write_config(dir.path(), "")).unwrap();
    config.apply_override("kernel_size=3").unwrap();

    let mut display = HeadlessDisplay::new();
    let err = app::run(&config, &mut display).err().unwrap();
    assert!(matches!(err, SlideFxError::Validation(_)));
    assert!(!config.output.exists());
}

#[test]
fn missing_input_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::from_file(write_config(dir.path(), "")).unwrap();

    let err = app::run(&config, &mut HeadlessDisplay::new()).err().unwrap();
    assert!(matches!(err, SlideFxError::FileNotFound(_)));
}
