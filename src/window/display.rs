//! Display sinks for window frames.

use crate::core::error::DisplayError;
use image::DynamicImage;
use indexmap::IndexMap;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Something that can present a frame in a named window.
///
/// Failures are fatal to the caller; nothing retries a frame.
pub trait Display {
    /// Present `image` in `window`, replacing its previous frame.
    fn show(&mut self, window: &str, image: &DynamicImage) -> Result<(), DisplayError>;
}

impl<D: Display + ?Sized> Display for &mut D {
    fn show(&mut self, window: &str, image: &DynamicImage) -> Result<(), DisplayError> {
        (**self).show(window, image)
    }
}

/// Entries kept by [`HeadlessDisplay::history`] unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 1024;

/// Keeps the latest frame of every window in memory.
///
/// Only one frame per window is held. The history of window names is
/// capped; the oldest entries are dropped first.
#[derive(Debug)]
pub struct HeadlessDisplay {
    frames: IndexMap<String, DynamicImage>,
    history: Vec<String>,
    history_limit: usize,
}

impl Default for HeadlessDisplay {
    fn default() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` history entries (at least one).
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            frames: IndexMap::new(),
            history: Vec::new(),
            history_limit: limit.max(1),
        }
    }

    /// Latest frame shown in `window`.
    pub fn frame(&self, window: &str) -> Option<&DynamicImage> {
        self.frames.get(window)
    }

    /// Window names in the order frames were shown, one entry per frame.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Windows that have shown at least one frame, in first-shown order.
    pub fn windows(&self) -> impl Iterator<Item = &str> {
        self.frames.keys().map(|s| s.as_str())
    }
}

impl Display for HeadlessDisplay {
    fn show(&mut self, window: &str, image: &DynamicImage) -> Result<(), DisplayError> {
        debug!("{}: {}x{} frame", window, image.width(), image.height());
        self.frames.insert(window.to_string(), image.clone());
        if self.history.len() == self.history_limit {
            self.history.remove(0);
        }
        self.history.push(window.to_string());
        Ok(())
    }
}

/// Writes every frame to `<dir>/<window-slug>.png`.
#[derive(Debug, Clone)]
pub struct PreviewDirDisplay {
    dir: PathBuf,
}

impl PreviewDirDisplay {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File a window's frames are written to.
    pub fn frame_path(&self, window: &str) -> PathBuf {
        self.dir.join(format!("{}.png", slug(window)))
    }
}

impl Display for PreviewDirDisplay {
    fn show(&mut self, window: &str, image: &DynamicImage) -> Result<(), DisplayError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| DisplayError::Io {
            window: window.to_string(),
            source,
        })?;

        let path = self.frame_path(window);
        image.save(&path).map_err(|source| DisplayError::Image {
            window: window.to_string(),
            source,
        })?;
        info!("{} -> {}", window, path.display());
        Ok(())
    }
}

/// Shows each frame on two displays.
#[derive(Debug)]
pub struct Tee<A, B>(pub A, pub B);

impl<A: Display, B: Display> Display for Tee<A, B> {
    fn show(&mut self, window: &str, image: &DynamicImage) -> Result<(), DisplayError> {
        self.0.show(window, image)?;
        self.1.show(window, image)
    }
}

/// Lowercase ASCII alphanumerics with runs of anything else collapsed to `-`.
pub fn slug(window: &str) -> String {
    let mut out = String::with_capacity(window.len());
    for c in window.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("window");
    }
    out
}
