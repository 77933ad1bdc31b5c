//! Value types that flow into and out of filter nodes.
//!
//! Slider positions, paths and images all travel as [`Value`]s so a node's
//! parameters can be described, validated and displayed uniformly.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A parameter, input or output value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    Image(ImageValue),
    /// Slider positions and other whole numbers
    Integer(i64),
    Float(f64),
    /// Paths and mode names
    String(String),
    None,
}

/// An image plus its metadata.
///
/// Pixels sit behind an `Arc`: every recompute of a window gets the same
/// base image without copying it. Filters build a new `ImageValue` for
/// their output instead of mutating their input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageValue {
    pub metadata: ImageMetadata,
    /// File the pixels were read from; `None` for filter output.
    pub path: Option<PathBuf>,
    #[serde(skip)]
    data: Option<Arc<DynamicImage>>,
}

/// Equality compares metadata and origin, never pixels.
impl PartialEq for ImageValue {
    fn eq(&self, other: &Self) -> bool {
        self.metadata == other.metadata && self.path == other.path
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub channels: u8,
}

/// File formats recognized by extension.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
    Tiff,
    Bmp,
    Unknown,
}

/// Type tag of a port or parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PortType {
    Image,
    Integer,
    Float,
    String,
    /// Accepts any value
    Any,
}

impl Value {
    pub fn get_type(&self) -> PortType {
        match self {
            Value::Image(_) => PortType::Image,
            Value::Integer(_) => PortType::Integer,
            Value::Float(_) => PortType::Float,
            Value::String(_) => PortType::String,
            Value::None => PortType::Any,
        }
    }

    pub fn as_image(&self) -> Option<&ImageValue> {
        match self {
            Value::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats, or integers widened to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Image(img) => write!(f, "Image({}x{})", img.metadata.width, img.metadata.height),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{:.4}", fl),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::None => write!(f, "None"),
        }
    }
}

impl PortType {
    /// Whether `value` can be bound to a port of this type.
    ///
    /// Integers are accepted where floats are expected, not the reverse.
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (PortType::Any, _)
                | (PortType::Image, Value::Image(_))
                | (PortType::Integer, Value::Integer(_))
                | (PortType::Float, Value::Float(_) | Value::Integer(_))
                | (PortType::String, Value::String(_))
        )
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PortType::Image => "Image",
            PortType::Integer => "Integer",
            PortType::Float => "Float",
            PortType::String => "String",
            PortType::Any => "Any",
        };
        f.write_str(name)
    }
}

impl ImageValue {
    /// Wrap an in-memory image.
    pub fn new(image: DynamicImage) -> Self {
        Self {
            metadata: ImageMetadata::of(&image, ImageFormat::Unknown),
            path: None,
            data: Some(Arc::new(image)),
        }
    }

    /// Decode an image file.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, image::ImageError> {
        let path = path.into();
        let image = image::open(&path)?;

        Ok(Self {
            metadata: ImageMetadata::of(&image, ImageFormat::from_path(&path)),
            path: Some(path),
            data: Some(Arc::new(image)),
        })
    }

    /// Pixel data; `None` for a value deserialized from metadata alone.
    pub fn get_image(&self) -> Option<&DynamicImage> {
        self.data.as_deref()
    }

    /// Take the pixel data, cloning it only if it is still shared.
    pub fn into_image(self) -> Option<DynamicImage> {
        self.data.map(|arc| Arc::try_unwrap(arc).unwrap_or_else(|arc| (*arc).clone()))
    }
}

impl ImageMetadata {
    fn of(image: &DynamicImage, format: ImageFormat) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            format,
            channels: image.color().channel_count(),
        }
    }
}

impl ImageFormat {
    /// Format implied by a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            "gif" => ImageFormat::Gif,
            "webp" => ImageFormat::WebP,
            "tiff" | "tif" => ImageFormat::Tiff,
            "bmp" => ImageFormat::Bmp,
            _ => ImageFormat::Unknown,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Png => "PNG",
            ImageFormat::Gif => "GIF",
            ImageFormat::WebP => "WebP",
            ImageFormat::Tiff => "TIFF",
            ImageFormat::Bmp => "BMP",
            ImageFormat::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}
