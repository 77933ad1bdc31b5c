//! Named windows whose trackbars drive a filter node.
//!
//! A [`TrackbarWindow`] owns one node and the image it filters. Every
//! trackbar change validates the new position, re-runs the node from the
//! base image with all current positions, and shows the result. There is no
//! caching and no partial recompute.

use crate::core::context::{ExecutionContext, ValidationContext};
use crate::core::error::{SlideFxError, ValidationError};
use crate::core::node::FilterNode;
use crate::core::port::ParameterDefinition;
use crate::core::types::{ImageValue, Value};
use crate::window::display::Display;
use image::DynamicImage;
use indexmap::IndexMap;
use log::debug;

/// Run `node` once on `input`.
///
/// Parameters not listed in `overrides` take their declared defaults.
/// Declared constraints are checked first, then the node's own validation.
pub fn run_filter(
    node: &dyn FilterNode,
    input: Option<&ImageValue>,
    overrides: &[(&str, Value)],
) -> Result<ImageValue, SlideFxError> {
    let metadata = node.metadata();

    for (name, _) in overrides {
        if metadata.get_parameter(name).is_none() {
            return Err(ValidationError::UnknownParameter {
                filter: metadata.id.clone(),
                parameter: name.to_string(),
            }
            .into());
        }
    }

    let mut ctx = ValidationContext::new(metadata.id.as_str());
    if let Some(input) = input {
        ctx.add_input("image", Value::Image(input.clone()));
    }

    for param in &metadata.parameters {
        let value = overrides
            .iter()
            .find(|(name, _)| *name == param.name)
            .map(|(_, value)| value.clone())
            .unwrap_or_else(|| param.default_value.clone());

        param
            .validate(&value)
            .map_err(|error| ValidationError::ConstraintViolation {
                filter: metadata.id.clone(),
                parameter: param.name.clone(),
                error,
            })?;
        ctx.add_parameter(param.name.clone(), value);
    }

    node.validate(&ctx)?;

    let mut ctx = ExecutionContext::from(ctx);
    node.execute(&mut ctx)?;

    match ctx.take_output("image")? {
        Value::Image(image) => Ok(image),
        other => Err(SlideFxError::Other(format!(
            "filter '{}' produced {} instead of an image",
            metadata.id,
            other.get_type()
        ))),
    }
}

/// An integer slider bound to one node parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trackbar {
    /// Parameter name.
    pub name: String,
    /// Label shown next to the slider.
    pub label: String,
    pub value: i64,
    pub min: i64,
    pub max: i64,
}

impl Trackbar {
    fn from_parameter(param: &ParameterDefinition) -> Self {
        let (min, max) = param.slider_range().unwrap_or((0, 0));
        Self {
            name: param.name.clone(),
            label: param.display_name.clone(),
            value: param.default_value.as_integer().unwrap_or(min),
            min,
            max,
        }
    }
}

/// A named window showing one node's output over a fixed base image.
pub struct TrackbarWindow {
    name: String,
    node: Box<dyn FilterNode>,
    base: ImageValue,
    trackbars: IndexMap<String, Trackbar>,
    output: Option<DynamicImage>,
}

impl TrackbarWindow {
    /// Create a window with one trackbar per slider parameter of `node`,
    /// each at its default position. Nothing is computed until the first
    /// [`refresh`](Self::refresh) or trackbar change.
    pub fn new(name: impl Into<String>, node: Box<dyn FilterNode>, base: ImageValue) -> Self {
        let trackbars = node
            .metadata()
            .sliders()
            .map(|p| (p.name.clone(), Trackbar::from_parameter(p)))
            .collect();

        Self {
            name: name.into(),
            node,
            base,
            trackbars,
            output: None,
        }
    }

    /// Window name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current position of a trackbar.
    pub fn trackbar(&self, name: &str) -> Option<i64> {
        self.trackbars.get(name).map(|t| t.value)
    }

    /// All trackbars in creation order.
    pub fn trackbars(&self) -> impl Iterator<Item = &Trackbar> {
        self.trackbars.values()
    }

    /// Last computed frame.
    pub fn output(&self) -> Option<&DynamicImage> {
        self.output.as_ref()
    }

    /// Move a trackbar, recompute and show.
    ///
    /// A rejected value leaves every trackbar where it was.
    pub fn set_trackbar(
        &mut self,
        name: &str,
        value: i64,
        display: &mut dyn Display,
    ) -> Result<(), SlideFxError> {
        let previous = self.check_position(name, value)?;
        self.store(name, value);

        if let Err(e) = self.refresh(display) {
            self.store(name, previous);
            return Err(e);
        }
        Ok(())
    }

    /// Move several trackbars without recomputing.
    ///
    /// All positions are checked before any is applied.
    pub fn set_positions(&mut self, positions: &[(&str, i64)]) -> Result<(), ValidationError> {
        for &(name, value) in positions {
            self.check_position(name, value)?;
        }
        for &(name, value) in positions {
            self.store(name, value);
        }
        Ok(())
    }

    /// Recompute from the base image and all current positions, then show.
    pub fn refresh(&mut self, display: &mut dyn Display) -> Result<(), SlideFxError> {
        let positions: Vec<(&str, Value)> = self
            .trackbars
            .values()
            .map(|t| (t.name.as_str(), Value::Integer(t.value)))
            .collect();
        debug!("{}: recompute with {:?}", self.name, positions);

        let frame = run_filter(self.node.as_ref(), Some(&self.base), &positions)?
            .into_image()
            .ok_or_else(|| SlideFxError::Other(format!("window '{}' got an empty frame", self.name)))?;

        display.show(&self.name, &frame)?;
        self.output = Some(frame);
        Ok(())
    }

    /// Check a position and return the trackbar's current value.
    fn check_position(&self, name: &str, value: i64) -> Result<i64, ValidationError> {
        let filter = self.node.metadata().id;
        let trackbar = self
            .trackbars
            .get(name)
            .ok_or_else(|| ValidationError::UnknownParameter {
                filter: filter.clone(),
                parameter: name.to_string(),
            })?;

        if value < trackbar.min || value > trackbar.max {
            return Err(ValidationError::ConstraintViolation {
                filter,
                parameter: name.to_string(),
                error: format!(
                    "Value {} is out of range [{}, {}]",
                    value, trackbar.min, trackbar.max
                ),
            });
        }
        Ok(trackbar.value)
    }

    fn store(&mut self, name: &str, value: i64) {
        if let Some(trackbar) = self.trackbars.get_mut(name) {
            trackbar.value = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::builtin::{FilterEffects, Flip};
    use crate::window::display::HeadlessDisplay;
    use image::{Rgb, RgbImage};

    const WINDOW: &str = "Filter Effects with Trackbars";

    fn base() -> ImageValue {
        ImageValue::new(DynamicImage::ImageRgb8(RgbImage::from_fn(16, 12, |x, y| {
            Rgb([(x * 15) as u8, (y * 20) as u8, ((x + y) * 5) as u8])
        })))
    }

    fn window() -> TrackbarWindow {
        TrackbarWindow::new(WINDOW, Box::new(FilterEffects), base())
    }

    #[test]
    fn test_trackbars_follow_slider_parameters() {
        let window = window();
        let bars: Vec<_> = window.trackbars().map(|t| (t.label.as_str(), t.value, t.max)).collect();
        assert_eq!(
            bars,
            vec![("Enhance Edges", 0, 100), ("Emboss Edges", 0, 7), ("Kernel Size", 0, 2)]
        );
        assert!(window.output().is_none());
    }

    #[test]
    fn test_refresh_shows_identity_at_zero() {
        let mut display = HeadlessDisplay::new();
        let mut window = window();
        window.refresh(&mut display).unwrap();

        let shown = display.frame(WINDOW).unwrap();
        assert_eq!(shown.as_bytes(), base().get_image().unwrap().as_bytes());
        assert_eq!(window.output().unwrap().as_bytes(), shown.as_bytes());
    }

    #[test]
    fn test_set_trackbar_recomputes() {
        let mut display = HeadlessDisplay::new();
        let mut window = window();
        window.set_trackbar("enhance", 100, &mut display).unwrap();
        window.set_trackbar("emboss", 3, &mut display).unwrap();

        assert_eq!(window.trackbar("enhance"), Some(100));
        assert_eq!(display.history().len(), 2);
        assert_ne!(
            display.frame(WINDOW).unwrap().as_bytes(),
            base().get_image().unwrap().as_bytes()
        );
    }

    #[test]
    fn test_rejected_values_keep_state() {
        let mut display = HeadlessDisplay::new();
        let mut window = window();
        window.set_trackbar("emboss", 2, &mut display).unwrap();

        let err = window.set_trackbar("emboss", 8, &mut display).unwrap_err();
        assert!(matches!(
            err,
            SlideFxError::Validation(ValidationError::ConstraintViolation { .. })
        ));
        let err = window.set_trackbar("sharpen", 1, &mut display).unwrap_err();
        assert!(matches!(
            err,
            SlideFxError::Validation(ValidationError::UnknownParameter { .. })
        ));

        assert_eq!(window.trackbar("emboss"), Some(2));
        assert_eq!(display.history().len(), 1);
    }

    #[test]
    fn test_set_positions_is_all_or_nothing() {
        let mut window = window();
        assert!(window.set_positions(&[("enhance", 40), ("kernel_size", 5)]).is_err());
        assert_eq!(window.trackbar("enhance"), Some(0));

        window.set_positions(&[("enhance", 40), ("kernel_size", 1)]).unwrap();
        assert_eq!(window.trackbar("enhance"), Some(40));
        assert_eq!(window.trackbar("kernel_size"), Some(1));
    }

    #[test]
    fn test_run_filter_with_overrides() {
        let out = run_filter(&Flip, Some(&base()), &[("mode", Value::String("horizontal".into()))]).unwrap();
        assert_eq!(out.metadata.width, 16);

        let err = run_filter(&Flip, Some(&base()), &[("angle", Value::Integer(90))]).unwrap_err();
        assert!(matches!(
            err,
            SlideFxError::Validation(ValidationError::UnknownParameter { .. })
        ));

        let err = run_filter(&Flip, None, &[]).unwrap_err();
        assert!(matches!(err, SlideFxError::Execution(_)));
    }
}
