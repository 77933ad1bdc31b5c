//! Headless trackbar windows.
//!
//! A window pairs a filter node with the image it runs over; its trackbars
//! are the node's slider parameters. Frames go to a [`Display`] sink, which
//! either keeps them in memory or writes them to a preview directory.

pub mod display;
pub mod trackbar;

pub use display::{Display, HeadlessDisplay, PreviewDirDisplay, Tee};
pub use trackbar::{run_filter, Trackbar, TrackbarWindow};
