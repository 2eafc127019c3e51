//! Jewel and pictograph sensing.
//!
//! Jewels can be told apart either with a color sensor held against one of them
//! ([`JewelSensor`]) or by counting red and blue pixels in a camera frame ([`JewelCamera`]).
//! Pictographs are located through a [`MarkerTracker`] wrapping whatever recognition engine the
//! robot runs.
//!
//! All hardware access goes through traits ([`ColorSensor`], [`FrameSource`], [`MarkerSource`]) and
//! reports failures as [`SensorError`].

mod color;
mod frame;
mod marker;

pub use color::{ColorReading, ColorSensor, ColorThresholds, Hsv, JewelSensor, Rgb};
pub use frame::{Frame, FrameSource, JewelCamera, PixelCounts, Region};
pub use marker::{MarkerSource, MarkerTracker, VuMark};

pub use blueshift_tracking::SensorError;

use core::fmt;

/// Which jewel color was detected.
///
/// For camera searches this is the color of the jewel on the left of the frame.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JewelState {
    /// A red jewel.
    Red,

    /// A blue jewel.
    Blue,

    /// Nothing conclusive.
    #[default]
    Unknown,
}

impl fmt::Display for JewelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Unknown => "unknown",
        })
    }
}
