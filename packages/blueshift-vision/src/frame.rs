use core::{cmp::Ordering, ops::Range};

use blueshift_tracking::SensorError;

use crate::{JewelState, Rgb};

/// Pixels sampled per axis when counting; every second row and column is read.
const SAMPLE_STEP: usize = 2;

/// A camera image in RGB565 format, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<u16>,
}

impl Frame {
    /// Creates a frame from packed RGB565 pixels.
    ///
    /// Fails if `pixels` does not hold exactly `width * height` entries.
    pub fn from_rgb565(width: usize, height: usize, pixels: Vec<u16>) -> Result<Self, SensorError> {
        if width.checked_mul(height) != Some(pixels.len()) {
            return Err(SensorError::InvalidReading(format!(
                "{} pixels in a {width}x{height} frame",
                pixels.len()
            )));
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Creates a frame from a little-endian RGB565 byte buffer, as delivered by most camera
    /// pipelines.
    pub fn from_rgb565_bytes(width: usize, height: usize, bytes: &[u8]) -> Result<Self, SensorError> {
        if bytes.len() % 2 != 0 {
            return Err(SensorError::InvalidReading(format!(
                "odd RGB565 buffer length {}",
                bytes.len()
            )));
        }

        let pixels = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        Self::from_rgb565(width, height, pixels)
    }

    /// Frame width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Frame height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Color of the pixel at column `x`, row `y`, or `None` outside the frame.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }

        self.pixels
            .get(y * self.width + x)
            .map(|pixel| Rgb::from_rgb565(*pixel))
    }

    /// Counts pixels in `region` that are redder than they are blue, and the reverse.
    ///
    /// Green is ignored, so a red jewel under warm light still counts as red.
    #[must_use]
    pub fn count(&self, region: Region) -> PixelCounts {
        let (columns, rows) = region.bounds(self.width, self.height);
        let mut counts = PixelCounts::default();

        for x in columns.step_by(SAMPLE_STEP) {
            for y in rows.clone().step_by(SAMPLE_STEP) {
                let Some(pixel) = self.pixel(x, y) else {
                    continue;
                };

                match pixel.red.cmp(&pixel.blue) {
                    Ordering::Greater => counts.red += 1,
                    Ordering::Less => counts.blue += 1,
                    Ordering::Equal => {}
                }
            }
        }

        counts
    }
}

/// Part of a frame to search.
///
/// Regions are described in image coordinates. With the phone mounted sideways, the image's left
/// half is the top of the phone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Left half of the frame.
    Left,

    /// Right half of the frame.
    Right,

    /// First quarter of the width, top third of the height.
    BottomLeftLeft,

    /// Second quarter of the width, top third of the height.
    BottomLeftRight,
}

impl Region {
    /// Column and row ranges covered by this region in a `width` by `height` frame.
    #[must_use]
    pub const fn bounds(self, width: usize, height: usize) -> (Range<usize>, Range<usize>) {
        match self {
            Self::Left => (0..width / 2, 0..height),
            Self::Right => (width / 2..width, 0..height),
            Self::BottomLeftLeft => (0..width / 4, 0..height / 3),
            Self::BottomLeftRight => (width / 4..width / 2, 0..height / 3),
        }
    }
}

/// Numbers of reddish and bluish pixels in a region.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelCounts {
    /// Pixels whose red channel beats blue.
    pub red: usize,

    /// Pixels whose blue channel beats red.
    pub blue: usize,
}

impl PixelCounts {
    /// Decides which jewel sits on the left from counts taken either side of the gap between two
    /// jewels. Both sides must agree: a red left needs a blue right and vice versa.
    #[must_use]
    pub const fn classify_pair(left: Self, right: Self) -> JewelState {
        if left.red > left.blue && right.blue > right.red {
            JewelState::Red
        } else if left.blue > left.red && right.red > right.blue {
            JewelState::Blue
        } else {
            JewelState::Unknown
        }
    }
}

/// A camera that hands out frames.
pub trait FrameSource {
    /// Waits for and returns the next RGB565 frame.
    fn next_frame(&mut self) -> Result<Frame, SensorError>;
}

impl<F: FrameSource + ?Sized> FrameSource for &mut F {
    fn next_frame(&mut self) -> Result<Frame, SensorError> {
        (**self).next_frame()
    }
}

/// Identifies jewels by counting colored pixels in camera frames.
#[derive(Debug)]
pub struct JewelCamera<F: FrameSource> {
    source: F,
}

impl<F: FrameSource> JewelCamera<F> {
    /// Creates a jewel camera reading from `source`.
    pub const fn new(source: F) -> Self {
        Self { source }
    }

    /// Compares the two halves of a single frame.
    pub fn search_full(&mut self) -> Result<JewelState, SensorError> {
        self.search(Region::Left, Region::Right)
    }

    /// Compares the two quarters of the bottom-left corner of a single frame, for when the jewels
    /// only occupy a small part of the view.
    pub fn search_bottom_left(&mut self) -> Result<JewelState, SensorError> {
        self.search(Region::BottomLeftLeft, Region::BottomLeftRight)
    }

    fn search(&mut self, left: Region, right: Region) -> Result<JewelState, SensorError> {
        let frame = self.source.next_frame().inspect_err(|err| {
            log::error!("No camera frame for jewel search: {err}");
        })?;

        let (left_counts, right_counts) = (frame.count(left), frame.count(right));
        let state = PixelCounts::classify_pair(left_counts, right_counts);
        log::debug!("Jewel search: {left_counts:?} vs {right_counts:?}, left jewel is {state}.");

        Ok(state)
    }

    /// Returns a reference to the frame source.
    pub const fn source(&self) -> &F {
        &self.source
    }
}
