use blueshift_tracking::SensorError;

use crate::JewelState;

/// Raw channel counts from a color sensor.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorReading {
    /// Red channel.
    pub red: u16,

    /// Green channel.
    pub green: u16,

    /// Blue channel.
    pub blue: u16,
}

impl ColorReading {
    /// Creates a reading from channel counts.
    #[must_use]
    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }

    /// Converts the reading to hue, saturation and value, saturating channels past 255.
    #[must_use]
    pub fn hsv(&self) -> Hsv {
        let channel = |count: u16| u8::try_from(count).unwrap_or(u8::MAX);

        Hsv::from_rgb(Rgb::new(
            channel(self.red),
            channel(self.green),
            channel(self.blue),
        ))
    }
}

/// An eight-bit-per-channel color.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub red: u8,

    /// Green channel.
    pub green: u8,

    /// Blue channel.
    pub blue: u8,
}

impl Rgb {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Expands a packed RGB565 pixel, replicating high bits into the low bits so that full
    /// intensity maps to 255.
    #[must_use]
    pub const fn from_rgb565(pixel: u16) -> Self {
        let red = ((pixel >> 11) & 0x1F) as u8;
        let green = ((pixel >> 5) & 0x3F) as u8;
        let blue = (pixel & 0x1F) as u8;

        Self {
            red: (red << 3) | (red >> 2),
            green: (green << 2) | (green >> 4),
            blue: (blue << 3) | (blue >> 2),
        }
    }

    /// `true` if red is strictly brighter than both other channels.
    #[must_use]
    pub const fn is_red_dominant(&self) -> bool {
        self.red > self.blue && self.red > self.green
    }

    /// `true` if blue is strictly brighter than both other channels.
    #[must_use]
    pub const fn is_blue_dominant(&self) -> bool {
        self.blue > self.red && self.blue > self.green
    }
}

/// A color in hue, saturation, value form.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    /// Hue in degrees, in `[0, 360)`.
    pub hue: f64,

    /// Saturation, in `[0, 1]`.
    pub saturation: f64,

    /// Value, in `[0, 1]`.
    pub value: f64,
}

impl Hsv {
    /// Converts an RGB color.
    #[must_use]
    pub fn from_rgb(rgb: Rgb) -> Self {
        let (r, g, b) = (
            f64::from(rgb.red) / 255.0,
            f64::from(rgb.green) / 255.0,
            f64::from(rgb.blue) / 255.0,
        );
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let hue = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };

        Self {
            hue,
            saturation: if max == 0.0 { 0.0 } else { delta / max },
            value: max,
        }
    }
}

/// Channel thresholds separating red jewels from blue ones.
///
/// A reading is red when its red channel is above [`red_jewel`](Self::red_jewel) while its blue
/// channel is not, and blue when its red channel is below [`blue_jewel`](Self::blue_jewel) while
/// its blue channel is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorThresholds {
    /// Red/blue threshold for recognizing a red jewel.
    pub red_jewel: u16,

    /// Red/blue threshold for recognizing a blue jewel.
    pub blue_jewel: u16,
}

impl ColorThresholds {
    /// Thresholds tuned for a REV color sensor a few centimeters from a jewel.
    pub const REV_COLOR_SENSOR: Self = Self {
        red_jewel: 38,
        blue_jewel: 17,
    };

    /// Classifies a reading.
    #[must_use]
    pub const fn classify(&self, reading: ColorReading) -> JewelState {
        if reading.red > self.red_jewel && reading.blue <= self.red_jewel {
            JewelState::Red
        } else if reading.red < self.blue_jewel && reading.blue >= self.blue_jewel {
            JewelState::Blue
        } else {
            JewelState::Unknown
        }
    }
}

impl Default for ColorThresholds {
    fn default() -> Self {
        Self::REV_COLOR_SENSOR
    }
}

/// A color sensor with an illuminating LED.
pub trait ColorSensor {
    /// Reads the current channel counts.
    fn color(&mut self) -> Result<ColorReading, SensorError>;

    /// Turns the sensor's LED on or off.
    fn enable_led(&mut self, enabled: bool) -> Result<(), SensorError>;
}

impl<S: ColorSensor + ?Sized> ColorSensor for &mut S {
    fn color(&mut self) -> Result<ColorReading, SensorError> {
        (**self).color()
    }

    fn enable_led(&mut self, enabled: bool) -> Result<(), SensorError> {
        (**self).enable_led(enabled)
    }
}

/// Identifies jewels with a color sensor.
#[derive(Debug)]
pub struct JewelSensor<S: ColorSensor> {
    sensor: S,

    /// Thresholds used by [`JewelSensor::looking_at`].
    pub thresholds: ColorThresholds,
}

impl<S: ColorSensor> JewelSensor<S> {
    /// Wraps `sensor`, turning its LED on.
    pub fn new(mut sensor: S, thresholds: ColorThresholds) -> Result<Self, SensorError> {
        sensor.enable_led(true)?;

        Ok(Self { sensor, thresholds })
    }

    /// Turns the LED on or off.
    pub fn enable_led(&mut self, enabled: bool) -> Result<(), SensorError> {
        self.sensor.enable_led(enabled)
    }

    /// Reads the raw channel counts.
    pub fn reading(&mut self) -> Result<ColorReading, SensorError> {
        self.sensor.color()
    }

    /// Reads the sensor and reports which jewel it sees.
    pub fn looking_at(&mut self) -> Result<JewelState, SensorError> {
        let reading = self.sensor.color()?;
        let state = self.thresholds.classify(reading);
        log::debug!("Color sensor read {reading:?}, looking at {state} jewel.");

        Ok(state)
    }

    /// Returns a reference to the underlying sensor.
    pub const fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Returns a mutable reference to the underlying sensor.
    pub const fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[derive(Default)]
    struct FakeSensor {
        reading: ColorReading,
        led: bool,
    }

    impl ColorSensor for FakeSensor {
        fn color(&mut self) -> Result<ColorReading, SensorError> {
            Ok(self.reading)
        }

        fn enable_led(&mut self, enabled: bool) -> Result<(), SensorError> {
            self.led = enabled;
            Ok(())
        }
    }

    #[test]
    fn thresholds_classify_jewels() {
        let thresholds = ColorThresholds::default();

        assert_eq!(thresholds.classify(ColorReading::new(60, 10, 20)), JewelState::Red);
        assert_eq!(thresholds.classify(ColorReading::new(39, 0, 38)), JewelState::Red);
        assert_eq!(thresholds.classify(ColorReading::new(10, 10, 40)), JewelState::Blue);
        assert_eq!(thresholds.classify(ColorReading::new(16, 0, 17)), JewelState::Blue);
        assert_eq!(thresholds.classify(ColorReading::new(38, 0, 0)), JewelState::Unknown);
        assert_eq!(thresholds.classify(ColorReading::new(20, 20, 20)), JewelState::Unknown);
    }

    #[test]
    fn sensor_led_is_enabled_on_creation() {
        let mut jewels = JewelSensor::new(FakeSensor::default(), ColorThresholds::default()).unwrap();
        assert!(jewels.sensor().led);

        jewels.sensor_mut().reading = ColorReading::new(80, 5, 5);
        assert_eq!(jewels.looking_at().unwrap(), JewelState::Red);

        jewels.enable_led(false).unwrap();
        assert!(!jewels.sensor().led);
    }

    #[test]
    fn rgb565_expands_to_full_range() {
        assert_eq!(Rgb::from_rgb565(0xFFFF), Rgb::new(255, 255, 255));
        assert_eq!(Rgb::from_rgb565(0xF800), Rgb::new(255, 0, 0));
        assert_eq!(Rgb::from_rgb565(0x07E0), Rgb::new(0, 255, 0));
        assert_eq!(Rgb::from_rgb565(0x001F), Rgb::new(0, 0, 255));
        assert!(Rgb::from_rgb565(0xF800).is_red_dominant());
        assert!(!Rgb::from_rgb565(0xFFFF).is_red_dominant());
    }

    #[test]
    fn hsv_conversion() {
        let red = Hsv::from_rgb(Rgb::new(255, 0, 0));
        assert_abs_diff_eq!(red.hue, 0.0);
        assert_abs_diff_eq!(red.saturation, 1.0);
        assert_abs_diff_eq!(red.value, 1.0);

        assert_abs_diff_eq!(Hsv::from_rgb(Rgb::new(0, 0, 255)).hue, 240.0);
        assert_abs_diff_eq!(Hsv::from_rgb(Rgb::new(255, 0, 255)).hue, 300.0);
        assert_abs_diff_eq!(Hsv::from_rgb(Rgb::new(128, 128, 128)).saturation, 0.0);
        assert_abs_diff_eq!(ColorReading::new(1000, 0, 0).hsv().value, 1.0);
    }
}
