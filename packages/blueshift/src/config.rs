//! Robot configuration files.
//!
//! A robot is described by a TOML file with one table per subsystem. Every key is optional;
//! anything left out takes the value the robot was originally tuned with.
//!
//! ```toml
//! [driver]
//! controller_tolerance = 0.05
//! square_sticks = true
//!
//! [turning]
//! speed = 0.25
//! timeout_ms = 5000
//!
//! [encoder]
//! timeout_ms = 0 # no timeout
//!
//! [motors]
//! left_back = true
//! right_back = true
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    control::{ErrorMode, Tolerances},
    math::Angle,
    motion::{EncoderDriving, EncoderGeometry, HeadingController, Polarity, TurnSettings},
    vision::ColorThresholds,
};

/// Failure to load a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,

        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the expected layout.
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    /// A value is outside its allowed range.
    #[error("{key} must be {expected}, got {value}")]
    OutOfRange {
        /// Dotted path of the offending key.
        key: &'static str,

        /// Description of the allowed range.
        expected: &'static str,

        /// Value found in the file.
        value: f64,
    },
}

/// Everything that can be tuned about a robot without recompiling.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobotConfig {
    /// Gamepad handling during driver control.
    pub driver: DriverConfig,

    /// Heading-controlled turns.
    pub turning: TurnConfig,

    /// Encoder-measured drives.
    pub encoder: EncoderConfig,

    /// Color sensor jewel thresholds.
    pub jewel: JewelConfig,

    /// Drive motor mounting.
    pub motors: MotorConfig,
}

impl RobotConfig {
    /// Reads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml(&text)?;
        log::info!("Loaded robot configuration from {}.", path.display());

        Ok(config)
    }

    /// Reads a configuration file, falling back to the defaults if it is missing or invalid.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Using default robot configuration: {err}");
                Self::default()
            }
        }
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;

        Ok(config)
    }

    /// Renders this configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Checks that every value is within its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Self {
            driver, turning, encoder, ..
        } = self;

        check("driver.controller_tolerance", driver.controller_tolerance, Range::Deadzone)?;
        check("driver.outtake_power", driver.outtake_power, Range::Power)?;
        check("driver.conveyor_outtake_power", driver.conveyor_outtake_power, Range::Power)?;
        check("turning.speed", turning.speed, Range::Power)?;
        check("turning.tolerance", turning.tolerance, Range::Positive)?;
        check("encoder.speed", encoder.speed, Range::Power)?;
        check("encoder.counts_per_motor_rev", encoder.counts_per_motor_rev, Range::Positive)?;
        check("encoder.gear_reduction", encoder.gear_reduction, Range::Positive)?;
        check("encoder.wheel_diameter", encoder.wheel_diameter, Range::Positive)?;

        Ok(())
    }

    /// A heading controller using the configured turn settings.
    #[must_use]
    pub fn heading_controller(&self) -> HeadingController {
        HeadingController::new(self.turning.settings())
    }
}

#[derive(Clone, Copy)]
enum Range {
    Deadzone,
    Power,
    Positive,
}

fn check(key: &'static str, value: f64, range: Range) -> Result<(), ConfigError> {
    let (valid, expected) = match range {
        Range::Deadzone => ((0.0..1.0).contains(&value), "at least 0 and below 1"),
        Range::Power => ((0.0..=1.0).contains(&value), "between 0 and 1"),
        Range::Positive => (value > 0.0, "positive"),
    };

    if valid {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            key,
            expected,
            value,
        })
    }
}

/// Gamepad handling during driver control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    /// Stick deflection treated as centered.
    pub controller_tolerance: f64,

    /// Square stick deflection for finer control at low speed.
    pub square_sticks: bool,

    /// Square trigger travel for finer control at low speed.
    pub square_triggers: bool,

    /// Power used to push glyphs back out of the intake.
    pub outtake_power: f64,

    /// Power used to run the conveyor in reverse.
    pub conveyor_outtake_power: f64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            controller_tolerance: 0.05,
            square_sticks: true,
            square_triggers: true,
            outtake_power: 1.0,
            conveyor_outtake_power: 0.7,
        }
    }
}

/// Zero milliseconds stands for no timeout, since TOML has no null.
fn timeout_from_millis(millis: u64) -> Option<Duration> {
    (millis > 0).then(|| Duration::from_millis(millis))
}

fn millis_from_timeout(timeout: Option<Duration>) -> u64 {
    timeout.map_or(0, |timeout| timeout.as_millis() as u64)
}

/// Heading-controlled turns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TurnConfig {
    /// Magnitude of the rotation command.
    pub speed: f64,

    /// Error tolerance, in radians.
    pub tolerance: f64,

    /// Turn timeout in milliseconds. Zero turns until settled.
    pub timeout_ms: u64,

    /// Set if a positive rotation command turns the robot clockwise.
    pub inverted: bool,

    /// Compare headings the short way around. Clear to compare raw sensor values.
    pub wrap_headings: bool,

    /// Cut from relative turns to make up for coasting, in radians.
    pub overshoot: f64,
}

impl TurnConfig {
    /// Turn settings described by this table.
    #[must_use]
    pub fn settings(&self) -> TurnSettings {
        TurnSettings {
            speed: self.speed,
            tolerances: Tolerances::new().error(self.tolerance),
            timeout: timeout_from_millis(self.timeout_ms),
            polarity: if self.inverted {
                Polarity::Inverted
            } else {
                Polarity::Normal
            },
            error_mode: if self.wrap_headings {
                ErrorMode::Shortest
            } else {
                ErrorMode::Raw
            },
            overshoot: Angle::from_radians(self.overshoot),
            ..TurnSettings::QUARTER_TURN
        }
    }
}

impl Default for TurnConfig {
    fn default() -> Self {
        let preset = TurnSettings::QUARTER_TURN;

        Self {
            speed: preset.speed,
            tolerance: preset.tolerances.error_tolerance.unwrap_or_default(),
            timeout_ms: millis_from_timeout(preset.timeout),
            inverted: preset.polarity == Polarity::Inverted,
            wrap_headings: preset.error_mode == ErrorMode::Shortest,
            overshoot: preset.overshoot.as_radians(),
        }
    }
}

/// Encoder-measured drives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderConfig {
    /// Magnitude of the drive command.
    pub speed: f64,

    /// Drive timeout in milliseconds. Zero drives until the distance is covered.
    pub timeout_ms: u64,

    /// Encoder ticks per revolution of the bare motor.
    pub counts_per_motor_rev: f64,

    /// Gearbox reduction between motor and wheel.
    pub gear_reduction: f64,

    /// Wheel diameter, in inches.
    pub wheel_diameter: f64,
}

impl EncoderConfig {
    /// Wheel and gearbox dimensions described by this table.
    #[must_use]
    pub const fn geometry(&self) -> EncoderGeometry {
        EncoderGeometry {
            counts_per_motor_rev: self.counts_per_motor_rev,
            gear_reduction: self.gear_reduction,
            wheel_diameter: self.wheel_diameter,
        }
    }

    /// Encoder drive settings described by this table.
    #[must_use]
    pub fn encoder_driving(&self) -> EncoderDriving {
        EncoderDriving {
            speed: self.speed,
            timeout: timeout_from_millis(self.timeout_ms),
            geometry: self.geometry(),
            ..EncoderDriving::default()
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        let preset = EncoderDriving::default();

        Self {
            speed: preset.speed,
            timeout_ms: millis_from_timeout(preset.timeout),
            counts_per_motor_rev: preset.geometry.counts_per_motor_rev,
            gear_reduction: preset.geometry.gear_reduction,
            wheel_diameter: preset.geometry.wheel_diameter,
        }
    }
}

/// Color sensor jewel thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JewelConfig {
    /// Red/blue threshold for recognizing a red jewel.
    pub red_jewel: u16,

    /// Red/blue threshold for recognizing a blue jewel.
    pub blue_jewel: u16,
}

impl JewelConfig {
    /// Thresholds described by this table.
    #[must_use]
    pub const fn thresholds(&self) -> ColorThresholds {
        ColorThresholds {
            red_jewel: self.red_jewel,
            blue_jewel: self.blue_jewel,
        }
    }
}

impl Default for JewelConfig {
    fn default() -> Self {
        let preset = ColorThresholds::REV_COLOR_SENSOR;

        Self {
            red_jewel: preset.red_jewel,
            blue_jewel: preset.blue_jewel,
        }
    }
}

/// Which drive motors are mounted so that positive power spins their wheel backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotorConfig {
    /// Rear left motor is reversed.
    pub left_back: bool,

    /// Front left motor is reversed.
    pub left_front: bool,

    /// Rear right motor is reversed.
    pub right_back: bool,

    /// Front right motor is reversed.
    pub right_front: bool,
}

impl MotorConfig {
    /// Reversal flags in [`MotorIndex::ALL`](crate::drivetrain::motor::MotorIndex::ALL) order.
    #[must_use]
    pub const fn reversed(&self) -> [bool; 4] {
        [
            self.left_back,
            self.left_front,
            self.right_back,
            self.right_front,
        ]
    }
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            left_back: true,
            left_front: false,
            right_back: true,
            right_front: false,
        }
    }
}
