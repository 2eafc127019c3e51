use std::time::Duration;

use blueshift_math::Angle;

use super::Feedback;
use crate::ErrorMode;

/// Bang-bang controller.
///
/// Outputs a fixed-magnitude signal in the direction of the error, or zero when the measurement
/// sits exactly on the setpoint. The magnitude is always treated as positive.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct BangBang {
    magnitude: f64,
}

impl BangBang {
    /// Creates a bang-bang controller producing signals of `magnitude`.
    #[must_use]
    pub const fn new(magnitude: f64) -> Self {
        Self {
            magnitude: magnitude.abs(),
        }
    }

    /// Returns the output magnitude.
    #[must_use]
    pub const fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Sets the output magnitude.
    pub const fn set_magnitude(&mut self, magnitude: f64) {
        self.magnitude = magnitude.abs();
    }
}

impl Feedback for BangBang {
    type State = f64;
    type Signal = f64;

    fn update(&mut self, measurement: f64, setpoint: f64, _dt: Duration) -> f64 {
        signed_output(self.magnitude, setpoint - measurement)
    }
}

/// Bang-bang controller operating on angles.
///
/// The error between the measured and desired angle is computed according to an [`ErrorMode`],
/// so that with [`ErrorMode::Shortest`] the sign of the output always points along the shorter
/// way around the circle.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct AngularBangBang {
    magnitude: f64,
    error_mode: ErrorMode,
}

impl AngularBangBang {
    /// Creates an angular bang-bang controller producing signals of `magnitude`.
    #[must_use]
    pub const fn new(magnitude: f64, error_mode: ErrorMode) -> Self {
        Self {
            magnitude: magnitude.abs(),
            error_mode,
        }
    }

    /// Returns the output magnitude.
    #[must_use]
    pub const fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Returns the error mode.
    #[must_use]
    pub const fn error_mode(&self) -> ErrorMode {
        self.error_mode
    }
}

impl Feedback for AngularBangBang {
    type State = Angle;
    type Signal = f64;

    fn update(&mut self, measurement: Angle, setpoint: Angle, _dt: Duration) -> f64 {
        signed_output(
            self.magnitude,
            self.error_mode.error(measurement, setpoint).as_radians(),
        )
    }
}

fn signed_output(magnitude: f64, error: f64) -> f64 {
    if error == 0.0 || error.is_nan() {
        0.0
    } else {
        magnitude * error.signum()
    }
}
