//! Control theory primitives.

pub mod loops;

mod clock;
mod tolerances;

pub use clock::{Clock, ManualClock, SystemClock};
pub use tolerances::Tolerances;

use blueshift_math::Angle;

/// How the error between a measured and a desired angle is computed.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorMode {
    /// Signed shortest rotation from the measurement to the setpoint, in `(-π, π]`.
    #[default]
    Shortest,

    /// Plain `setpoint - measurement` with no wrapping.
    ///
    /// This matches how the old autonomous turn routines compared headings. It only behaves when
    /// both angles stay well away from the wrap boundary of the heading sensor; a target on the
    /// far side of the boundary makes the robot spin the long way around or never converge.
    Raw,
}

impl ErrorMode {
    /// Computes the error from `measurement` to `setpoint`.
    ///
    /// ```
    /// use blueshift_control::ErrorMode;
    /// use blueshift_math::IntoAngle;
    ///
    /// let error = ErrorMode::Shortest.error(350.0.deg(), 10.0.deg());
    /// assert!((error.as_degrees() - 20.0).abs() < 1e-9);
    ///
    /// let error = ErrorMode::Raw.error(350.0.deg(), 10.0.deg());
    /// assert!((error.as_degrees() + 340.0).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn error(self, measurement: Angle, setpoint: Angle) -> Angle {
        match self {
            Self::Shortest => (setpoint - measurement).wrapped_half(),
            Self::Raw => setpoint - measurement,
        }
    }
}
