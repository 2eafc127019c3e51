//! Motor hardware abstractions.

use core::{
    fmt,
    ops::Index,
};

use blueshift_math::clip;

/// Position of a drive motor on the chassis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotorIndex {
    /// Rear motor on the left side.
    LeftBack,

    /// Front motor on the left side.
    LeftFront,

    /// Rear motor on the right side.
    RightBack,

    /// Front motor on the right side.
    RightFront,
}

impl MotorIndex {
    /// All four motors, in power-vector order.
    pub const ALL: [Self; 4] = [
        Self::LeftBack,
        Self::LeftFront,
        Self::RightBack,
        Self::RightFront,
    ];

    /// Position of this motor in a [`MotorPowers`] vector.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        match self {
            Self::LeftBack => 0,
            Self::LeftFront => 1,
            Self::RightBack => 2,
            Self::RightFront => 3,
        }
    }
}

impl fmt::Display for MotorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LeftBack => "left back",
            Self::LeftFront => "left front",
            Self::RightBack => "right back",
            Self::RightFront => "right front",
        })
    }
}

/// Power levels for the four drive motors, each clamped to `[-1, 1]`.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct MotorPowers([f64; 4]);

impl MotorPowers {
    /// All motors stopped.
    pub const ZERO: Self = Self([0.0; 4]);

    /// Creates a power vector, clamping every element to `[-1, 1]`.
    #[must_use]
    pub fn new(powers: [f64; 4]) -> Self {
        Self(powers.map(|power| clip(power, -1.0, 1.0)))
    }

    /// Returns the powers as an array in [`MotorIndex::ALL`] order.
    #[must_use]
    pub const fn to_array(self) -> [f64; 4] {
        self.0
    }

    /// Returns `true` if every motor is stopped.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|power| *power == 0.0)
    }

    /// Multiplies every power by `factor`, clamping the result.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.0.map(|power| power * factor))
    }

    /// Returns a copy of this vector with one motor's power replaced.
    #[must_use]
    pub fn with(mut self, motor: MotorIndex, power: f64) -> Self {
        self.0[motor.as_usize()] = clip(power, -1.0, 1.0);
        self
    }

    /// Iterates over each motor and its power.
    pub fn iter(&self) -> impl Iterator<Item = (MotorIndex, f64)> + '_ {
        MotorIndex::ALL.into_iter().map(|motor| (motor, self[motor]))
    }
}

impl Index<MotorIndex> for MotorPowers {
    type Output = f64;

    fn index(&self, motor: MotorIndex) -> &f64 {
        &self.0[motor.as_usize()]
    }
}

/// Hardware that accepts drive motor power commands.
pub trait MotorSink {
    /// Error returned when a motor cannot be commanded.
    type Error: std::error::Error + 'static;

    /// Sets the power of a single motor. `power` is always within `[-1, 1]`.
    fn set_power(&mut self, motor: MotorIndex, power: f64) -> Result<(), Self::Error>;
}

/// Motors with quadrature encoders.
pub trait Encoders: MotorSink {
    /// Zeroes the position counters of every motor.
    fn reset_encoders(&mut self) -> Result<(), Self::Error>;

    /// Reads the position counter of a motor, in encoder ticks.
    fn encoder_position(&mut self, motor: MotorIndex) -> Result<i32, Self::Error>;
}

/// Error type for motor hardware that can only fail by going missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MotorError {
    /// The motor controller for this motor is not responding.
    #[error("{0} motor is disconnected")]
    Disconnected(MotorIndex),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn powers_are_clamped() {
        let powers = MotorPowers::new([1.5, -2.0, 0.25, f64::NAN]);

        assert_eq!(powers.to_array(), [1.0, -1.0, 0.25, 0.0]);
        assert_eq!(powers[MotorIndex::LeftFront], -1.0);
        assert_eq!(powers.scaled(0.5).to_array(), [0.5, -0.5, 0.125, 0.0]);
    }

    #[test]
    fn indices_match_vector_order() {
        assert!(MotorPowers::ZERO.is_zero());

        let powers = MotorPowers::ZERO.with(MotorIndex::RightFront, 0.5);
        assert_eq!(powers.to_array(), [0.0, 0.0, 0.0, 0.5]);
        assert_eq!(
            powers.iter().map(|(motor, _)| motor).collect::<Vec<_>>(),
            MotorIndex::ALL
        );
    }
}
