//! Drivetrain models.
//!
//! This module provides types for modeling a robot's motion capabilities through various drivetrain
//! configurations.

use blueshift_math::{desaturate, Angle};

use crate::motor::{MotorPowers, MotorSink};

mod differential;
mod mecanum;

pub use differential::Differential;
pub use mecanum::Mecanum;

/// A collection of motors driving a wheeled mobile robot.
///
/// Implementors of this trait represent a physical or simulated robot drivetrain and may define
/// additional motion-related functionality.
///
/// This is the base trait for all drivetrain models, such as [`Tank`], [`Arcade`], or
/// [`Holonomic`].
pub trait DrivetrainModel {
    /// Error type returned when the robot fails to move.
    type Error: std::error::Error + 'static;

    /// Powers most recently written to the motors, before any reversal is applied.
    fn powers(&self) -> MotorPowers;

    /// Writes a power vector directly to the motors.
    fn set_powers(&mut self, powers: MotorPowers) -> Result<(), Self::Error>;

    /// Stops every motor.
    fn stop(&mut self) -> Result<(), Self::Error> {
        self.set_powers(MotorPowers::ZERO)
    }
}

/// Writes `powers` to every motor in `sink`, negating the reversed ones.
///
/// A failing motor does not keep the rest from being written, so a stop reaches every motor that
/// still responds. `written` tracks what each motor was last successfully given. The first error
/// is returned.
pub(crate) fn write_powers<S: MotorSink>(
    sink: &mut S,
    powers: MotorPowers,
    reversed: [bool; 4],
    written: &mut MotorPowers,
) -> Result<(), S::Error> {
    let mut result = Ok(());

    for (motor, power) in powers.iter() {
        let output = if reversed[motor.as_usize()] {
            -power
        } else {
            power
        };

        match sink.set_power(motor, output) {
            Ok(()) => *written = written.with(motor, power),
            Err(err) => {
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
    }

    result
}

/// A drivetrain model that supports holonomic inverse kinematics.
///
/// Holonomic drivetrains (such as mecanum or swerve) can move freely in any direction without
/// changing their orientation.
///
/// This interface allows for driving the robot based on a desired direction of travel, a speed,
/// and a rotational component.
pub trait Holonomic: DrivetrainModel {
    /// Drives the robot toward `direction` at `speed` while rotating at `turn`.
    ///
    /// `direction` is measured from the robot's right, so a quarter turn drives straight ahead.
    fn drive_vector(&mut self, direction: Angle, speed: f64, turn: f64)
    -> Result<(), Self::Error>;
}

/// A drivetrain model that supports "arcade drive" (forward/turn) inverse kinematics.
pub trait Arcade: DrivetrainModel {
    /// Drives the robot using arcade-style controls.
    fn drive_arcade(&mut self, throttle: f64, steer: f64) -> Result<(), Self::Error>;
}

/// A drivetrain model that supports "tank drive" (left/right) inverse kinematics.
pub trait Tank: DrivetrainModel {
    /// Drives the robot using left and right wheel powers.
    fn drive_tank(&mut self, left: f64, right: f64) -> Result<(), Self::Error>;
}

/// A drivetrain model whose wheels report how far they have turned.
pub trait EncoderDrive: DrivetrainModel {
    /// Zeroes every wheel encoder.
    fn reset_encoders(&mut self) -> Result<(), Self::Error>;

    /// Mean absolute encoder position across the drive wheels, in ticks.
    ///
    /// Wheels on opposite sides of the chassis count in opposite directions, so magnitudes are
    /// averaged rather than signed values.
    fn average_ticks(&mut self) -> Result<f64, Self::Error>;
}

impl<T: Tank> Arcade for T {
    fn drive_arcade(&mut self, throttle: f64, steer: f64) -> Result<(), Self::Error> {
        let [left, right] = desaturate([throttle + steer, throttle - steer], 1.0);

        self.drive_tank(left, right)
    }
}
