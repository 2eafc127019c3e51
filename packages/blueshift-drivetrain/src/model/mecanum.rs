use core::f64::consts::FRAC_PI_4;

use blueshift_math::{desaturate, Angle};

use super::{write_powers, Arcade, DrivetrainModel, EncoderDrive, Holonomic};
use crate::motor::{Encoders, MotorIndex, MotorPowers, MotorSink};

/// Four-wheel mecanum drivetrain.
///
/// Power vectors are computed in the chassis frame and then written to the motors, negating the
/// power of any motor marked as reversed. Reversal compensates for motors that are mounted
/// mirrored or geared so that positive power spins the wheel backwards.
#[derive(Debug)]
pub struct Mecanum<S: MotorSink> {
    sink: S,
    reversed: [bool; 4],
    powers: MotorPowers,
}

impl<S: MotorSink> Mecanum<S> {
    /// Motor reversal of the standard chassis: both rear motors are reversed.
    pub const REAR_REVERSED: [bool; 4] = [true, false, true, false];

    /// Creates a mecanum drivetrain with no motors reversed.
    pub const fn new(sink: S) -> Self {
        Self {
            sink,
            reversed: [false; 4],
            powers: MotorPowers::ZERO,
        }
    }

    /// Creates a mecanum drivetrain, reversing motors where `reversed` is `true`.
    ///
    /// `reversed` is indexed in [`MotorIndex::ALL`] order.
    pub const fn with_reversed(sink: S, reversed: [bool; 4]) -> Self {
        Self {
            sink,
            reversed,
            powers: MotorPowers::ZERO,
        }
    }

    /// Returns a reference to the motor hardware.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns a mutable reference to the motor hardware.
    pub const fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Computes wheel powers for a desired direction, speed and rotation without commanding the
    /// motors.
    ///
    /// The result is desaturated, so its direction of travel is preserved even when the requested
    /// components sum past full power.
    #[must_use]
    pub fn inverse_kinematics(direction: Angle, speed: f64, turn: f64) -> MotorPowers {
        let theta = direction.as_radians() + FRAC_PI_4;
        let (sin, cos) = (speed * theta.sin(), speed * theta.cos());

        MotorPowers::new(desaturate([cos - turn, sin + turn, sin - turn, cos + turn], 1.0))
    }
}

impl<S: MotorSink> DrivetrainModel for Mecanum<S> {
    type Error = S::Error;

    fn powers(&self) -> MotorPowers {
        self.powers
    }

    fn set_powers(&mut self, powers: MotorPowers) -> Result<(), Self::Error> {
        write_powers(&mut self.sink, powers, self.reversed, &mut self.powers)
    }
}

impl<S: MotorSink> Holonomic for Mecanum<S> {
    fn drive_vector(&mut self, direction: Angle, speed: f64, turn: f64) -> Result<(), Self::Error> {
        self.set_powers(Self::inverse_kinematics(direction, speed, turn))
    }
}

/// Arcade control on a mecanum chassis drives straight ahead, with no strafing.
impl<S: MotorSink> Arcade for Mecanum<S> {
    fn drive_arcade(&mut self, throttle: f64, steer: f64) -> Result<(), Self::Error> {
        self.drive_vector(Angle::QUARTER_TURN, throttle, steer)
    }
}

impl<S: Encoders> EncoderDrive for Mecanum<S> {
    fn reset_encoders(&mut self) -> Result<(), Self::Error> {
        self.sink.reset_encoders()
    }

    fn average_ticks(&mut self) -> Result<f64, Self::Error> {
        let mut total = 0.0;

        for motor in MotorIndex::ALL {
            total += f64::from(self.sink.encoder_position(motor)?).abs();
        }

        Ok(total / 4.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::MotorError;
    use approx::assert_abs_diff_eq;
    use core::f64::consts::{FRAC_1_SQRT_2, PI};

    #[derive(Default)]
    struct RecordingSink {
        written: [f64; 4],
        offline: Option<MotorIndex>,
    }

    impl MotorSink for RecordingSink {
        type Error = MotorError;

        fn set_power(&mut self, motor: MotorIndex, power: f64) -> Result<(), MotorError> {
            if self.offline == Some(motor) {
                return Err(MotorError::Disconnected(motor));
            }

            self.written[motor.as_usize()] = power;
            Ok(())
        }
    }

    fn assert_powers(actual: MotorPowers, expected: [f64; 4]) {
        for (actual, expected) in actual.to_array().into_iter().zip(expected) {
            assert_abs_diff_eq!(actual, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn forward_drive_matches_chassis_layout() {
        let powers = Mecanum::<RecordingSink>::inverse_kinematics(Angle::QUARTER_TURN, 1.0, 0.0);

        assert_powers(
            powers,
            [-FRAC_1_SQRT_2, FRAC_1_SQRT_2, FRAC_1_SQRT_2, -FRAC_1_SQRT_2],
        );
    }

    #[test]
    fn strafe_right_uses_diagonal_pairs() {
        let powers = Mecanum::<RecordingSink>::inverse_kinematics(Angle::ZERO, 0.5, 0.0);
        let component = 0.5 * FRAC_1_SQRT_2;

        assert_powers(powers, [component, component, component, component]);
    }

    #[test]
    fn rotation_only_spins_in_place() {
        let powers = Mecanum::<RecordingSink>::inverse_kinematics(Angle::ZERO, 0.0, 0.25);

        assert_powers(powers, [-0.25, 0.25, -0.25, 0.25]);
    }

    #[test]
    fn saturated_commands_are_scaled_down() {
        let powers = Mecanum::<RecordingSink>::inverse_kinematics(Angle::from_radians(PI), 1.0, 1.0);
        let largest = powers
            .to_array()
            .iter()
            .map(|power| power.abs())
            .fold(0.0, f64::max);

        assert_abs_diff_eq!(largest, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn reversed_motors_are_negated_on_write() {
        let mut drivetrain =
            Mecanum::with_reversed(RecordingSink::default(), Mecanum::<RecordingSink>::REAR_REVERSED);

        drivetrain.drive_arcade(0.0, 0.25).unwrap();
        assert_powers(drivetrain.powers(), [-0.25, 0.25, -0.25, 0.25]);
        assert_eq!(drivetrain.sink().written, [0.25, 0.25, 0.25, 0.25]);

        drivetrain.stop().unwrap();
        assert!(drivetrain.powers().is_zero());
        assert_eq!(drivetrain.sink().written, [0.0; 4]);
    }

    #[test]
    fn stop_reaches_motors_after_a_failed_one() {
        let mut drivetrain = Mecanum::new(RecordingSink::default());
        drivetrain.drive_arcade(0.5, 0.0).unwrap();

        drivetrain.sink_mut().offline = Some(MotorIndex::LeftFront);
        assert_eq!(
            drivetrain.stop(),
            Err(MotorError::Disconnected(MotorIndex::LeftFront))
        );

        let written = drivetrain.sink().written;
        assert_eq!(written[MotorIndex::LeftBack.as_usize()], 0.0);
        assert_eq!(written[MotorIndex::RightBack.as_usize()], 0.0);
        assert_eq!(written[MotorIndex::RightFront.as_usize()], 0.0);

        // The offline motor keeps the last power it accepted.
        assert_abs_diff_eq!(
            drivetrain.powers()[MotorIndex::LeftFront],
            0.5 * FRAC_1_SQRT_2,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(drivetrain.powers()[MotorIndex::RightFront], 0.0);
    }
}
