use blueshift_math::clip;

use super::{write_powers, DrivetrainModel, EncoderDrive, Tank};
use crate::motor::{Encoders, MotorIndex, MotorPowers, MotorSink};

/// Differential ("tank") drivetrain with two motors per side.
///
/// Both left motors receive the left power and both right motors receive the right power. Positive
/// power drives each side forward.
#[derive(Debug)]
pub struct Differential<S: MotorSink> {
    sink: S,
    powers: MotorPowers,
}

impl<S: MotorSink> Differential<S> {
    /// Creates a differential drivetrain.
    pub const fn new(sink: S) -> Self {
        Self {
            sink,
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
}

impl<S: MotorSink> DrivetrainModel for Differential<S> {
    type Error = S::Error;

    fn powers(&self) -> MotorPowers {
        self.powers
    }

    fn set_powers(&mut self, powers: MotorPowers) -> Result<(), Self::Error> {
        write_powers(&mut self.sink, powers, [false; 4], &mut self.powers)
    }
}

impl<S: MotorSink> Tank for Differential<S> {
    fn drive_tank(&mut self, left: f64, right: f64) -> Result<(), Self::Error> {
        let (left, right) = (clip(left, -1.0, 1.0), clip(right, -1.0, 1.0));

        self.set_powers(MotorPowers::new([left, left, right, right]))
    }
}

impl<S: Encoders> EncoderDrive for Differential<S> {
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
    use crate::{model::Arcade, motor::MotorError};

    struct FlakySink {
        written: Vec<(MotorIndex, f64)>,
        offline: Option<MotorIndex>,
    }

    impl MotorSink for FlakySink {
        type Error = MotorError;

        fn set_power(&mut self, motor: MotorIndex, power: f64) -> Result<(), MotorError> {
            if self.offline == Some(motor) {
                return Err(MotorError::Disconnected(motor));
            }

            self.written.push((motor, power));
            Ok(())
        }
    }

    #[test]
    fn arcade_desaturates_into_tank() {
        let mut drivetrain = Differential::new(FlakySink {
            written: Vec::new(),
            offline: None,
        });

        drivetrain.drive_arcade(1.0, 1.0).unwrap();
        assert_eq!(drivetrain.powers().to_array(), [1.0, 1.0, 0.0, 0.0]);

        drivetrain.drive_arcade(0.5, -0.25).unwrap();
        assert_eq!(drivetrain.powers().to_array(), [0.25, 0.25, 0.75, 0.75]);
    }

    #[test]
    fn failed_write_is_reported() {
        let mut drivetrain = Differential::new(FlakySink {
            written: Vec::new(),
            offline: Some(MotorIndex::RightBack),
        });

        assert_eq!(
            drivetrain.drive_tank(0.5, 0.5),
            Err(MotorError::Disconnected(MotorIndex::RightBack))
        );
        assert_eq!(drivetrain.powers().to_array(), [0.5, 0.5, 0.0, 0.5]);
        assert_eq!(drivetrain.sink().written.len(), 3);

        drivetrain.sink_mut().written.clear();
        assert_eq!(
            drivetrain.stop(),
            Err(MotorError::Disconnected(MotorIndex::RightBack))
        );
        assert!(drivetrain.powers().is_zero());
        assert_eq!(
            drivetrain.sink().written,
            [
                (MotorIndex::LeftBack, 0.0),
                (MotorIndex::LeftFront, 0.0),
                (MotorIndex::RightFront, 0.0),
            ]
        );
    }
}
