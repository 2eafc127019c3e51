use std::time::Duration;

use blueshift_control::Clock;
use blueshift_drivetrain::{model::DrivetrainModel, StopGuard};

use crate::MotionError;

/// Ramps the motors down from their current powers to a stop.
///
/// The last commanded power vector is scaled down linearly over `steps` intervals, ending in a
/// hard [`DrivetrainModel::stop`]. Zero steps stops immediately.
pub fn stop_gradually<M, C>(
    model: &mut M,
    clock: &mut C,
    steps: u32,
    interval: Duration,
) -> Result<(), MotionError<M::Error>>
where
    M: DrivetrainModel,
    C: Clock,
{
    let initial = model.powers();
    let mut model = StopGuard::new(model);

    log::debug!("Ramping drivetrain down over {steps} steps.");

    for step in 1..steps {
        let factor = f64::from(steps - step) / f64::from(steps);

        model
            .set_powers(initial.scaled(factor))
            .map_err(MotionError::Drivetrain)?;
        clock.sleep(interval);
    }

    model.finish().map_err(MotionError::Drivetrain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBase;
    use blueshift_control::ManualClock;
    use blueshift_drivetrain::{
        model::{Differential, Tank},
        motor::{MotorError, MotorIndex, MotorPowers, MotorSink},
    };
    use std::{cell::RefCell, rc::Rc};

    #[derive(Default, Clone)]
    struct PowerLog(Rc<RefCell<Vec<f64>>>);

    impl MotorSink for PowerLog {
        type Error = MotorError;

        fn set_power(&mut self, motor: MotorIndex, power: f64) -> Result<(), MotorError> {
            if motor == MotorIndex::LeftBack {
                self.0.borrow_mut().push(power);
            }
            Ok(())
        }
    }

    #[test]
    fn ramps_linearly_to_zero() {
        let log = PowerLog::default();
        let mut model = Differential::new(log.clone());
        let mut clock = ManualClock::new();

        model.drive_tank(0.8, 0.8).unwrap();
        stop_gradually(&mut model, &mut clock, 4, Duration::from_millis(10)).unwrap();

        let written = log.0.borrow().clone();
        let expected = [0.8, 0.6, 0.4, 0.2, 0.0];
        assert_eq!(written.len(), expected.len());
        for (actual, expected) in written.iter().zip(expected) {
            assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
        }

        assert!(model.powers().is_zero());
        assert_eq!(clock.now(), Duration::from_millis(30));
    }

    #[test]
    fn zero_steps_stops_at_once() {
        let mut model = blueshift_drivetrain::model::Mecanum::new(SimBase::default());
        let mut clock = ManualClock::new();

        model.set_powers(MotorPowers::new([0.5; 4])).unwrap();
        stop_gradually(&mut model, &mut clock, 0, Duration::from_millis(10)).unwrap();

        assert_eq!(model.sink().last_written(), [0.0; 4]);
        assert_eq!(clock.now(), Duration::ZERO);
    }
}
