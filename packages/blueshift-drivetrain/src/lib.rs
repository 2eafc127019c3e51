//! Robot drivetrains and models.
//!
//! A [`Drivetrain`] pairs a [`model`], which turns driving commands into motor powers, with a
//! tracking system that reports where the robot is pointing. Motions borrow both halves at once,
//! commanding the model while sampling the tracking.

pub mod model;
pub mod motor;

use core::ops::{Deref, DerefMut};

use model::DrivetrainModel;

/// A mobile robot capable of measuring data about itself.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Drivetrain<M, T> {
    /// Motor collection.
    pub model: M,

    /// Tracking system.
    pub tracking: T,
}

impl<M, T> Drivetrain<M, T> {
    /// Creates a new drivetrain from a collection of motors and a tracking system.
    pub const fn new(model: M, tracking: T) -> Self {
        Self { model, tracking }
    }
}

/// Scoped access to a drivetrain model that stops the motors when dropped.
///
/// Motions hold a guard for as long as they command the motors, so every way out of the motion
/// (success, timeout, error, or panic) leaves the robot stationary. Use [`StopGuard::finish`] to
/// stop explicitly and observe a failure to do so; a failure while dropping can only be logged.
pub struct StopGuard<'a, M: DrivetrainModel> {
    model: &'a mut M,
    armed: bool,
}

impl<'a, M: DrivetrainModel> StopGuard<'a, M> {
    /// Takes scoped control of `model`.
    pub const fn new(model: &'a mut M) -> Self {
        Self { model, armed: true }
    }

    /// Stops the motors and releases the model.
    pub fn finish(mut self) -> Result<(), M::Error> {
        self.armed = false;
        self.model.stop()
    }
}

impl<M: DrivetrainModel> Deref for StopGuard<'_, M> {
    type Target = M;

    fn deref(&self) -> &M {
        self.model
    }
}

impl<M: DrivetrainModel> DerefMut for StopGuard<'_, M> {
    fn deref_mut(&mut self) -> &mut M {
        self.model
    }
}

impl<M: DrivetrainModel> Drop for StopGuard<'_, M> {
    fn drop(&mut self) {
        if self.armed {
            if let Err(err) = self.model.stop() {
                log::warn!("Failed to stop drivetrain on exit: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{Arcade, Mecanum};
    use motor::{MotorError, MotorIndex, MotorSink};

    #[derive(Default)]
    struct CountingSink {
        writes: usize,
    }

    impl MotorSink for CountingSink {
        type Error = MotorError;

        fn set_power(&mut self, _motor: MotorIndex, _power: f64) -> Result<(), MotorError> {
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn guard_stops_on_drop() {
        let mut model = Mecanum::new(CountingSink::default());

        {
            let mut guard = StopGuard::new(&mut model);
            guard.drive_arcade(0.5, 0.0).unwrap();
            assert!(!guard.powers().is_zero());
        }

        assert!(model.powers().is_zero());
        assert_eq!(model.sink().writes, 8);
    }

    #[test]
    fn finish_stops_once() {
        let mut model = Mecanum::new(CountingSink::default());

        let mut guard = StopGuard::new(&mut model);
        guard.drive_arcade(0.0, 0.3).unwrap();
        guard.finish().unwrap();

        assert!(model.powers().is_zero());
        assert_eq!(model.sink().writes, 8);
    }
}
