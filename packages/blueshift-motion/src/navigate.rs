use blueshift_control::Clock;
use blueshift_drivetrain::{
    model::{Arcade, EncoderDrive},
    Drivetrain,
};
use blueshift_math::FieldPoint;
use blueshift_tracking::TracksHeading;

use crate::{DriveOutcome, EncoderDriving, HeadingController, MotionError, TurnOutcome};

/// Point-to-point navigation by turning and then driving straight.
///
/// The navigator keeps track of where the robot is on the field. Headings are taken to be measured
/// in the field frame, so a zeroed gyroscope must point along the positive x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Navigator {
    /// Turns the robot to face each destination.
    pub heading_controller: HeadingController,

    /// Drives the robot to each destination once it is facing it.
    pub encoder_driving: EncoderDriving,

    location: FieldPoint,
}

impl Navigator {
    /// Creates a navigator for a robot starting at `location`.
    #[must_use]
    pub const fn new(
        location: FieldPoint,
        heading_controller: HeadingController,
        encoder_driving: EncoderDriving,
    ) -> Self {
        Self {
            heading_controller,
            encoder_driving,
            location,
        }
    }

    /// Where the robot is believed to be.
    #[must_use]
    pub const fn location(&self) -> FieldPoint {
        self.location
    }

    /// Overrides the believed location, for example after lining up against a wall.
    pub const fn set_location(&mut self, location: FieldPoint) {
        self.location = location;
    }

    /// Turns toward `destination` and drives to it.
    ///
    /// The tracked location only moves when the drive reaches the destination. If the turn times
    /// out the robot does not drive at all, since it would head off in the wrong direction. A
    /// destination closer than one encoder tick is reached without moving.
    pub fn drive_to_point<M, T, C>(
        &mut self,
        drivetrain: &mut Drivetrain<M, T>,
        clock: &mut C,
        destination: FieldPoint,
    ) -> Result<DriveOutcome, MotionError<M::Error>>
    where
        M: Arcade + EncoderDrive,
        T: TracksHeading,
        C: Clock,
    {
        let distance = self.location.distance_to(&destination);
        if self.encoder_driving.geometry.ticks_for_inches(distance) < 1.0 {
            log::debug!("Already at {destination}.");
            self.location = destination;
            return Ok(DriveOutcome::Reached);
        }

        let bearing = self.location.bearing_to(&destination);
        log::info!(
            "Driving from {} to {destination}: {distance:.1} in at {bearing}.",
            self.location
        );

        let turn = self
            .heading_controller
            .turn_to_heading(drivetrain, bearing)
            .run(clock)?;

        if turn == TurnOutcome::TimedOut {
            return Ok(DriveOutcome::TimedOut);
        }

        let outcome = self
            .encoder_driving
            .drive_distance(&mut drivetrain.model, clock, distance)?;

        if outcome == DriveOutcome::Reached {
            self.location = destination;
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        sim::{SimBase, SimGyro},
        TurnSettings,
    };
    use blueshift_control::ManualClock;
    use blueshift_drivetrain::model::Mecanum;
    use core::f64::consts::FRAC_PI_2;
    use std::time::Duration;

    #[test]
    fn faces_destination_then_drives() {
        let base = SimBase::default();
        let mut dt = Drivetrain::new(Mecanum::new(base.clone()), SimGyro::new(base, 0.0, 1.0));
        let mut clock = ManualClock::new();
        let mut navigator = Navigator::new(
            FieldPoint::ORIGIN,
            HeadingController::default(),
            EncoderDriving::default(),
        );

        let outcome = navigator
            .drive_to_point(&mut dt, &mut clock, FieldPoint::new(0.0, 6.0))
            .unwrap();

        assert_eq!(outcome, DriveOutcome::Reached);
        assert_eq!(navigator.location(), FieldPoint::new(0.0, 6.0));

        let tolerance = TurnSettings::QUARTER_TURN.tolerances.error_tolerance.unwrap();
        assert!((dt.tracking.true_heading() - FRAC_PI_2).abs() < tolerance);
    }

    #[test]
    fn stuck_turn_does_not_drive() {
        let base = SimBase::default();
        let mut gyro = SimGyro::new(base.clone(), 0.0, 1.0);
        gyro.stall();
        let mut dt = Drivetrain::new(Mecanum::new(base), gyro);
        let mut clock = ManualClock::new();
        let mut navigator = Navigator::new(
            FieldPoint::ORIGIN,
            HeadingController::new(TurnSettings {
                timeout: Some(Duration::from_millis(50)),
                ..TurnSettings::QUARTER_TURN
            }),
            EncoderDriving::default(),
        );

        let outcome = navigator
            .drive_to_point(&mut dt, &mut clock, FieldPoint::new(0.0, 6.0))
            .unwrap();

        assert_eq!(outcome, DriveOutcome::TimedOut);
        assert_eq!(navigator.location(), FieldPoint::ORIGIN);
    }

    #[test]
    fn current_location_is_reached_in_place() {
        let base = SimBase::default();
        let mut dt = Drivetrain::new(Mecanum::new(base.clone()), SimGyro::new(base, 2.0, 1.0));
        let mut clock = ManualClock::new();
        let mut navigator = Navigator::new(
            FieldPoint::new(5.0, 5.0),
            HeadingController::default(),
            EncoderDriving::default(),
        );

        let outcome = navigator
            .drive_to_point(&mut dt, &mut clock, FieldPoint::new(5.0, 5.0))
            .unwrap();

        assert_eq!(outcome, DriveOutcome::Reached);
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(dt.tracking.true_heading(), 2.0);
        assert_eq!(dt.model.sink().peak_power(), 0.0);
    }
}
