use core::f64::consts::PI;
use std::time::Duration;

use blueshift_control::Clock;
use blueshift_drivetrain::{
    model::{Arcade, EncoderDrive},
    StopGuard,
};

use crate::MotionError;

/// Inches in a foot.
const INCHES_PER_FOOT: f64 = 12.0;

/// Converts between wheel travel and encoder ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncoderGeometry {
    /// Encoder ticks per revolution of the bare motor shaft.
    pub counts_per_motor_rev: f64,

    /// Gearbox reduction between motor shaft and wheel.
    pub gear_reduction: f64,

    /// Wheel diameter, in inches.
    pub wheel_diameter: f64,
}

impl EncoderGeometry {
    /// 28-count motor through a 40:1 gearbox on four-inch wheels.
    pub const HD_HEX_40: Self = Self {
        counts_per_motor_rev: 28.0,
        gear_reduction: 40.0,
        wheel_diameter: 4.0,
    };

    /// Encoder ticks per inch of wheel travel.
    #[must_use]
    pub fn counts_per_inch(&self) -> f64 {
        (self.counts_per_motor_rev * self.gear_reduction) / (self.wheel_diameter * PI)
    }

    /// Encoder ticks covering `inches` of travel.
    #[must_use]
    pub fn ticks_for_inches(&self, inches: f64) -> f64 {
        inches * self.counts_per_inch()
    }

    /// Encoder ticks covering `feet` of travel.
    #[must_use]
    pub fn ticks_for_feet(&self, feet: f64) -> f64 {
        self.ticks_for_inches(feet * INCHES_PER_FOOT)
    }
}

impl Default for EncoderGeometry {
    fn default() -> Self {
        Self::HD_HEX_40
    }
}

/// Terminal state of an encoder drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriveOutcome {
    /// The wheels covered the requested distance.
    Reached,

    /// The timeout elapsed first.
    TimedOut,
}

/// Drives straight for a measured distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncoderDriving {
    /// Magnitude of the drive command, in `[0, 1]`.
    pub speed: f64,

    /// Longest the drive may run, or `None` to run until the distance is covered.
    pub timeout: Option<Duration>,

    /// Time between encoder samples.
    pub poll_interval: Duration,

    /// Wheel and gearbox dimensions.
    pub geometry: EncoderGeometry,
}

impl Default for EncoderDriving {
    fn default() -> Self {
        Self {
            speed: 0.5,
            timeout: Some(Duration::from_millis(6250)),
            poll_interval: Duration::from_millis(5),
            geometry: EncoderGeometry::HD_HEX_40,
        }
    }
}

impl EncoderDriving {
    /// Drives `inches` forward, or backward if negative.
    pub fn drive_distance<M, C>(
        &self,
        model: &mut M,
        clock: &mut C,
        inches: f64,
    ) -> Result<DriveOutcome, MotionError<M::Error>>
    where
        M: Arcade + EncoderDrive,
        C: Clock,
    {
        self.drive_ticks(model, clock, self.geometry.ticks_for_inches(inches))
    }

    /// Drives until the wheels have turned through `ticks` encoder counts. The sign of `ticks`
    /// picks the direction.
    pub fn drive_ticks<M, C>(
        &self,
        model: &mut M,
        clock: &mut C,
        ticks: f64,
    ) -> Result<DriveOutcome, MotionError<M::Error>>
    where
        M: Arcade + EncoderDrive,
        C: Clock,
    {
        let start_time = clock.now();
        let target = ticks.abs();
        let mut model = StopGuard::new(model);

        model.reset_encoders().map_err(MotionError::Drivetrain)?;

        loop {
            let travelled = model.average_ticks().map_err(MotionError::Drivetrain)?;

            if travelled >= target {
                model.finish().map_err(MotionError::Drivetrain)?;
                log::info!("Encoder drive reached {travelled:.0} of {target:.0} ticks.");
                return Ok(DriveOutcome::Reached);
            }

            if self
                .timeout
                .is_some_and(|timeout| clock.since(start_time) > timeout)
            {
                model.finish().map_err(MotionError::Drivetrain)?;
                log::warn!("Encoder drive timed out after {travelled:.0} of {target:.0} ticks.");
                return Ok(DriveOutcome::TimedOut);
            }

            model
                .drive_arcade(self.speed.abs() * ticks.signum(), 0.0)
                .map_err(MotionError::Drivetrain)?;

            log::trace!("encoder drive at {travelled:.0} of {target:.0} ticks");
            clock.sleep(self.poll_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBase;
    use approx::assert_abs_diff_eq;
    use blueshift_control::ManualClock;
    use blueshift_drivetrain::model::{DrivetrainModel, Mecanum};

    #[test]
    fn geometry_matches_drive_train() {
        let geometry = EncoderGeometry::HD_HEX_40;

        assert_abs_diff_eq!(geometry.counts_per_inch(), 1120.0 / (4.0 * PI));
        assert_abs_diff_eq!(geometry.ticks_for_feet(1.0), 12.0 * 1120.0 / (4.0 * PI));
    }

    #[test]
    fn reaches_target_and_stops() {
        let mut model = Mecanum::new(SimBase::default());
        let mut clock = ManualClock::new();

        let outcome = EncoderDriving::default()
            .drive_ticks(&mut model, &mut clock, 1000.0)
            .unwrap();

        assert_eq!(outcome, DriveOutcome::Reached);
        assert!(model.powers().is_zero());
        assert!(model.average_ticks().unwrap() >= 1000.0);
    }

    #[test]
    fn times_out_when_wheels_barely_move() {
        let mut model = Mecanum::new(SimBase::default());
        let mut clock = ManualClock::new();
        let driving = EncoderDriving {
            speed: 0.001,
            timeout: Some(Duration::from_millis(100)),
            ..Default::default()
        };

        let outcome = driving.drive_ticks(&mut model, &mut clock, 1000.0).unwrap();

        assert_eq!(outcome, DriveOutcome::TimedOut);
        assert!(clock.now() > Duration::from_millis(100));
        assert_eq!(model.sink().last_written(), [0.0; 4]);
    }

    #[test]
    fn zero_distance_never_powers_the_motors() {
        let mut model = Mecanum::new(SimBase::default());
        let mut clock = ManualClock::new();

        let outcome = EncoderDriving::default()
            .drive_ticks(&mut model, &mut clock, 0.0)
            .unwrap();

        assert_eq!(outcome, DriveOutcome::Reached);
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(model.sink().peak_power(), 0.0);
    }
}
