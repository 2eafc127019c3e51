//! Simulated chassis for exercising motions in tests.

use std::{cell::RefCell, rc::Rc};

use blueshift_drivetrain::motor::{Encoders, MotorError, MotorIndex, MotorSink};
use blueshift_math::{Angle, IntoAngle};
use blueshift_tracking::{SensorError, TracksHeading};

/// Heading change per read, in radians, for a full-power rotation command.
const TURN_PER_READ: f64 = 0.05;

/// Encoder ticks per read for a full-power wheel.
const TICKS_PER_READ: f64 = 40.0;

#[derive(Default, Debug)]
struct State {
    powers: [f64; 4],
    ticks: [f64; 4],
    rotation_history: Vec<f64>,
    peak_power: f64,
}

/// Motor bank shared with a [`SimGyro`].
#[derive(Default, Debug, Clone)]
pub struct SimBase(Rc<RefCell<State>>);

impl SimBase {
    /// Rotation component of the current power vector.
    fn rotation(&self) -> f64 {
        let [lb, lf, rb, rf] = self.0.borrow().powers;
        (lf + rf - lb - rb) / 4.0
    }

    /// Every nonzero rotation command written so far.
    pub fn rotation_history(&self) -> Vec<f64> {
        self.0.borrow().rotation_history.clone()
    }

    /// Number of nonzero rotation commands written so far.
    pub fn rotation_commands(&self) -> usize {
        self.0.borrow().rotation_history.len()
    }

    /// Powers currently applied to the motors.
    pub fn last_written(&self) -> [f64; 4] {
        self.0.borrow().powers
    }

    /// Largest power magnitude any motor has been given.
    pub fn peak_power(&self) -> f64 {
        self.0.borrow().peak_power
    }
}

impl MotorSink for SimBase {
    type Error = MotorError;

    fn set_power(&mut self, motor: MotorIndex, power: f64) -> Result<(), MotorError> {
        {
            let mut state = self.0.borrow_mut();
            state.powers[motor.as_usize()] = power;
            state.peak_power = state.peak_power.max(power.abs());
        }

        // The right front motor is written last, completing a vector.
        if motor == MotorIndex::RightFront {
            let rotation = self.rotation();
            if rotation != 0.0 {
                self.0.borrow_mut().rotation_history.push(rotation);
            }
        }

        Ok(())
    }
}

impl Encoders for SimBase {
    fn reset_encoders(&mut self) -> Result<(), MotorError> {
        self.0.borrow_mut().ticks = [0.0; 4];
        Ok(())
    }

    fn encoder_position(&mut self, motor: MotorIndex) -> Result<i32, MotorError> {
        let mut state = self.0.borrow_mut();
        let index = motor.as_usize();
        state.ticks[index] += state.powers[index] * TICKS_PER_READ;

        Ok(state.ticks[index] as i32)
    }
}

/// Gyroscope whose heading follows the rotation commanded on a [`SimBase`].
#[derive(Debug)]
pub struct SimGyro {
    base: SimBase,
    heading: f64,
    rate: f64,
    stalled: bool,
    reads_before_failure: Option<usize>,
}

impl SimGyro {
    /// `rate` scales how much the heading moves per read for a given rotation command; a negative
    /// rate models a drivetrain whose positive rotation turns clockwise.
    pub const fn new(base: SimBase, heading: f64, rate: f64) -> Self {
        Self {
            base,
            heading,
            rate,
            stalled: false,
            reads_before_failure: None,
        }
    }

    /// Stops the simulated robot from turning, as if its wheels were stuck.
    pub const fn stall(&mut self) {
        self.stalled = true;
    }

    /// Fails every read after the next `reads` successful ones.
    pub const fn fail_after(&mut self, reads: usize) {
        self.reads_before_failure = Some(reads);
    }

    /// Heading the simulated robot is actually pointing, ignoring read failures.
    pub const fn true_heading(&self) -> f64 {
        self.heading
    }
}

impl TracksHeading for SimGyro {
    fn heading(&mut self) -> Result<Angle, SensorError> {
        if let Some(remaining) = self.reads_before_failure.as_mut() {
            if *remaining == 0 {
                return Err(SensorError::Unavailable(String::from("simulated IMU offline")));
            }
            *remaining -= 1;
        }

        if !self.stalled {
            self.heading += self.base.rotation() * self.rate * TURN_PER_READ;
        }

        Ok(self.heading.rad())
    }
}
