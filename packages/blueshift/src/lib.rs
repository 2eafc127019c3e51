//! Autonomous and driver-control building blocks for FTC robots.
//!
//! This crate re-exports the blueshift component crates under one roof and adds the pieces that
//! tie them to a particular robot: a TOML [`config`] file, [`opcontrol`] gamepad mapping, and a
//! [`sim`]ulated robot for exercising routines off the field.
//!
//! # Example
//!
//! ```
//! use blueshift::prelude::*;
//! use blueshift::sim::SimulatedRobot;
//!
//! let reversed = [true, false, true, false];
//! let robot = SimulatedRobot::new(reversed);
//! let mut clock = robot.clock();
//! let mut dt = Drivetrain::new(
//!     Mecanum::with_reversed(robot.motors(), reversed),
//!     Gyroscope::new(robot.imu()).unwrap(),
//! );
//!
//! let outcome = HeadingController::default()
//!     .quarter_turn(&mut dt, Side::Left)
//!     .run(&mut clock)
//!     .unwrap();
//!
//! assert_eq!(outcome, TurnOutcome::Converged);
//! ```

pub mod config;
pub mod opcontrol;
pub mod sim;

pub use blueshift_control as control;
pub use blueshift_drivetrain as drivetrain;
pub use blueshift_math as math;
pub use blueshift_motion as motion;
pub use blueshift_tracking as tracking;
pub use blueshift_vision as vision;

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        config::RobotConfig,
        control::{Clock, ErrorMode, ManualClock, SystemClock, Tolerances},
        drivetrain::{
            Drivetrain,
            model::{Arcade, Differential, DrivetrainModel, EncoderDrive, Holonomic, Mecanum, Tank},
            motor::{MotorIndex, MotorPowers},
        },
        math::{Angle, FieldPoint, IntoAngle},
        motion::{
            DriveOutcome, EncoderDriving, HeadingController, MotionError, Navigator, Polarity,
            Side, TurnOutcome, TurnSettings, stop_gradually,
        },
        tracking::{Gyroscope, SensorError, TracksHeading},
        vision::{JewelCamera, JewelSensor, JewelState, MarkerTracker, VuMark},
    };
}
