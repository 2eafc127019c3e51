//! Driver control gamepad mapping.
//!
//! The right stick drives the mecanum chassis in any direction, with the left stick's x axis
//! adding rotation. When the right stick is centered, the left stick alone drives it like a tank:
//! forward and back on y, turning on x. Triggers run the glyph intake and conveyor, and bumpers
//! run them in reverse.

use core::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::{
    config::DriverConfig,
    drivetrain::model::{Arcade, Holonomic},
    math::Angle,
};

/// Position of an analog stick, each axis in `[-1, 1]`.
///
/// Like most gamepads, `y` is positive when the stick is pulled *down*.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Stick {
    /// Horizontal deflection, positive to the right.
    pub x: f64,

    /// Vertical deflection, positive toward the driver.
    pub y: f64,
}

impl Stick {
    /// Creates a stick position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// `true` if either axis is deflected at least `tolerance`.
    #[must_use]
    pub fn is_active(&self, tolerance: f64) -> bool {
        self.x.abs() >= tolerance || self.y.abs() >= tolerance
    }
}

/// Snapshot of a gamepad.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Gamepad {
    /// Left analog stick.
    pub left_stick: Stick,

    /// Right analog stick.
    pub right_stick: Stick,

    /// Left trigger travel, in `[0, 1]`.
    pub left_trigger: f64,

    /// Right trigger travel, in `[0, 1]`.
    pub right_trigger: f64,

    /// Left bumper.
    pub left_bumper: bool,

    /// Right bumper.
    pub right_bumper: bool,

    /// D-pad up.
    pub dpad_up: bool,

    /// D-pad down.
    pub dpad_down: bool,
}

/// What the drive motors should do this loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriveCommand {
    /// Translate toward `direction`, measured counterclockwise from the robot's right, while
    /// rotating.
    Vector {
        /// Direction of travel, in `[0, 2π)`.
        direction: Angle,

        /// Translation speed.
        speed: f64,

        /// Rotation command.
        turn: f64,
    },

    /// Drive forward or back while steering.
    Tank {
        /// Forward command.
        throttle: f64,

        /// Steering command.
        steer: f64,
    },

    /// Stop all drive motors.
    Stop,
}

impl DriveCommand {
    /// Sends this command to a drivetrain.
    pub fn apply<M: Holonomic + Arcade>(self, model: &mut M) -> Result<(), M::Error> {
        match self {
            Self::Vector {
                direction,
                speed,
                turn,
            } => model.drive_vector(direction, speed, turn),
            Self::Tank { throttle, steer } => model.drive_arcade(throttle, steer),
            Self::Stop => model.stop(),
        }
    }
}

/// Maps the drive sticks to a [`DriveCommand`].
///
/// Stick deflections under the configured controller tolerance are ignored. The right stick has
/// priority over the left. `multiplier` scales translation but never rotation.
#[must_use]
pub fn map_sticks(gamepad: &Gamepad, settings: &DriverConfig, multiplier: f64) -> DriveCommand {
    let tolerance = settings.controller_tolerance;
    let Stick { x, y } = gamepad.right_stick;

    if gamepad.right_stick.is_active(tolerance) {
        let (direction, speed) = if x != 0.0 && y != 0.0 {
            (f64::atan2(-y, x), x.hypot(y))
        } else if y != 0.0 {
            (if -y > 0.0 { FRAC_PI_2 } else { 3.0 * FRAC_PI_2 }, y.abs())
        } else {
            (if x > 0.0 { 0.0 } else { PI }, x.abs())
        };

        let direction = if direction < 0.0 {
            direction + TAU
        } else {
            direction
        };
        let speed = if settings.square_sticks {
            speed * speed
        } else {
            speed
        };

        DriveCommand::Vector {
            direction: Angle::from_radians(direction),
            speed: speed * multiplier,
            turn: gamepad.left_stick.x,
        }
    } else if gamepad.left_stick.is_active(tolerance) {
        DriveCommand::Tank {
            throttle: -gamepad.left_stick.y * multiplier,
            steer: gamepad.left_stick.x,
        }
    } else {
        DriveCommand::Stop
    }
}

/// Translation speed scale toggled from the d-pad.
///
/// Pressing up reverses the robot's notion of forward. Pressing down switches between full and half
/// speed. Each press toggles once no matter how long the button is held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedMultiplier {
    value: f64,
    up_held: bool,
    down_held: bool,
}

impl SpeedMultiplier {
    /// Full speed, forward.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: 1.0,
            up_held: false,
            down_held: false,
        }
    }

    /// The current multiplier.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Reacts to new d-pad presses and returns the updated multiplier.
    pub fn update(&mut self, gamepad: &Gamepad) -> f64 {
        if gamepad.dpad_up && !self.up_held {
            self.value = -self.value;
            log::debug!("Speed multiplier reversed to {}.", self.value);
        }

        if gamepad.dpad_down && !self.down_held {
            let magnitude: f64 = if self.value.abs() < 1.0 { 1.0 } else { 0.5 };
            self.value = magnitude.copysign(self.value);
            log::debug!("Speed multiplier set to {}.", self.value);
        }

        self.up_held = gamepad.dpad_up;
        self.down_held = gamepad.dpad_down;

        self.value
    }
}

impl Default for SpeedMultiplier {
    fn default() -> Self {
        Self::new()
    }
}

/// Powers for the glyph-handling motors.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct IntakeCommand {
    /// Ground intake wheels; positive pulls glyphs in.
    pub glyph: f64,

    /// Conveyor belts; positive lifts glyphs up.
    pub conveyor: f64,
}

/// Maps the triggers and bumpers to an [`IntakeCommand`].
///
/// A pulled trigger runs its mechanism inward, taking priority over the bumper on the same side,
/// which runs it outward at the configured outtake power.
#[must_use]
pub fn map_intake(gamepad: &Gamepad, settings: &DriverConfig) -> IntakeCommand {
    let shape = |trigger: f64| {
        if settings.square_triggers {
            trigger * trigger
        } else {
            trigger
        }
    };

    let glyph = if gamepad.left_trigger > 0.0 {
        shape(gamepad.left_trigger)
    } else if gamepad.left_bumper {
        -settings.outtake_power
    } else {
        0.0
    };

    let conveyor = if gamepad.right_trigger > 0.0 {
        shape(gamepad.right_trigger)
    } else if gamepad.right_bumper {
        -settings.conveyor_outtake_power
    } else {
        0.0
    };

    IntakeCommand { glyph, conveyor }
}
