use core::f64::consts::{FRAC_PI_2, PI};
use std::time::Duration;

use blueshift_control::{
    loops::{AngularBangBang, Feedback},
    Clock, ErrorMode, Tolerances,
};
use blueshift_drivetrain::{model::Arcade, Drivetrain, StopGuard};
use blueshift_math::Angle;
use blueshift_tracking::TracksHeading;

use crate::MotionError;

/// Sign convention linking rotation commands to heading changes.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// A positive rotation command increases the heading.
    #[default]
    Normal,

    /// A positive rotation command decreases the heading.
    Inverted,
}

impl Polarity {
    /// `1.0` for [`Polarity::Normal`], `-1.0` for [`Polarity::Inverted`].
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Normal => 1.0,
            Self::Inverted => -1.0,
        }
    }
}

/// Which way to turn, as seen from above with headings increasing counterclockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Counterclockwise.
    Left,

    /// Clockwise.
    Right,
}

impl Side {
    /// `1.0` for [`Side::Left`], `-1.0` for [`Side::Right`].
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }
}

/// Terminal state of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnOutcome {
    /// The heading entered the tolerance band around the target.
    Converged,

    /// The timeout elapsed before the heading reached the target.
    TimedOut,
}

/// Parameters of a heading-controlled turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnSettings {
    /// Magnitude of the rotation command, in `[0, 1]`.
    pub speed: f64,

    /// Settling conditions; the error tolerance is in radians.
    pub tolerances: Tolerances,

    /// Longest the turn may run, or `None` to run until settled.
    pub timeout: Option<Duration>,

    /// Sign convention of the drivetrain's rotation command.
    pub polarity: Polarity,

    /// How heading error is computed.
    pub error_mode: ErrorMode,

    /// Amount cut from relative turns to make up for the robot coasting past the target after the
    /// motors stop.
    pub overshoot: Angle,

    /// Time between heading samples.
    pub poll_interval: Duration,
}

impl TurnSettings {
    /// Ninety-degree turns: quarter power, π/64 tolerance, 0.23 rad of overshoot compensation.
    pub const QUARTER_TURN: Self = Self {
        speed: 0.25,
        tolerances: Tolerances::new().error(PI / 64.0),
        timeout: Some(Duration::from_millis(5000)),
        polarity: Polarity::Normal,
        error_mode: ErrorMode::Shortest,
        overshoot: Angle::from_radians(0.23),
        poll_interval: Duration::from_millis(5),
    };

    /// Small corrective turns: 0.19 power, π/90 tolerance, 2.5 second timeout.
    pub const SLIGHT_TURN: Self = Self {
        speed: 0.19,
        tolerances: Tolerances::new().error(PI / 90.0),
        timeout: Some(Duration::from_millis(2500)),
        polarity: Polarity::Normal,
        error_mode: ErrorMode::Shortest,
        overshoot: Angle::ZERO,
        poll_interval: Duration::from_millis(5),
    };
}

impl Default for TurnSettings {
    fn default() -> Self {
        Self::QUARTER_TURN
    }
}

/// Turns the robot in place until its heading matches a target.
///
/// The controller drives a fixed-magnitude rotation command toward the target (see
/// [`AngularBangBang`]) and stops on the first heading sample inside the tolerance band. With
/// [`ErrorMode::Shortest`] the robot always turns the short way around, even when the target and
/// current heading sit on opposite sides of the sensor's wrap point.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct HeadingController {
    /// Settings applied to every turn started by this controller.
    pub settings: TurnSettings,
}

impl HeadingController {
    /// Creates a controller using `settings`.
    #[must_use]
    pub const fn new(settings: TurnSettings) -> Self {
        Self { settings }
    }

    /// Turns to an absolute heading.
    pub fn turn_to_heading<'a, M: Arcade, T: TracksHeading>(
        &self,
        drivetrain: &'a mut Drivetrain<M, T>,
        target: Angle,
    ) -> TurnMotion<'a, M, T> {
        TurnMotion::new(drivetrain, Target::Absolute(target), self.settings)
    }

    /// Turns by `delta` relative to the heading at the start of the turn.
    ///
    /// The configured overshoot is cut from the magnitude of `delta`.
    pub fn turn_by<'a, M: Arcade, T: TracksHeading>(
        &self,
        drivetrain: &'a mut Drivetrain<M, T>,
        delta: Angle,
    ) -> TurnMotion<'a, M, T> {
        TurnMotion::new(drivetrain, Target::Relative(delta), self.settings)
    }

    /// Turns ninety degrees toward `side`.
    pub fn quarter_turn<'a, M: Arcade, T: TracksHeading>(
        &self,
        drivetrain: &'a mut Drivetrain<M, T>,
        side: Side,
    ) -> TurnMotion<'a, M, T> {
        self.turn_by(drivetrain, Angle::from_radians(side.sign() * FRAC_PI_2))
    }

    /// Turns π/20 toward `side` using [`TurnSettings::SLIGHT_TURN`], keeping this controller's
    /// polarity and error mode.
    pub fn slight_turn<'a, M: Arcade, T: TracksHeading>(
        &self,
        drivetrain: &'a mut Drivetrain<M, T>,
        side: Side,
    ) -> TurnMotion<'a, M, T> {
        let settings = TurnSettings {
            polarity: self.settings.polarity,
            error_mode: self.settings.error_mode,
            ..TurnSettings::SLIGHT_TURN
        };

        TurnMotion::new(
            drivetrain,
            Target::Relative(Angle::from_radians(side.sign() * PI / 20.0)),
            settings,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Target {
    Absolute(Angle),
    Relative(Angle),
}

/// A pending turn.
///
/// Created by [`HeadingController`]. Adjust it with the `with_*` modifiers, then call
/// [`TurnMotion::run`] to block until the turn finishes.
#[must_use = "turns do nothing until they are run"]
pub struct TurnMotion<'a, M: Arcade, T: TracksHeading> {
    drivetrain: &'a mut Drivetrain<M, T>,
    target: Target,
    settings: TurnSettings,
}

impl<'a, M: Arcade, T: TracksHeading> TurnMotion<'a, M, T> {
    const fn new(drivetrain: &'a mut Drivetrain<M, T>, target: Target, settings: TurnSettings) -> Self {
        Self {
            drivetrain,
            target,
            settings,
        }
    }

    /// Modifies this turn's rotation speed.
    pub const fn with_speed(&mut self, speed: f64) -> &mut Self {
        self.settings.speed = speed;
        self
    }

    /// Modifies this turn's error tolerance.
    pub const fn with_tolerance(&mut self, tolerance: Angle) -> &mut Self {
        self.settings.tolerances = Tolerances::new().error(tolerance.as_radians());
        self
    }

    /// Modifies this turn's timeout duration.
    pub const fn with_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.settings.timeout = Some(timeout);
        self
    }

    /// Removes this turn's timeout duration.
    pub const fn without_timeout(&mut self) -> &mut Self {
        self.settings.timeout = None;
        self
    }

    /// Modifies this turn's polarity.
    pub const fn with_polarity(&mut self, polarity: Polarity) -> &mut Self {
        self.settings.polarity = polarity;
        self
    }

    /// Modifies how this turn computes heading error.
    pub const fn with_error_mode(&mut self, error_mode: ErrorMode) -> &mut Self {
        self.settings.error_mode = error_mode;
        self
    }

    /// Modifies this turn's overshoot compensation.
    pub const fn with_overshoot(&mut self, overshoot: Angle) -> &mut Self {
        self.settings.overshoot = overshoot;
        self
    }

    /// Runs the turn to completion.
    ///
    /// The motors are stopped before this returns, whatever the result.
    pub fn run<C: Clock>(&mut self, clock: &mut C) -> Result<TurnOutcome, MotionError<M::Error>> {
        let settings = self.settings;
        let pending = self.target;
        let mut controller = AngularBangBang::new(settings.speed, settings.error_mode);

        let start_time = clock.now();
        let mut prev_time = start_time;
        let mut target = None;

        let mut model = StopGuard::new(&mut self.drivetrain.model);
        let tracking = &mut self.drivetrain.tracking;

        loop {
            let heading = tracking.heading().inspect_err(|err| {
                log::error!("Aborting turn, heading unavailable: {err}");
            })?;

            let target = *target.get_or_insert_with(|| resolve(pending, heading, settings.overshoot));
            let error = settings.error_mode.error(heading, target);

            if settings.tolerances.check(error.as_radians()) {
                model.finish().map_err(MotionError::Drivetrain)?;
                log::info!("Turn converged at {heading} (target {target}).");
                return Ok(TurnOutcome::Converged);
            }

            if settings
                .timeout
                .is_some_and(|timeout| clock.since(start_time) > timeout)
            {
                model.finish().map_err(MotionError::Drivetrain)?;
                log::warn!("Turn timed out at {heading} (target {target}, error {error}).");
                return Ok(TurnOutcome::TimedOut);
            }

            let dt = clock.since(prev_time);
            prev_time = clock.now();

            let output = controller.update(heading, target, dt) * settings.polarity.sign();
            log::trace!("heading {heading}, error {error}, rotation {output:.3}");

            model
                .drive_arcade(0.0, output)
                .map_err(MotionError::Drivetrain)?;

            clock.sleep(settings.poll_interval);
        }
    }
}

fn resolve(target: Target, heading: Angle, overshoot: Angle) -> Angle {
    match target {
        Target::Absolute(target) => target,
        Target::Relative(delta) => {
            let magnitude = (delta.abs() - overshoot.abs()).as_radians().max(0.0);
            heading + Angle::from_radians(delta.signum() * magnitude)
        }
    }
}
