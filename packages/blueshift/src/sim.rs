//! A simulated robot for running routines off the field.
//!
//! [`SimulatedRobot`] models a mecanum chassis with drive encoders, an IMU, a jewel color sensor, a
//! camera and a pictograph tracker. Each piece of hardware is handed out as a separate handle that
//! implements the matching driver trait, so the handles can be wired into the real drivetrain,
//! tracking and vision types. All handles share one world.
//!
//! Time only passes when the [`SimClock`] is slept on. The chassis responds instantly to power
//! changes: there is no inertia and no wheel slip.

use core::f64::consts::FRAC_1_SQRT_2;
use std::{cell::RefCell, rc::Rc, time::Duration};

use crate::{
    control::Clock,
    drivetrain::motor::{Encoders, MotorError, MotorIndex, MotorSink},
    math::{Angle, FieldPoint},
    motion::EncoderGeometry,
    tracking::{Imu, Orientation, SensorError},
    vision::{ColorReading, ColorSensor, Frame, FrameSource, MarkerSource, VuMark},
};

/// Turn rate at a full-power rotation command, in radians per second.
const TURN_RATE: f64 = 3.0;

/// Encoder rate of a wheel at full power, in ticks per second.
const TICK_RATE: f64 = 2800.0;

/// Standard gravity, in m/s².
const GRAVITY: f64 = 9.81;

#[derive(Debug)]
struct World {
    time: Duration,
    reversed: [bool; 4],
    geometry: EncoderGeometry,

    powers: [f64; 4],
    ticks: [f64; 4],
    heading: f64,
    position: FieldPoint,
    stalled: bool,
    disconnected: Option<MotorIndex>,
    imu_online: bool,

    jewel: ColorReading,
    led: bool,
    frame: Option<Frame>,
    marker: VuMark,
    marker_delay: Duration,
    tracking_since: Option<Duration>,
}

impl World {
    /// Powers in the chassis frame, with motor mounting undone.
    fn chassis_powers(&self) -> [f64; 4] {
        let mut powers = self.powers;
        for (power, reversed) in powers.iter_mut().zip(self.reversed) {
            if reversed {
                *power = -*power;
            }
        }

        powers
    }

    fn step(&mut self, dt: Duration) {
        self.time += dt;

        if self.stalled {
            return;
        }

        let seconds = dt.as_secs_f64();
        let [lb, lf, rb, rf] = self.chassis_powers();

        for (ticks, power) in self.ticks.iter_mut().zip(self.powers) {
            *ticks += power * TICK_RATE * seconds;
        }

        // Invert the mecanum kinematics: the wheel pairs carry the two diagonal components.
        let (cos, sin) = ((lb + rf) / 2.0, (lf + rb) / 2.0);
        let right = (cos + sin) * FRAC_1_SQRT_2;
        let forward = (sin - cos) * FRAC_1_SQRT_2;
        let inches = FRAC_1_SQRT_2 * TICK_RATE * seconds / self.geometry.counts_per_inch();

        let (heading_sin, heading_cos) = self.heading.sin_cos();
        self.position.translate(
            (forward * heading_cos + right * heading_sin) * inches,
            (forward * heading_sin - right * heading_cos) * inches,
        );

        self.heading += (lf + rf - lb - rb) / 4.0 * TURN_RATE * seconds;
    }
}

/// A simulated mecanum robot.
///
/// Cloning gives another reference to the same robot.
#[derive(Debug, Clone)]
pub struct SimulatedRobot(Rc<RefCell<World>>);

impl SimulatedRobot {
    /// Creates a robot at the field origin facing along the x axis.
    ///
    /// `reversed` marks the motors mounted backward, in
    /// [`MotorIndex::ALL`](crate::drivetrain::motor::MotorIndex::ALL) order. The drivetrain must be
    /// built with the same flags for commands to move the robot the intended way.
    #[must_use]
    pub fn new(reversed: [bool; 4]) -> Self {
        Self(Rc::new(RefCell::new(World {
            time: Duration::ZERO,
            reversed,
            geometry: EncoderGeometry::HD_HEX_40,
            powers: [0.0; 4],
            ticks: [0.0; 4],
            heading: 0.0,
            position: FieldPoint::ORIGIN,
            stalled: false,
            disconnected: None,
            imu_online: true,
            jewel: ColorReading::default(),
            led: false,
            frame: None,
            marker: VuMark::Unknown,
            marker_delay: Duration::ZERO,
            tracking_since: None,
        })))
    }

    // MARK: Handles

    /// Simulated time.
    #[must_use]
    pub fn clock(&self) -> SimClock {
        SimClock(self.clone())
    }

    /// The four drive motors and their encoders.
    #[must_use]
    pub fn motors(&self) -> SimMotors {
        SimMotors(self.clone())
    }

    /// The IMU.
    #[must_use]
    pub fn imu(&self) -> SimImu {
        SimImu(self.clone())
    }

    /// The jewel color sensor.
    #[must_use]
    pub fn color_sensor(&self) -> SimColorSensor {
        SimColorSensor(self.clone())
    }

    /// The camera.
    #[must_use]
    pub fn camera(&self) -> SimCamera {
        SimCamera(self.clone())
    }

    /// The pictograph tracker.
    #[must_use]
    pub fn markers(&self) -> SimMarkers {
        SimMarkers(self.clone())
    }

    // MARK: Scenario

    /// Moves the robot's true heading, in radians counterclockwise from the field x axis.
    pub fn set_heading(&self, heading: f64) {
        self.0.borrow_mut().heading = heading;
    }

    /// Jams the wheels so the robot neither moves nor turns, whatever the motor powers.
    pub fn set_stalled(&self, stalled: bool) {
        self.0.borrow_mut().stalled = stalled;
    }

    /// Makes the IMU fail every read while `false`.
    pub fn set_imu_online(&self, online: bool) {
        self.0.borrow_mut().imu_online = online;
    }

    /// Makes writes to `motor` fail, or restores every motor with `None`.
    pub fn disconnect(&self, motor: Option<MotorIndex>) {
        self.0.borrow_mut().disconnected = motor;
    }

    /// Sets what the color sensor sees.
    pub fn set_jewel(&self, reading: ColorReading) {
        self.0.borrow_mut().jewel = reading;
    }

    /// Sets the frame the camera returns, or makes it fail with `None`.
    pub fn set_frame(&self, frame: Option<Frame>) {
        self.0.borrow_mut().frame = frame;
    }

    /// Places `marker` in view, recognized `delay` after tracking is activated.
    pub fn show_marker(&self, marker: VuMark, delay: Duration) {
        let mut world = self.0.borrow_mut();
        world.marker = marker;
        world.marker_delay = delay;
    }

    // MARK: Observation

    /// True heading, in radians, without wrapping.
    #[must_use]
    pub fn heading(&self) -> f64 {
        self.0.borrow().heading
    }

    /// True position on the field, in inches.
    #[must_use]
    pub fn position(&self) -> FieldPoint {
        self.0.borrow().position
    }

    /// Powers last written to the motors, as the hardware saw them.
    #[must_use]
    pub fn motor_powers(&self) -> [f64; 4] {
        self.0.borrow().powers
    }

    /// `true` if the color sensor's LED is lit.
    #[must_use]
    pub fn led_on(&self) -> bool {
        self.0.borrow().led
    }

    /// `true` while pictograph tracking is active.
    #[must_use]
    pub fn tracking_active(&self) -> bool {
        self.0.borrow().tracking_since.is_some()
    }
}

/// Simulated time for a [`SimulatedRobot`].
///
/// Sleeping advances the robot's physics.
#[derive(Debug, Clone)]
pub struct SimClock(SimulatedRobot);

impl Clock for SimClock {
    fn now(&self) -> Duration {
        self.0.0.borrow().time
    }

    fn sleep(&mut self, duration: Duration) {
        self.0.0.borrow_mut().step(duration);
    }
}

/// Drive motors of a [`SimulatedRobot`].
#[derive(Debug, Clone)]
pub struct SimMotors(SimulatedRobot);

impl MotorSink for SimMotors {
    type Error = MotorError;

    fn set_power(&mut self, motor: MotorIndex, power: f64) -> Result<(), MotorError> {
        let mut world = self.0.0.borrow_mut();
        if world.disconnected == Some(motor) {
            return Err(MotorError::Disconnected(motor));
        }

        world.powers[motor.as_usize()] = power;
        Ok(())
    }
}

impl Encoders for SimMotors {
    fn reset_encoders(&mut self) -> Result<(), MotorError> {
        self.0.0.borrow_mut().ticks = [0.0; 4];
        Ok(())
    }

    fn encoder_position(&mut self, motor: MotorIndex) -> Result<i32, MotorError> {
        let world = self.0.0.borrow();
        if world.disconnected == Some(motor) {
            return Err(MotorError::Disconnected(motor));
        }

        Ok(world.ticks[motor.as_usize()] as i32)
    }
}

/// IMU of a [`SimulatedRobot`].
///
/// Like most IMUs, it reports headings wrapped to `(-π, π]`.
#[derive(Debug, Clone)]
pub struct SimImu(SimulatedRobot);

impl Imu for SimImu {
    fn read_orientation(&mut self) -> Result<Orientation, SensorError> {
        let world = self.0.0.borrow();
        if !world.imu_online {
            return Err(SensorError::Unavailable(String::from("simulated IMU offline")));
        }

        Ok(Orientation {
            heading: Angle::from_radians(world.heading).wrapped_half(),
            gravity: [0.0, 0.0, GRAVITY],
            ..Default::default()
        })
    }

    fn system_status(&self) -> String {
        String::from(if self.0.0.borrow().imu_online {
            "running"
        } else {
            "offline"
        })
    }

    fn calibration_status(&self) -> String {
        String::from("fully calibrated")
    }
}

/// Jewel color sensor of a [`SimulatedRobot`].
#[derive(Debug, Clone)]
pub struct SimColorSensor(SimulatedRobot);

impl ColorSensor for SimColorSensor {
    fn color(&mut self) -> Result<ColorReading, SensorError> {
        Ok(self.0.0.borrow().jewel)
    }

    fn enable_led(&mut self, enabled: bool) -> Result<(), SensorError> {
        self.0.0.borrow_mut().led = enabled;
        Ok(())
    }
}

/// Camera of a [`SimulatedRobot`].
#[derive(Debug, Clone)]
pub struct SimCamera(SimulatedRobot);

impl FrameSource for SimCamera {
    fn next_frame(&mut self) -> Result<Frame, SensorError> {
        self.0
            .0
            .borrow()
            .frame
            .clone()
            .ok_or_else(|| SensorError::Unavailable(String::from("simulated camera has no frame")))
    }
}

/// Pictograph tracker of a [`SimulatedRobot`].
#[derive(Debug, Clone)]
pub struct SimMarkers(SimulatedRobot);

impl MarkerSource for SimMarkers {
    fn activate(&mut self) -> Result<(), SensorError> {
        let mut world = self.0.0.borrow_mut();
        world.tracking_since = Some(world.time);
        Ok(())
    }

    fn deactivate(&mut self) -> Result<(), SensorError> {
        self.0.0.borrow_mut().tracking_since = None;
        Ok(())
    }

    fn current_marker(&mut self) -> Result<VuMark, SensorError> {
        let world = self.0.0.borrow();
        let since = world.tracking_since.ok_or_else(|| {
            SensorError::Unavailable(String::from("pictograph tracking is not active"))
        })?;

        Ok(if world.time.saturating_sub(since) >= world.marker_delay {
            world.marker
        } else {
            VuMark::Unknown
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivetrain::model::{Arcade, DrivetrainModel, EncoderDrive, Mecanum};
    use approx::assert_abs_diff_eq;

    const REVERSED: [bool; 4] = [true, false, true, false];

    #[test]
    fn forward_drive_moves_along_heading() {
        let robot = SimulatedRobot::new(REVERSED);
        let mut model = Mecanum::with_reversed(robot.motors(), REVERSED);
        let mut clock = robot.clock();

        robot.set_heading(core::f64::consts::FRAC_PI_2);
        model.drive_arcade(1.0, 0.0).unwrap();
        clock.sleep(Duration::from_secs(1));

        let position = robot.position();
        assert_abs_diff_eq!(position.x, 0.0, epsilon = 1e-9);
        assert!(position.y > 0.0);
        assert_abs_diff_eq!(robot.heading(), core::f64::consts::FRAC_PI_2, epsilon = 1e-12);

        let travelled = model.average_ticks().unwrap();
        assert_abs_diff_eq!(
            position.y,
            travelled / EncoderGeometry::HD_HEX_40.counts_per_inch(),
            epsilon = 0.05
        );
    }

    #[test]
    fn rotation_turns_counterclockwise() {
        let robot = SimulatedRobot::new(REVERSED);
        let mut model = Mecanum::with_reversed(robot.motors(), REVERSED);
        let mut clock = robot.clock();

        model.drive_arcade(0.0, 0.5).unwrap();
        clock.sleep(Duration::from_millis(500));
        model.stop().unwrap();
        clock.sleep(Duration::from_millis(500));

        assert_abs_diff_eq!(robot.heading(), 0.5 * TURN_RATE * 0.5, epsilon = 1e-9);
        assert_eq!(robot.position(), FieldPoint::ORIGIN);
    }

    #[test]
    fn imu_wraps_heading() {
        let robot = SimulatedRobot::new([false; 4]);
        robot.set_heading(core::f64::consts::TAU - 0.05);

        let heading = robot.imu().read_orientation().unwrap().heading;
        assert_abs_diff_eq!(heading.as_radians(), -0.05, epsilon = 1e-9);

        robot.set_imu_online(false);
        assert!(robot.imu().read_orientation().is_err());
    }

    #[test]
    fn markers_appear_after_delay() {
        let robot = SimulatedRobot::new([false; 4]);
        let mut markers = robot.markers();
        let mut clock = robot.clock();
        robot.show_marker(VuMark::Right, Duration::from_millis(50));

        assert!(markers.current_marker().is_err());
        markers.activate().unwrap();
        assert_eq!(markers.current_marker().unwrap(), VuMark::Unknown);
        clock.sleep(Duration::from_millis(50));
        assert_eq!(markers.current_marker().unwrap(), VuMark::Right);
    }
}
