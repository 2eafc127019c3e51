//! Jewel, pictograph and parking routine, run against the simulated robot.
//!
//! Pass a path to a robot configuration file to override the defaults. Set `RUST_LOG=debug` to
//! watch the motions.

use std::time::Duration;

use blueshift::{
    prelude::*,
    sim::SimulatedRobot,
    vision::{ColorReading, Frame},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = std::env::args()
        .nth(1)
        .map_or_else(RobotConfig::default, RobotConfig::load_or_default);
    let reversed = config.motors.reversed();

    // Stage the field: a red jewel under the sensor and the center pictograph in view.
    let robot = SimulatedRobot::new(reversed);
    robot.set_jewel(ColorReading::new(64, 22, 14));
    robot.set_frame(Some(jewel_frame()?));
    robot.show_marker(VuMark::Center, Duration::from_millis(400));

    let mut clock = robot.clock();
    let mut dt = Drivetrain::new(
        Mecanum::with_reversed(robot.motors(), reversed),
        Gyroscope::new(robot.imu())?,
    );
    let controller = config.heading_controller();

    // Knock the blue jewel off by turning toward it and back.
    let mut jewels = JewelSensor::new(robot.color_sensor(), config.jewel.thresholds())?;
    let jewel = jewels.looking_at()?;
    let camera_jewel = JewelCamera::new(robot.camera()).search_full()?;
    log::info!("Color sensor sees a {jewel} jewel; camera sees {camera_jewel} on the left.");

    let side = match jewel {
        JewelState::Red => Some(Side::Right),
        JewelState::Blue => Some(Side::Left),
        JewelState::Unknown => None,
    };
    if let Some(side) = side {
        controller.slight_turn(&mut dt, side).run(&mut clock)?;
        let back = if side == Side::Left {
            Side::Right
        } else {
            Side::Left
        };
        controller.slight_turn(&mut dt, back).run(&mut clock)?;
    }
    jewels.enable_led(false)?;

    // Read the pictograph to pick a cryptobox column.
    let mark = MarkerTracker::new(robot.markers()).find_marker(&mut clock, Duration::from_secs(3))?;
    let column = match mark {
        VuMark::Left => 28.0,
        VuMark::Right => 44.0,
        VuMark::Center | VuMark::Unknown => 36.0,
    };

    // Drive off the balancing stone, line up with the column and face the cryptobox.
    let mut navigator = Navigator::new(
        FieldPoint::ORIGIN,
        controller,
        config.encoder.encoder_driving(),
    );
    for waypoint in [FieldPoint::new(column, 0.0), FieldPoint::new(column, 12.0)] {
        let outcome = navigator.drive_to_point(&mut dt, &mut clock, waypoint)?;
        if outcome == DriveOutcome::TimedOut {
            log::warn!("Gave up on {waypoint}, parking where we are.");
            break;
        }
    }
    stop_gradually(&mut dt.model, &mut clock, 10, Duration::from_millis(20))?;

    log::info!(
        "Finished after {:.1} s at {} (believed {}), heading {:.3} rad.",
        clock.now().as_secs_f64(),
        robot.position(),
        navigator.location(),
        robot.heading(),
    );

    Ok(())
}

/// A camera frame with a red jewel on the left and a blue jewel on the right.
fn jewel_frame() -> Result<Frame, SensorError> {
    let (width, height) = (160, 120);
    let pixels = (0..height)
        .flat_map(|_| (0..width).map(move |x| if x < width / 2 { 0xF800 } else { 0x001F }))
        .collect();

    Frame::from_rgb565(width, height, pixels)
}
