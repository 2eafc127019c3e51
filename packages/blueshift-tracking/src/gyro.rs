use blueshift_math::Angle;

use crate::{SensorError, TracksHeading};

/// Absolute orientation reported by an IMU.
///
/// Angles follow the intrinsic Z-Y-X convention, so `heading` is the rotation about the vertical
/// axis.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Rotation about the vertical (Z) axis.
    pub heading: Angle,

    /// Rotation about the Y axis.
    pub roll: Angle,

    /// Rotation about the X axis.
    pub pitch: Angle,

    /// Acceleration due to gravity in the sensor frame, in m/s².
    pub gravity: [f64; 3],
}

/// Inertial measurement unit driver.
pub trait Imu {
    /// Reads the absolute orientation from the device.
    fn read_orientation(&mut self) -> Result<Orientation, SensorError>;

    /// Short description of the device's system status.
    fn system_status(&self) -> String {
        String::from("unknown")
    }

    /// Short description of the device's calibration status.
    fn calibration_status(&self) -> String {
        String::from("unknown")
    }
}

/// Heading tracker built on an IMU.
///
/// Headings are reported relative to a reference heading, captured on construction and again on
/// every call to [`Gyroscope::zero`]. The last successfully read orientation is cached for
/// diagnostics only; [`TracksHeading::heading`] always samples the device.
#[derive(Debug)]
pub struct Gyroscope<I: Imu> {
    imu: I,
    reference: Angle,
    last_orientation: Option<Orientation>,
}

impl<I: Imu> Gyroscope<I> {
    /// Creates a gyroscope, taking the device's current heading as zero.
    pub fn new(imu: I) -> Result<Self, SensorError> {
        let mut gyro = Self::new_absolute(imu);
        gyro.zero()?;
        Ok(gyro)
    }

    /// Creates a gyroscope that reports the device's absolute heading.
    pub const fn new_absolute(imu: I) -> Self {
        Self {
            imu,
            reference: Angle::ZERO,
            last_orientation: None,
        }
    }

    /// Captures the current heading as the new zero.
    pub fn zero(&mut self) -> Result<(), SensorError> {
        let orientation = self.orientation()?;
        self.reference = orientation.heading;
        log::debug!("Gyroscope zeroed at {}.", self.reference);

        Ok(())
    }

    /// Heading that is reported as zero.
    #[must_use]
    pub const fn reference(&self) -> Angle {
        self.reference
    }

    /// Reads the full orientation from the device.
    pub fn orientation(&mut self) -> Result<Orientation, SensorError> {
        let orientation = self.imu.read_orientation().inspect_err(|err| {
            log::error!("Failed to read IMU orientation: {err}");
        })?;
        self.last_orientation = Some(orientation);

        Ok(orientation)
    }

    /// Gravity vector from the most recent successful read, if any.
    #[must_use]
    pub fn gravity(&self) -> Option<[f64; 3]> {
        self.last_orientation.map(|orientation| orientation.gravity)
    }

    /// Short description of the device's system status.
    #[must_use]
    pub fn system_status(&self) -> String {
        self.imu.system_status()
    }

    /// Short description of the device's calibration status.
    #[must_use]
    pub fn calibration_status(&self) -> String {
        self.imu.calibration_status()
    }

    /// Returns a reference to the underlying driver.
    pub const fn imu(&self) -> &I {
        &self.imu
    }

    /// Returns a mutable reference to the underlying driver.
    pub const fn imu_mut(&mut self) -> &mut I {
        &mut self.imu
    }
}

impl<I: Imu> TracksHeading for Gyroscope<I> {
    fn heading(&mut self) -> Result<Angle, SensorError> {
        Ok(self.orientation()?.heading - self.reference)
    }
}
