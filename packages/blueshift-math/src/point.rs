use core::{
    fmt,
    ops::{Add, Sub},
};

use crate::Angle;

/// A location on the playing field, in inches.
///
/// Field points are plain values: copying one produces an independent point with the same
/// coordinates.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct FieldPoint {
    /// Horizontal coordinate.
    pub x: f64,

    /// Vertical coordinate.
    pub y: f64,
}

impl FieldPoint {
    /// The field origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Moves this point to a new location.
    pub const fn set_location(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Offsets this point by `dx` and `dy`.
    pub const fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Returns `true` if both coordinates of `other` lie strictly within `tolerance` of this
    /// point's coordinates.
    ///
    /// Encoder-based position tracking is imprecise, so exact comparison is rarely useful when
    /// deciding whether the robot has arrived somewhere.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (other.x - self.x).abs() < tolerance && (other.y - self.y).abs() < tolerance
    }

    /// Euclidean distance from this point to `other`.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Direction of travel from this point to `other`, in `[0, 2π)`.
    ///
    /// Zero points along the positive x axis; angles increase counterclockwise. The bearing to
    /// the same point is zero.
    #[must_use]
    pub fn bearing_to(&self, other: &Self) -> Angle {
        Angle::atan2(other.y - self.y, other.x - self.x).wrapped_full()
    }
}

impl From<(f64, f64)> for FieldPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl Add for FieldPoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for FieldPoint {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for FieldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use core::f64::consts::PI;

    #[test]
    fn distance_uses_coordinate_difference() {
        let a = FieldPoint::new(1.0, 1.0);
        let b = FieldPoint::new(4.0, 5.0);

        assert_abs_diff_eq!(a.distance_to(&b), 5.0);
        assert_abs_diff_eq!(b.distance_to(&a), 5.0);
        assert_abs_diff_eq!(a.distance_to(&a), 0.0);
    }

    #[test]
    fn bearing_covers_all_quadrants() {
        let origin = FieldPoint::ORIGIN;

        assert_abs_diff_eq!(origin.bearing_to(&(1.0, 0.0).into()).as_radians(), 0.0);
        assert_abs_diff_eq!(origin.bearing_to(&(0.0, 1.0).into()).as_radians(), PI / 2.0);
        assert_abs_diff_eq!(origin.bearing_to(&(-1.0, 0.0).into()).as_radians(), PI);
        assert_abs_diff_eq!(
            origin.bearing_to(&(0.0, -1.0).into()).as_radians(),
            3.0 * PI / 2.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            origin.bearing_to(&(-1.0, -1.0).into()).as_radians(),
            5.0 * PI / 4.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn translate_and_tolerance() {
        let mut point = FieldPoint::new(2.0, 3.0);
        point.translate(0.5, -1.0);

        assert_eq!(point, FieldPoint::new(2.5, 2.0));
        assert!(point.approx_eq(&FieldPoint::new(2.6, 1.95), 0.2));
        assert!(!point.approx_eq(&FieldPoint::new(2.7, 2.0), 0.2));

        point.set_location(-1.0, 0.0);
        assert_eq!(point.to_string(), "(-1, 0)");
    }
}
