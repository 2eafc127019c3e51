use core::{
    f64::consts::{PI, TAU},
    fmt,
    ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign},
};

/// An angular measurement, stored internally in radians.
///
/// Headings read from a gyroscope, turn targets, and travel directions are all represented with
/// this type. No wrapping is applied on construction or arithmetic; use [`Angle::wrapped_half`]
/// or [`Angle::wrapped_full`] to map an angle into a canonical domain.
#[derive(Default, Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Angle(f64);

impl Angle {
    /// Angle of zero radians.
    pub const ZERO: Self = Self(0.0);

    /// Angle of a quarter turn.
    pub const QUARTER_TURN: Self = Self(PI / 2.0);

    /// Angle of a half turn.
    pub const HALF_TURN: Self = Self(PI);

    /// Angle of a full turn.
    pub const FULL_TURN: Self = Self(TAU);

    /// Creates an angle from radians.
    #[must_use]
    pub const fn from_radians(radians: f64) -> Self {
        Self(radians)
    }

    /// Creates an angle from degrees.
    #[must_use]
    pub const fn from_degrees(degrees: f64) -> Self {
        Self(degrees.to_radians())
    }

    /// Creates an angle from gradians.
    #[must_use]
    pub const fn from_gradians(gradians: f64) -> Self {
        Self(gradians * (PI / 200.0))
    }

    /// Creates an angle from turns (revolutions).
    #[must_use]
    pub const fn from_turns(turns: f64) -> Self {
        Self(turns * TAU)
    }

    /// Returns this angle in radians.
    #[must_use]
    pub const fn as_radians(self) -> f64 {
        self.0
    }

    /// Returns this angle in degrees.
    #[must_use]
    pub const fn as_degrees(self) -> f64 {
        self.0.to_degrees()
    }

    /// Returns this angle in turns (revolutions).
    #[must_use]
    pub const fn as_turns(self) -> f64 {
        self.0 / TAU
    }

    /// Maps this angle into the half-open range `(-π, π]`.
    ///
    /// The difference of two headings wrapped this way is the signed shortest rotation between
    /// them.
    ///
    /// # Examples
    ///
    /// ```
    /// use blueshift_math::Angle;
    /// use core::f64::consts::TAU;
    ///
    /// let error = (Angle::from_radians(0.1) - Angle::from_radians(TAU - 0.05)).wrapped_half();
    /// assert!((error.as_radians() - 0.15).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn wrapped_half(self) -> Self {
        let wrapped = PI - (PI - self.0).rem_euclid(TAU);

        // Rounding in rem_euclid can land exactly on -π.
        if wrapped <= -PI {
            Self(wrapped + TAU)
        } else {
            Self(wrapped)
        }
    }

    /// Maps this angle into the half-open range `[0, 2π)`.
    #[must_use]
    pub fn wrapped_full(self) -> Self {
        let wrapped = self.0.rem_euclid(TAU);

        // Tiny negative inputs can round up to exactly 2π.
        if wrapped >= TAU {
            Self(0.0)
        } else {
            Self(wrapped)
        }
    }

    /// Computes the absolute value of this angle.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Returns `1.0` for angles greater than or equal to zero and `-1.0` otherwise.
    #[must_use]
    pub const fn signum(self) -> f64 {
        self.0.signum()
    }

    /// Computes the sine of this angle.
    #[must_use]
    pub fn sin(self) -> f64 {
        self.0.sin()
    }

    /// Computes the cosine of this angle.
    #[must_use]
    pub fn cos(self) -> f64 {
        self.0.cos()
    }

    /// Computes the tangent of this angle.
    #[must_use]
    pub fn tan(self) -> f64 {
        self.0.tan()
    }

    /// Computes the four-quadrant arctangent of `y` and `x`.
    #[must_use]
    pub fn atan2(y: f64, x: f64) -> Self {
        Self(y.atan2(x))
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} rad", self.0)
    }
}

impl Add for Angle {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Angle {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Angle {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Angle {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Mul<f64> for Angle {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Div<f64> for Angle {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl Neg for Angle {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

// MARK: Extension Trait

/// Extension trait for easily creating [`Angle`]s from floating-point
/// number literals.
pub trait IntoAngle {
    /// Creates an [`Angle`] of `self` degrees.
    fn deg(self) -> Angle;

    /// Creates an [`Angle`] of `self` gradians.
    fn grad(self) -> Angle;

    /// Creates an [`Angle`] of `self` radians.
    fn rad(self) -> Angle;

    /// Creates an [`Angle`] of `self` turns (revolutions).
    fn turns(self) -> Angle;
}

impl IntoAngle for f64 {
    fn deg(self) -> Angle {
        Angle::from_degrees(self)
    }

    fn rad(self) -> Angle {
        Angle::from_radians(self)
    }

    fn grad(self) -> Angle {
        Angle::from_gradians(self)
    }

    fn turns(self) -> Angle {
        Angle::from_turns(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn wrapped_half_stays_in_range() {
        for i in -40..=40 {
            let angle = Angle::from_radians(f64::from(i) * 0.7);
            let wrapped = angle.wrapped_half().as_radians();

            assert!(wrapped > -PI && wrapped <= PI, "{wrapped} out of range");
            assert_abs_diff_eq!(wrapped.sin(), angle.sin(), epsilon = 1e-9);
            assert_abs_diff_eq!(wrapped.cos(), angle.cos(), epsilon = 1e-9);
        }
    }

    #[test]
    fn wrapped_half_boundary_maps_to_positive_pi() {
        assert_abs_diff_eq!(Angle::from_radians(-PI).wrapped_half().as_radians(), PI, epsilon = 1e-9);
        assert_abs_diff_eq!(Angle::from_radians(PI).wrapped_half().as_radians(), PI, epsilon = 1e-9);
    }

    #[test]
    fn wraps_across_zero() {
        let target = 0.1.rad();
        let current = (TAU - 0.05).rad();

        assert_abs_diff_eq!((target - current).wrapped_half().as_radians(), 0.15, epsilon = 1e-9);
        assert_abs_diff_eq!((current - target).wrapped_half().as_radians(), -0.15, epsilon = 1e-9);
    }

    #[test]
    fn wrapped_full_stays_in_range() {
        assert_abs_diff_eq!((-PI / 2.0).rad().wrapped_full().as_radians(), 3.0 * PI / 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(TAU.rad().wrapped_full().as_radians(), 0.0, epsilon = 1e-9);
        assert!(Angle::from_radians(-1e-18).wrapped_full().as_radians() < TAU);
    }

    #[test]
    fn unit_conversions() {
        assert_abs_diff_eq!(90.0.deg().as_radians(), PI / 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(100.0.grad().as_radians(), PI / 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(0.25.turns().as_radians(), PI / 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(PI.rad().as_degrees(), 180.0, epsilon = 1e-9);
    }
}
