//! Math utilities & types.

mod angle;
mod point;

pub use angle::{Angle, IntoAngle};
pub use point::FieldPoint;

use num_traits::Float;

/// Scales down the values in an array so that none exceed a given maximum magnitude.
///
/// This function checks the element with the largest absolute value in the input array.
/// If that magnitude is greater than `max`, all elements are uniformly scaled down so
/// that the largest magnitude equals `max`. If all elements are already within the limit,
/// the array is unchanged.
///
/// # Examples
///
/// ```
/// use blueshift_math::desaturate;
///
/// let values = [3.0, -4.0, 1.0];
/// let result = desaturate(values, 2.0);
/// assert_eq!(result, [1.5, -2.0, 0.5]);
///
/// // Already within bounds, so unchanged:
/// let values = [0.5, -1.2, 0.8];
/// let result = desaturate(values, 2.0);
/// assert_eq!(result, values);
/// ```
pub fn desaturate<T: Float, const N: usize>(values: [T; N], max: T) -> [T; N] {
    let largest_magnitude = values
        .iter()
        .map(|v| v.abs())
        .fold(T::zero(), T::max);

    if largest_magnitude > max {
        values.map(|v| v * max / largest_magnitude)
    } else {
        values
    }
}

/// Restricts `value` to the range `[min, max]`.
///
/// `NaN` inputs clip to zero so that a bad sensor sample can never be forwarded to a motor.
///
/// ```
/// use blueshift_math::clip;
///
/// assert_eq!(clip(1.7, -1.0, 1.0), 1.0);
/// assert_eq!(clip(-0.3, -1.0, 1.0), -0.3);
/// assert_eq!(clip(f64::NAN, -1.0, 1.0), 0.0);
/// ```
pub fn clip<T: Float>(value: T, min: T, max: T) -> T {
    if value.is_nan() {
        T::zero()
    } else {
        value.max(min).min(max)
    }
}
