/// Settling conditions for a motion.
///
/// A motion is considered settled on the first sample whose error magnitude lies strictly inside
/// the error tolerance. There is no settling duration: one in-band sample ends the motion.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Half-width of the open band around the setpoint.
    ///
    /// `None` disables error settling entirely, leaving the motion to end by timeout.
    pub error_tolerance: Option<f64>,
}

impl Tolerances {
    /// Creates tolerances with no conditions set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            error_tolerance: None,
        }
    }

    /// Sets the error tolerance.
    #[must_use]
    pub const fn error(mut self, tolerance: f64) -> Self {
        self.error_tolerance = Some(tolerance.abs());
        self
    }

    /// Returns `true` if `error` lies strictly inside the error tolerance band.
    ///
    /// ```
    /// use blueshift_control::Tolerances;
    ///
    /// let tolerances = Tolerances::new().error(0.5);
    ///
    /// assert!(tolerances.check(0.49));
    /// assert!(tolerances.check(-0.49));
    /// assert!(!tolerances.check(0.5));
    /// assert!(!Tolerances::new().check(0.0));
    /// ```
    #[must_use]
    pub fn check(&self, error: f64) -> bool {
        self.error_tolerance
            .is_some_and(|tolerance| error.abs() < tolerance)
    }
}
