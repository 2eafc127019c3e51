//! Control loops.

mod bang_bang;

use std::time::Duration;

pub use bang_bang::{AngularBangBang, BangBang};

/// Feedback ("closed-loop") controller.
pub trait Feedback {
    /// Representation of the system's state.
    type State;

    /// Control signal produced by the loop.
    type Signal;

    /// Compares a measurement against the setpoint, producing a new control signal.
    fn update(
        &mut self,
        measurement: Self::State,
        setpoint: Self::State,
        dt: Duration,
    ) -> Self::Signal;
}
