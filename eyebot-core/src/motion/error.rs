//! Motion command errors

use crate::traits::TimerError;

/// Errors returned by motion commands
///
/// A rejected command never leaves a countdown armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// Speed was zero or negative; nothing was changed
    InvalidSpeed,
    /// Target cannot be reached with a single arc (zero forward distance)
    InvalidGeometry,
    /// Countdown could not be armed; wheels were stopped
    Timer(TimerError),
}

impl From<TimerError> for MotionError {
    fn from(err: TimerError) -> Self {
        MotionError::Timer(err)
    }
}
