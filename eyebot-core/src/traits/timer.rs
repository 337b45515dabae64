//! One-shot countdown timer trait
//!
//! The motion scheduler arms a single hardware countdown for the planned
//! travel time. When it elapses, the platform's interrupt handler calls
//! [`crate::motion::MotionController::on_timer_expired`].

/// Errors that can occur when arming the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// Timer is owned by another user
    Busy,
    /// Requested duration cannot be represented by the counter
    OutOfRange,
    /// Peripheral reported a configuration fault
    Hardware,
}

/// One-shot hardware countdown
pub trait OneShotTimer {
    /// Arm the countdown to expire after `duration_ms`
    ///
    /// Re-arming replaces any pending countdown.
    fn arm(&mut self, duration_ms: u32) -> Result<(), TimerError>;

    /// Cancel the pending countdown, if any
    ///
    /// After this returns, no expiry from the cancelled countdown may be
    /// delivered, including one already latched but not yet serviced.
    fn disarm(&mut self);

    /// Check whether a countdown is pending
    fn is_armed(&self) -> bool;
}
