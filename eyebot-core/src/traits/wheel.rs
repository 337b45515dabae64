//! Wheel output trait
//!
//! The motion core drives each wheel with an 8-bit duty cycle and a
//! direction flag. Implementations translate this into H-bridge pin
//! and PWM writes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum wheel duty cycle
pub const MAX_DUTY: u8 = 255;

/// Which wheel of the differential drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    Left,
    Right,
}

/// Wheel rotation direction, relative to the robot's forward axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WheelDirection {
    /// Wheel rolls the robot forward
    #[default]
    Forward,
    /// Wheel rolls the robot backward
    Backward,
}

impl WheelDirection {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            WheelDirection::Forward => WheelDirection::Backward,
            WheelDirection::Backward => WheelDirection::Forward,
        }
    }

    /// Direction that moves the robot with the sign of `value`
    ///
    /// Zero counts as forward.
    pub fn from_sign(value: f32) -> Self {
        if value < 0.0 {
            WheelDirection::Backward
        } else {
            WheelDirection::Forward
        }
    }
}

/// Per-wheel PWM output
///
/// Called from both the main context and the timer expiry handler, so
/// implementations must not block. Pin errors are not reported back to
/// the motion core; a wheel that cannot be driven is a board fault.
pub trait WheelOutput {
    /// Apply a duty cycle (0 = off, [`MAX_DUTY`] = full power) and direction
    fn set_wheel(&mut self, side: Side, duty: u8, direction: WheelDirection);

    /// Cut power to both wheels
    fn stop_all(&mut self) {
        self.set_wheel(Side::Left, 0, WheelDirection::Forward);
        self.set_wheel(Side::Right, 0, WheelDirection::Forward);
    }
}
