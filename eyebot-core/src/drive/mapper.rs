//! Speed mapper
//!
//! Converts a commanded (linear, angular) velocity into per-wheel PWM duty
//! and direction. The mapping is open-loop: full duty corresponds to the
//! configured maximum speed and trim offsets compensate for motor mismatch.
//!
//! - Driving (`linear != 0`): both wheels get the same base duty plus their
//!   trim, and the wheel on the inside of the turn is slowed by the angular
//!   share of full duty.
//! - Pivoting (`linear == 0`): both wheels get the angular share of full
//!   duty in opposite directions. Because both wheels move, the body turns
//!   twice as fast as the commanded rate; odometry accounts for this.

use libm::fabsf;

use super::velocity::Velocity;
use crate::config::{DriveLimits, TrimOffsets};
use crate::traits::wheel::{Side, WheelDirection, WheelOutput, MAX_DUTY};

/// Duty and direction for one wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WheelCommand {
    /// Duty cycle (0-255)
    pub duty: u8,
    /// Rotation direction
    pub direction: WheelDirection,
}

impl WheelCommand {
    /// Wheel unpowered
    pub const STOP: Self = Self {
        duty: 0,
        direction: WheelDirection::Forward,
    };

    /// Create a wheel command
    pub const fn new(duty: u8, direction: WheelDirection) -> Self {
        Self { duty, direction }
    }
}

/// Duty and direction for both wheels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriveCommand {
    pub left: WheelCommand,
    pub right: WheelCommand,
}

impl DriveCommand {
    /// Both wheels unpowered
    pub const STOP: Self = Self {
        left: WheelCommand::STOP,
        right: WheelCommand::STOP,
    };

    /// Check whether both wheels are unpowered
    pub fn is_stopped(&self) -> bool {
        self.left.duty == 0 && self.right.duty == 0
    }

    /// Write this command to the wheel outputs
    pub fn apply<W: WheelOutput + ?Sized>(&self, wheels: &mut W) {
        wheels.set_wheel(Side::Left, self.left.duty, self.left.direction);
        wheels.set_wheel(Side::Right, self.right.duty, self.right.direction);
    }
}

/// Velocity to PWM mapper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedMapper {
    limits: DriveLimits,
    trim: TrimOffsets,
}

impl Default for SpeedMapper {
    fn default() -> Self {
        Self::new(DriveLimits::new(), TrimOffsets::ZERO)
    }
}

impl SpeedMapper {
    /// Create a mapper with the given limits and trim
    pub const fn new(limits: DriveLimits, trim: TrimOffsets) -> Self {
        Self { limits, trim }
    }

    /// Get the speed limits
    pub fn limits(&self) -> DriveLimits {
        self.limits
    }

    /// Get the trim offsets
    pub fn trim(&self) -> TrimOffsets {
        self.trim
    }

    /// Replace the trim offsets
    ///
    /// Takes effect on the next [`SpeedMapper::map`]; wheels already
    /// running keep their duty.
    pub fn set_trim(&mut self, trim: TrimOffsets) {
        self.trim = trim;
    }

    /// Clamp a velocity to the configured limits
    pub fn clamp(&self, velocity: Velocity) -> Velocity {
        Velocity::new(
            self.limits.clamp_linear(velocity.linear_mm_s),
            self.limits.clamp_angular(velocity.angular_deg_s),
        )
    }

    /// Map a velocity to wheel commands
    ///
    /// The velocity is clamped first; out-of-range inputs never fail.
    pub fn map(&self, velocity: Velocity) -> DriveCommand {
        let velocity = self.clamp(velocity);
        let clockwise = velocity.angular_deg_s >= 0.0;
        let turn_duty = full_scale(velocity.angular_deg_s, self.limits.max_angular_deg_s);

        if velocity.linear_mm_s != 0.0 {
            let base = full_scale(velocity.linear_mm_s, self.limits.max_linear_mm_s);
            let mut left = saturate(base + self.trim.left as i32);
            let mut right = saturate(base + self.trim.right as i32);

            // Slow the inside wheel
            if clockwise {
                right = saturate(right - turn_duty);
            } else {
                left = saturate(left - turn_duty);
            }

            let direction = WheelDirection::from_sign(velocity.linear_mm_s);
            DriveCommand {
                left: WheelCommand::new(left as u8, direction),
                right: WheelCommand::new(right as u8, direction),
            }
        } else {
            let duty = saturate(turn_duty) as u8;
            let left_direction = if clockwise {
                WheelDirection::Forward
            } else {
                WheelDirection::Backward
            };
            DriveCommand {
                left: WheelCommand::new(duty, left_direction),
                right: WheelCommand::new(duty, left_direction.opposite()),
            }
        }
    }
}

/// Share of full duty for `value` out of `max`, truncated
fn full_scale(value: f32, max: i32) -> i32 {
    if max <= 0 {
        return 0;
    }
    (MAX_DUTY as f32 * fabsf(value) / max as f32) as i32
}

fn saturate(duty: i32) -> i32 {
    duty.clamp(0, MAX_DUTY as i32)
}
