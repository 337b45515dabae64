//! Drive limits and controller configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::trim::TrimOffsets;

/// Default top linear speed in mm/s
pub const DEFAULT_MAX_LINEAR_MM_S: i32 = 340;

/// Default top angular speed in deg/s
pub const DEFAULT_MAX_ANGULAR_DEG_S: i32 = 180;

/// Default sleep between polls in `wait_until_done`
pub const DEFAULT_WAIT_POLL_US: u32 = 1000;

/// Speed limits of the drive train
///
/// Commanded velocities are clamped to these values, and full PWM
/// corresponds to the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriveLimits {
    /// Top linear speed in mm/s (full PWM on both wheels)
    pub max_linear_mm_s: i32,
    /// Top angular speed in deg/s
    pub max_angular_deg_s: i32,
}

impl Default for DriveLimits {
    fn default() -> Self {
        Self::new()
    }
}

impl DriveLimits {
    /// Limits of the reference robot
    pub const fn new() -> Self {
        Self {
            max_linear_mm_s: DEFAULT_MAX_LINEAR_MM_S,
            max_angular_deg_s: DEFAULT_MAX_ANGULAR_DEG_S,
        }
    }

    /// Clamp a linear speed to `[-max, max]`
    pub fn clamp_linear(&self, mm_s: f32) -> f32 {
        let max = self.max_linear_mm_s as f32;
        mm_s.clamp(-max, max)
    }

    /// Clamp an angular speed to `[-max, max]`
    pub fn clamp_angular(&self, deg_s: f32) -> f32 {
        let max = self.max_angular_deg_s as f32;
        deg_s.clamp(-max, max)
    }
}

/// Motion controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControllerConfig {
    /// Speed limits
    pub limits: DriveLimits,
    /// Initial trim offsets
    pub trim: TrimOffsets,
    /// Sleep between polls in `wait_until_done`, in microseconds
    pub wait_poll_us: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerConfig {
    /// Reference robot configuration
    pub const fn new() -> Self {
        Self {
            limits: DriveLimits::new(),
            trim: TrimOffsets::ZERO,
            wait_poll_us: DEFAULT_WAIT_POLL_US,
        }
    }

    /// Replace the initial trim offsets
    pub const fn with_trim(mut self, trim: TrimOffsets) -> Self {
        self.trim = trim;
        self
    }

    /// Replace the speed limits
    pub const fn with_limits(mut self, limits: DriveLimits) -> Self {
        self.limits = limits;
        self
    }
}
