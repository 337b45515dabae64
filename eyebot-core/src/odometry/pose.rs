//! Robot pose types

use core::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Estimated robot pose
///
/// `y` points along the robot's initial forward axis and `x` to its right.
/// Heading is measured in degrees from the forward axis, positive
/// clockwise, and is not wrapped: two full clockwise turns read 720°.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    /// Lateral position in millimeters
    pub x_mm: f32,
    /// Forward position in millimeters
    pub y_mm: f32,
    /// Heading in degrees (positive = clockwise)
    pub heading_deg: f32,
}

impl Pose {
    /// Origin facing forward
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a pose
    pub const fn new(x_mm: f32, y_mm: f32, heading_deg: f32) -> Self {
        Self {
            x_mm,
            y_mm,
            heading_deg,
        }
    }

    /// Heading in radians
    pub fn heading_rad(&self) -> f32 {
        self.heading_deg * (PI / 180.0)
    }

    /// Apply a displacement
    pub fn offset(&self, delta: PoseDelta) -> Self {
        Self {
            x_mm: self.x_mm + delta.dx_mm,
            y_mm: self.y_mm + delta.dy_mm,
            heading_deg: self.heading_deg + delta.dphi_deg,
        }
    }
}

/// Pose displacement in world frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PoseDelta {
    pub dx_mm: f32,
    pub dy_mm: f32,
    pub dphi_deg: f32,
}

impl PoseDelta {
    /// No displacement
    pub const ZERO: Self = Self {
        dx_mm: 0.0,
        dy_mm: 0.0,
        dphi_deg: 0.0,
    };
}
