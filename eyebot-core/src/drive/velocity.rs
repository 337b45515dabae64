//! Commanded body velocity

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Commanded velocity of the robot body
///
/// Positive angular speed turns clockwise, matching the heading
/// convention of [`crate::odometry::Pose`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Velocity {
    /// Linear speed in mm/s (negative = reverse)
    pub linear_mm_s: f32,
    /// Angular speed in deg/s (positive = clockwise)
    pub angular_deg_s: f32,
}

impl Velocity {
    /// Robot at rest
    pub const ZERO: Self = Self {
        linear_mm_s: 0.0,
        angular_deg_s: 0.0,
    };

    /// Create a velocity
    pub const fn new(linear_mm_s: f32, angular_deg_s: f32) -> Self {
        Self {
            linear_mm_s,
            angular_deg_s,
        }
    }

    /// Straight-line velocity
    pub const fn linear(mm_s: f32) -> Self {
        Self::new(mm_s, 0.0)
    }

    /// Pivot velocity (rotation in place)
    pub const fn pivot(deg_s: f32) -> Self {
        Self::new(0.0, deg_s)
    }

    /// Check whether the robot is commanded to stand still
    pub fn is_zero(&self) -> bool {
        self.linear_mm_s == 0.0 && self.angular_deg_s == 0.0
    }

    /// Check whether this is an in-place rotation
    ///
    /// The speed mapper counter-rotates both wheels whenever linear speed
    /// is zero, so any zero-linear command is a pivot.
    pub fn is_pivot(&self) -> bool {
        self.linear_mm_s == 0.0 && self.angular_deg_s != 0.0
    }
}
