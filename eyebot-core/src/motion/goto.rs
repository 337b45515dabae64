//! Single-arc approach to a relative target
//!
//! A target `lateral` mm to the right and `forward` mm ahead is reached by
//! one circular arc. The chord model is an approximation: the arc ends
//! ahead of the robot but not exactly on the target, and a lateral offset
//! larger than the forward distance is clamped to it.

use core::f32::consts::PI;

use libm::{asinf, roundf, sinf};

use super::error::MotionError;

/// How to reach a relative target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GotoPlan {
    /// Target is dead ahead (or behind)
    Straight { distance_mm: i32 },
    /// Drive an arc of `distance_mm` turning by `angle_deg`
    Curve { distance_mm: i32, angle_deg: i32 },
}

/// Derive the arc that approaches `(lateral_mm, forward_mm)`
///
/// Arc length and angle are rounded to whole millimeters and degrees.
pub fn derive_goto(lateral_mm: i32, forward_mm: i32) -> Result<GotoPlan, MotionError> {
    if forward_mm == 0 {
        return Err(MotionError::InvalidGeometry);
    }
    if lateral_mm == 0 {
        return Ok(GotoPlan::Straight {
            distance_mm: forward_mm,
        });
    }

    let forward = forward_mm.unsigned_abs() as f32;
    let lateral = (lateral_mm.unsigned_abs() as f32).min(forward);

    let angle = asinf(lateral / forward);
    let radius = forward / sinf(angle);
    let arc = roundf(radius * angle) as i32;
    let degrees = roundf(angle * (180.0 / PI)) as i32;

    Ok(GotoPlan::Curve {
        distance_mm: if forward_mm < 0 { -arc } else { arc },
        angle_deg: if lateral_mm < 0 { -degrees } else { degrees },
    })
}
