//! Odometry integrator
//!
//! Closed-form pose displacement for a constant commanded velocity held
//! for a known time. Three motion models apply:
//!
//! - **Straight**: no rotation, or rotation too small for the arc model
//! - **Arc**: forward travel while turning, along a circle of radius
//!   `arc / turn`
//! - **Pivot**: rotation in place; both wheels counter-rotate, doubling
//!   the body rate relative to the commanded angular speed
//!
//! All functions are pure and may be called at any time.

use core::f32::consts::PI;

use libm::{cosf, fabsf, sinf};

use super::pose::{Pose, PoseDelta};
use crate::drive::Velocity;

/// Smallest turn (in degrees) evaluated with the arc model
///
/// Below this the radius `arc / turn` grows without bound and the
/// chord computation loses precision, so the path is treated as straight.
pub const ARC_MIN_TURN_DEG: f32 = 5.0;

/// Kinematic model used for a displacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionModel {
    /// Straight-line travel along the current heading
    Straight,
    /// Circular arc
    Arc,
    /// Rotation in place
    Pivot,
}

impl MotionModel {
    /// Select the model for `velocity` held for `elapsed_ms`
    pub fn select(velocity: Velocity, elapsed_ms: u32) -> Self {
        if velocity.linear_mm_s == 0.0 {
            MotionModel::Pivot
        } else if velocity.angular_deg_s != 0.0
            && fabsf(turn_deg(velocity, seconds(elapsed_ms))) > ARC_MIN_TURN_DEG
        {
            MotionModel::Arc
        } else {
            MotionModel::Straight
        }
    }
}

/// Displacement after holding `velocity` for `elapsed_ms` from `heading_deg`
pub fn pose_delta(heading_deg: f32, velocity: Velocity, elapsed_ms: u32) -> PoseDelta {
    let t = seconds(elapsed_ms);
    let heading = heading_deg * (PI / 180.0);

    match MotionModel::select(velocity, elapsed_ms) {
        MotionModel::Pivot => PoseDelta {
            dx_mm: 0.0,
            dy_mm: 0.0,
            dphi_deg: velocity.angular_deg_s * 2.0 * t,
        },
        MotionModel::Arc => {
            let arc = velocity.linear_mm_s * t;
            let turn = turn_deg(velocity, t);
            let turn_rad = turn * (PI / 180.0);
            let radius = arc / turn_rad;

            // Displacement in the robot frame at the start of the arc
            let local_x = radius * sinf(turn_rad);
            let local_y = radius - radius * cosf(turn_rad);

            PoseDelta {
                dx_mm: local_x * sinf(heading) + local_y * cosf(heading),
                dy_mm: local_x * cosf(heading) - local_y * sinf(heading),
                dphi_deg: turn,
            }
        }
        MotionModel::Straight => {
            let arc = velocity.linear_mm_s * t;
            PoseDelta {
                dx_mm: arc * sinf(heading),
                dy_mm: arc * cosf(heading),
                dphi_deg: turn_deg(velocity, t),
            }
        }
    }
}

/// Pose after holding `velocity` for `elapsed_ms` starting at `start`
pub fn estimate_pose(start: Pose, velocity: Velocity, elapsed_ms: u32) -> Pose {
    start.offset(pose_delta(start.heading_deg, velocity, elapsed_ms))
}

fn seconds(elapsed_ms: u32) -> f32 {
    elapsed_ms as f32 / 1000.0
}

/// Heading change while driving; reversing inverts the apparent rotation
fn turn_deg(velocity: Velocity, t: f32) -> f32 {
    let turn = velocity.angular_deg_s * t;
    if velocity.linear_mm_s < 0.0 {
        -turn
    } else {
        turn
    }
}
