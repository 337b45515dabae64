//! Motion planning
//!
//! Turns a finite motion request (distance, angle, speed) into the
//! velocity to command and the travel time to arm the countdown for.
//! Speeds above the drive limits are clamped; non-positive speeds are
//! rejected before anything is touched.

use super::error::MotionError;
use crate::config::DriveLimits;
use crate::drive::Velocity;
use crate::state::OperationKind;
use crate::traits::TimerError;

/// Planned finite motion
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionPlan {
    /// Kind of motion
    pub kind: OperationKind,
    /// Velocity held for the whole motion
    pub velocity: Velocity,
    /// Travel time in ms (0 = nothing to do)
    pub total_ms: u32,
}

impl MotionPlan {
    /// Check whether the request covers no distance or angle
    pub fn is_empty(&self) -> bool {
        self.total_ms == 0
    }
}

/// Plan a straight drive of `distance_mm` (negative = reverse)
pub fn plan_straight(
    distance_mm: i32,
    speed_mm_s: i32,
    limits: &DriveLimits,
) -> Result<MotionPlan, MotionError> {
    let speed = checked_speed(speed_mm_s, limits.max_linear_mm_s)?;
    let total_ms = travel_ms(distance_mm.unsigned_abs(), speed, 1)?;

    Ok(MotionPlan {
        kind: OperationKind::Straight,
        velocity: Velocity::linear(signed(speed, distance_mm)),
        total_ms,
    })
}

/// Plan an in-place rotation of `angle_deg` (positive = clockwise)
///
/// Both wheels counter-rotate during a pivot, so the body turns at twice
/// the commanded rate and the travel time is halved.
pub fn plan_turn(
    angle_deg: i32,
    speed_deg_s: i32,
    limits: &DriveLimits,
) -> Result<MotionPlan, MotionError> {
    let speed = checked_speed(speed_deg_s, limits.max_angular_deg_s)?;
    let total_ms = travel_ms(angle_deg.unsigned_abs(), speed, 2)?;

    Ok(MotionPlan {
        kind: OperationKind::Turn,
        velocity: Velocity::pivot(signed(speed, angle_deg)),
        total_ms,
    })
}

/// Plan a curve of `distance_mm` that turns the heading by `angle_deg`
///
/// The angular rate is `angle / travel time`, clamped to the drive limit;
/// when clamped the achieved turn falls short of `angle_deg`. Reversing
/// inverts the heading change, as the odometry model does.
pub fn plan_curve(
    distance_mm: i32,
    angle_deg: i32,
    speed_mm_s: i32,
    limits: &DriveLimits,
) -> Result<MotionPlan, MotionError> {
    let speed = checked_speed(speed_mm_s, limits.max_linear_mm_s)?;
    let total_ms = travel_ms(distance_mm.unsigned_abs(), speed, 1)?;

    let angular = if total_ms == 0 {
        0.0
    } else {
        limits.clamp_angular(angle_deg as f32 * 1000.0 / total_ms as f32)
    };

    Ok(MotionPlan {
        kind: OperationKind::Curve,
        velocity: Velocity::new(signed(speed, distance_mm), angular),
        total_ms,
    })
}

fn checked_speed(speed: i32, max: i32) -> Result<u32, MotionError> {
    if speed <= 0 || max <= 0 {
        return Err(MotionError::InvalidSpeed);
    }
    Ok(speed.min(max) as u32)
}

/// `amount / (speed * divisor)` seconds, in ms
fn travel_ms(amount: u32, speed: u32, divisor: u32) -> Result<u32, MotionError> {
    let ms = amount as u64 * 1000 / (speed as u64 * divisor as u64);
    u32::try_from(ms).map_err(|_| MotionError::Timer(TimerError::OutOfRange))
}

fn signed(speed: u32, direction: i32) -> f32 {
    if direction < 0 {
        -(speed as f32)
    } else {
        speed as f32
    }
}
