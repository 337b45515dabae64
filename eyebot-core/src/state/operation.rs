//! Finite motion records

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::odometry::Pose;

/// Kind of finite motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OperationKind {
    /// Drive a distance along the current heading
    Straight,
    /// Rotate in place by an angle
    Turn,
    /// Drive a distance while turning by an angle
    Curve,
}

impl OperationKind {
    /// Check whether progress is measured in millimeters of travel
    pub fn tracks_distance(self) -> bool {
        matches!(self, OperationKind::Straight | OperationKind::Curve)
    }
}

/// A finite motion in progress
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActiveOperation {
    /// What kind of motion this is
    pub kind: OperationKind,
    /// Clock reading when the wheels were started (ms)
    pub start_ms: u64,
    /// Planned travel time (ms)
    pub total_ms: u32,
    /// Pose committed when the countdown expires
    pub final_pose: Pose,
}

impl ActiveOperation {
    /// Time since the motion started, saturating at the planned total
    pub fn elapsed_ms(&self, now_ms: u64) -> u32 {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        elapsed.min(self.total_ms as u64) as u32
    }

    /// Time left until the planned end
    pub fn remaining_ms(&self, now_ms: u64) -> u32 {
        self.total_ms - self.elapsed_ms(now_ms)
    }

    /// Clock reading at which the motion is planned to end
    pub fn end_ms(&self) -> u64 {
        self.start_ms + self.total_ms as u64
    }
}
