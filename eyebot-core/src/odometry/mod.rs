//! Dead-reckoning odometry
//!
//! Pose estimation purely from commanded velocity and elapsed time. There
//! is no wheel feedback, so estimates drift with load, battery voltage and
//! surface; they are advisory.

pub mod integrator;
pub mod pose;

pub use integrator::{estimate_pose, pose_delta, MotionModel, ARC_MIN_TURN_DEG};
pub use pose::{Pose, PoseDelta};
