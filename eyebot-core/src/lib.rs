//! Board-agnostic motion core for the EyeBot differential-drive robot
//!
//! This crate contains all motion logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (wheel output, one-shot timer, clock)
//! - Speed mapping from (linear, angular) velocity to wheel PWM
//! - Dead-reckoning odometry from commanded velocity and elapsed time
//! - Operation state machine and motion planning
//! - The interrupt-safe [`motion::MotionController`]
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod log;

pub mod config;
pub mod drive;
pub mod motion;
pub mod odometry;
pub mod state;
pub mod traits;
