//! Velocity commands and their conversion to wheel PWM

pub mod mapper;
pub mod velocity;

pub use mapper::{DriveCommand, SpeedMapper, WheelCommand};
pub use velocity::Velocity;
