//! Wheel drivers

pub mod differential;
pub mod hbridge;

pub use differential::DifferentialDrive;
pub use hbridge::{HBridgeWheel, WheelFault};
