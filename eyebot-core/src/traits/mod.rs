//! Hardware abstraction traits
//!
//! These traits define the interface between the motion logic
//! and hardware-specific implementations.

pub mod clock;
pub mod timer;
pub mod wheel;

pub use clock::Clock;
pub use timer::{OneShotTimer, TimerError};
pub use wheel::{Side, WheelDirection, WheelOutput};
