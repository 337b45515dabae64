//! Configuration types
//!
//! Board-agnostic configuration for the motion core. Trim calibration is
//! stored as postcard binary data.

pub mod limits;
pub mod trim;

pub use limits::*;
pub use trim::*;
