//! Operation state machine
//!
//! Tracks which finite motion, if any, is in progress. The state machine
//! is explicit, finite, and deterministic.

pub mod events;
pub mod machine;
pub mod operation;

pub use events::MotionEvent;
pub use machine::MotionState;
pub use operation::{ActiveOperation, OperationKind};
