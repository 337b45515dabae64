//! Events that trigger state transitions

use super::operation::ActiveOperation;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionEvent {
    /// A finite motion was planned and its countdown armed
    Start(ActiveOperation),
    /// The countdown for the running motion elapsed
    Expired,
    /// A velocity command or new motion replaced the running one
    Superseded,
}
