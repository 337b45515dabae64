//! State machine definition
//!
//! `Idle` means no finite motion is pending; the wheels may still run
//! indefinitely under a plain velocity command. `Running` carries the
//! active operation and exists exactly while a countdown is armed.

use super::events::MotionEvent;
use super::operation::{ActiveOperation, OperationKind};

/// Motion scheduler states
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionState {
    /// No finite motion in progress
    #[default]
    Idle,
    /// A finite motion is running until its countdown expires
    Running(ActiveOperation),
}

impl MotionState {
    /// Check whether no finite motion is in progress
    pub fn is_idle(&self) -> bool {
        matches!(self, MotionState::Idle)
    }

    /// Get the active operation, if any
    pub fn operation(&self) -> Option<&ActiveOperation> {
        match self {
            MotionState::Idle => None,
            MotionState::Running(op) => Some(op),
        }
    }

    /// Get the kind of the active operation, if any
    pub fn kind(&self) -> Option<OperationKind> {
        self.operation().map(|op| op.kind)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: MotionEvent) -> Self {
        use MotionEvent::*;
        use MotionState::*;

        match (self, event) {
            // A new motion always replaces the previous one
            (_, Start(op)) => Running(op),

            (Running(_), Expired) => Idle,
            (Running(_), Superseded) => Idle,

            // Stale expiry or override while idle
            (Idle, _) => Idle,
        }
    }
}
