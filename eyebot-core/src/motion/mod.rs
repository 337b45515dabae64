//! Motion scheduling
//!
//! Planning of finite motions and the controller that runs them against a
//! one-shot countdown.

pub mod controller;
pub mod error;
pub mod goto;
pub mod plan;

pub use controller::{Completion, MotionController, COMPLETION_QUEUE_LEN};
pub use error::MotionError;
pub use goto::{derive_goto, GotoPlan};
pub use plan::{plan_curve, plan_straight, plan_turn, MotionPlan};
