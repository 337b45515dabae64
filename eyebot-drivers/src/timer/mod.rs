//! Countdown timers

pub mod countdown;

pub use countdown::{TickCountdown, DEFAULT_TICK_HZ};
