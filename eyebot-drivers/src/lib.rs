//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in eyebot-core:
//!
//! - Wheel output over `embedded-hal` PWM and direction pins
//! - Tick-driven one-shot countdown for the motion scheduler
//! - Millisecond clocks (tick counter, embassy-time)

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod log;

pub mod clock;
pub mod timer;
pub mod wheel;
