//! Tick-driven one-shot countdown
//!
//! A periodic timebase interrupt calls [`TickCountdown::tick`]; when it
//! returns `true` the handler delivers the expiry to the motion
//! controller. Arming and ticking only use atomics, so the countdown can
//! live in a `static` shared between both contexts.
//!
//! ```ignore
//! static COUNTDOWN: TickCountdown = TickCountdown::new(DEFAULT_TICK_HZ);
//!
//! // In the 2 kHz timebase:
//! if COUNTDOWN.tick() {
//!     controller.on_timer_expired();
//! }
//! ```

use portable_atomic::{AtomicU32, Ordering};

use eyebot_core::traits::{OneShotTimer, TimerError};

/// Timebase rate of the reference robot (0.5 ms resolution)
pub const DEFAULT_TICK_HZ: u32 = 2000;

/// One-shot countdown in timebase ticks
pub struct TickCountdown {
    /// Ticks until expiry; 0 = disarmed
    remaining: AtomicU32,
    tick_hz: u32,
}

impl TickCountdown {
    pub const fn new(tick_hz: u32) -> Self {
        Self {
            remaining: AtomicU32::new(0),
            tick_hz,
        }
    }

    pub fn tick_hz(&self) -> u32 {
        self.tick_hz
    }

    /// Ticks left before expiry
    pub fn remaining_ticks(&self) -> u32 {
        self.remaining.load(Ordering::Acquire)
    }

    /// Advance by one timebase period
    ///
    /// Returns `true` exactly once per armed countdown, on the tick that
    /// reaches zero.
    pub fn tick(&self) -> bool {
        let previous = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        matches!(previous, Ok(1))
    }

    fn ticks_for(&self, duration_ms: u32) -> Result<u32, TimerError> {
        if self.tick_hz == 0 {
            return Err(TimerError::OutOfRange);
        }
        let ticks = (duration_ms as u64 * self.tick_hz as u64).div_ceil(1000);
        u32::try_from(ticks.max(1)).map_err(|_| TimerError::OutOfRange)
    }

    fn start(&self, duration_ms: u32) -> Result<(), TimerError> {
        let ticks = self.ticks_for(duration_ms)?;
        trace!("countdown armed: {} ms = {} ticks", duration_ms, ticks);
        self.remaining.store(ticks, Ordering::Release);
        Ok(())
    }

    fn cancel(&self) {
        self.remaining.store(0, Ordering::Release);
    }
}

impl OneShotTimer for &TickCountdown {
    fn arm(&mut self, duration_ms: u32) -> Result<(), TimerError> {
        self.start(duration_ms)
    }

    fn disarm(&mut self) {
        self.cancel();
    }

    fn is_armed(&self) -> bool {
        self.remaining_ticks() != 0
    }
}
