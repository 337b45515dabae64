//! Millisecond clocks

use portable_atomic::{AtomicU64, Ordering};

use eyebot_core::traits::Clock;

/// Clock counted by a periodic timebase
///
/// Shares the timebase with [`crate::timer::TickCountdown`] when no
/// system timer is available.
pub struct TickClock {
    ticks: AtomicU64,
    tick_hz: u32,
}

impl TickClock {
    pub const fn new(tick_hz: u32) -> Self {
        Self {
            ticks: AtomicU64::new(0),
            tick_hz,
        }
    }

    /// Advance by one timebase period
    pub fn tick(&self) {
        self.ticks.fetch_add(1, Ordering::AcqRel);
    }

    /// Ticks since creation
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }
}

impl Clock for TickClock {
    fn now_ms(&self) -> u64 {
        if self.tick_hz == 0 {
            return 0;
        }
        self.ticks() * 1000 / self.tick_hz as u64
    }
}

/// Clock backed by the embassy time driver
#[cfg(feature = "embassy")]
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embassy")]
impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }
}
