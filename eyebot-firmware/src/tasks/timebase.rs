//! Motion timebase
//!
//! Runs on the high-priority interrupt executor at 2 kHz and delivers
//! countdown expiry to the controller. It preempts the thread-mode tasks,
//! including one blocked in `wait_until_done`.

use defmt::*;
use embassy_time::{Duration, Ticker};

use eyebot_drivers::timer::TickCountdown;

use crate::board::Controller;

#[embassy_executor::task]
pub async fn timebase_task(countdown: &'static TickCountdown, ctrl: &'static Controller) {
    info!("Timebase started at {} Hz", countdown.tick_hz());

    let period_us = 1_000_000 / countdown.tick_hz() as u64;
    let mut ticker = Ticker::every(Duration::from_micros(period_us));

    loop {
        ticker.next().await;

        if countdown.tick() {
            ctrl.on_timer_expired();
        }
    }
}
