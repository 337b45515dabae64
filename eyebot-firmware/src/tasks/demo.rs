//! Square-driving demo
//!
//! Drives a square of `SIDE_MM`, reporting each completed leg, then pauses
//! and repeats.

use defmt::*;
use embassy_time::{Delay, Timer};

use eyebot_core::motion::MotionError;

use crate::board::Controller;

const SIDE_MM: i32 = 300;
const DRIVE_SPEED_MM_S: i32 = 200;
const TURN_SPEED_DEG_S: i32 = 60;

#[embassy_executor::task]
pub async fn demo_task(ctrl: &'static Controller) {
    info!("Demo task started");
    Timer::after_secs(2).await;

    let mut delay = Delay;

    loop {
        for _ in 0..4 {
            run(ctrl, &mut delay, ctrl.drive_straight(SIDE_MM, DRIVE_SPEED_MM_S));
            run(ctrl, &mut delay, ctrl.turn_in_place(90, TURN_SPEED_DEG_S));
        }

        let pose = ctrl.pose();
        info!(
            "Square done: x={} y={} heading={}",
            pose.x_mm, pose.y_mm, pose.heading_deg
        );
        Timer::after_secs(5).await;
    }
}

/// Wait for a started motion and log its completion
fn run(ctrl: &Controller, delay: &mut Delay, started: Result<(), MotionError>) {
    if let Err(e) = started {
        warn!("Motion rejected: {:?}", e);
        return;
    }

    ctrl.wait_until_done(delay);

    while let Some(done) = ctrl.poll_completion() {
        debug!("{} complete at {}", done.kind, done.pose);
    }
}
