//! EyeBot - Motion Firmware
//!
//! Main firmware binary for the RP2040-based EyeBot robot. Wires the H-bridge
//! wheels, the 2 kHz countdown and the embassy clock into a
//! `MotionController`, then runs a demo program.
//!
//! The timebase task runs on an interrupt executor so that it preempts the
//! thread-mode executor, where motion commands may block.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt::*;
use embassy_executor::{Executor, InterruptExecutor};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use eyebot_core::config::ControllerConfig;
use eyebot_core::motion::MotionController;
use eyebot_drivers::clock::EmbassyClock;
use eyebot_drivers::timer::{TickCountdown, DEFAULT_TICK_HZ};
use eyebot_drivers::wheel::{DifferentialDrive, HBridgeWheel};

use crate::board::{Controller, PwmChannelA};

mod board;
mod tasks;

static COUNTDOWN: TickCountdown = TickCountdown::new(DEFAULT_TICK_HZ);
static CONTROLLER: StaticCell<Controller> = StaticCell::new();

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_LOW: StaticCell<Executor> = StaticCell::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

#[entry]
fn main() -> ! {
    info!("EyeBot firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let left = HBridgeWheel::new(
        PwmChannelA::new(Pwm::new_output_a(p.PWM_SLICE5, p.PIN_10, PwmConfig::default())),
        Output::new(p.PIN_3, Level::Low),
    );
    let right = HBridgeWheel::new(
        PwmChannelA::new(Pwm::new_output_a(p.PWM_SLICE6, p.PIN_12, PwmConfig::default())),
        Output::new(p.PIN_11, Level::Low),
    )
    .inverted(true);

    let ctrl: &'static Controller = CONTROLLER.init(MotionController::new(
        DifferentialDrive::new(left, right),
        &COUNTDOWN,
        EmbassyClock,
        ControllerConfig::new(),
    ));
    ctrl.stop();
    info!("Motion controller ready");

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    spawner
        .spawn(tasks::timebase_task(&COUNTDOWN, ctrl))
        .unwrap();

    let executor = EXECUTOR_LOW.init(Executor::new());
    executor.run(|spawner| {
        spawner.spawn(tasks::demo_task(ctrl)).unwrap();
    })
}
