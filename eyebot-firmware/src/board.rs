//! Board wiring for the reference robot
//!
//! | Signal | GPIO | Peripheral |
//! |--------|------|------------|
//! | Left motor PWM | 10 | PWM slice 5, channel A |
//! | Left motor direction | 3 | |
//! | Right motor PWM | 12 | PWM slice 6, channel A |
//! | Right motor direction | 11 | |
//!
//! The right motor is mounted mirrored, so its direction pin is inverted.

use core::convert::Infallible;

use embassy_rp::gpio::Output;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embedded_hal::pwm::{ErrorType, SetDutyCycle};

use eyebot_core::motion::MotionController;
use eyebot_drivers::clock::EmbassyClock;
use eyebot_drivers::timer::TickCountdown;
use eyebot_drivers::wheel::DifferentialDrive;

/// PWM counter top: 125 MHz / 5000 = 25 kHz
pub const PWM_TOP: u16 = 4999;

/// Channel A of a PWM slice
pub struct PwmChannelA {
    pwm: Pwm<'static>,
    config: PwmConfig,
}

impl PwmChannelA {
    /// Configure the slice with the output off
    pub fn new(mut pwm: Pwm<'static>) -> Self {
        let mut config = PwmConfig::default();
        config.top = PWM_TOP;
        config.compare_a = 0;
        pwm.set_config(&config);
        Self { pwm, config }
    }
}

impl ErrorType for PwmChannelA {
    type Error = Infallible;
}

impl SetDutyCycle for PwmChannelA {
    fn max_duty_cycle(&self) -> u16 {
        // Output stays high for the whole period when compare exceeds top
        self.config.top + 1
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.config.compare_a = duty;
        self.pwm.set_config(&self.config);
        Ok(())
    }
}

pub type Wheels = DifferentialDrive<PwmChannelA, Output<'static>, PwmChannelA, Output<'static>>;

pub type Controller = MotionController<Wheels, &'static TickCountdown, EmbassyClock>;
