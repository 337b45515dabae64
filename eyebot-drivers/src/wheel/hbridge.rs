//! PWM + direction H-bridge wheel
//!
//! One wheel on a single-PWM H-bridge: a PWM output sets the power and a
//! GPIO selects the rotation direction. Mirrored motor mounting is
//! handled by inverting the direction pin.
//!
//! # Usage
//!
//! ```ignore
//! let mut wheel = HBridgeWheel::new(pwm, dir_pin).inverted(true);
//! wheel.set(128, WheelDirection::Forward)?;
//! ```

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use eyebot_core::traits::wheel::{WheelDirection, MAX_DUTY};

/// Pin write failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WheelFault {
    /// PWM channel rejected the duty cycle
    Pwm,
    /// Direction pin could not be driven
    Direction,
}

/// Single wheel on an H-bridge
pub struct HBridgeWheel<P, D> {
    pwm: P,
    dir: D,
    /// Drive the direction pin low for forward
    inverted: bool,
    duty: u8,
    direction: WheelDirection,
}

impl<P: SetDutyCycle, D: OutputPin> HBridgeWheel<P, D> {
    /// Create a wheel driver
    ///
    /// Does not touch the pins; the first [`HBridgeWheel::set`] does.
    pub fn new(pwm: P, dir: D) -> Self {
        Self {
            pwm,
            dir,
            inverted: false,
            duty: 0,
            direction: WheelDirection::Forward,
        }
    }

    /// Invert the direction pin for a mirrored motor
    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Check whether the direction pin is inverted
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Last duty written
    pub fn duty(&self) -> u8 {
        self.duty
    }

    /// Last direction written
    pub fn direction(&self) -> WheelDirection {
        self.direction
    }

    /// Select the direction, then apply the duty
    pub fn set(&mut self, duty: u8, direction: WheelDirection) -> Result<(), WheelFault> {
        let high = (direction == WheelDirection::Forward) != self.inverted;
        let pin = if high {
            self.dir.set_high()
        } else {
            self.dir.set_low()
        };
        pin.map_err(|_| WheelFault::Direction)?;
        self.direction = direction;

        self.pwm
            .set_duty_cycle_fraction(duty as u16, MAX_DUTY as u16)
            .map_err(|_| WheelFault::Pwm)?;
        self.duty = duty;
        Ok(())
    }

    /// Cut power, keeping the current direction
    pub fn stop(&mut self) -> Result<(), WheelFault> {
        self.pwm
            .set_duty_cycle_fully_off()
            .map_err(|_| WheelFault::Pwm)?;
        self.duty = 0;
        Ok(())
    }

    /// Release the pins
    pub fn release(self) -> (P, D) {
        (self.pwm, self.dir)
    }
}
