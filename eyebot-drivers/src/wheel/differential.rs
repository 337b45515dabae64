//! Two H-bridge wheels as one drive train

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use eyebot_core::traits::{Side, WheelDirection, WheelOutput};

use super::hbridge::{HBridgeWheel, WheelFault};

/// Left and right wheel pair
///
/// Pin faults are logged and counted; the motion core has no way to act
/// on them.
pub struct DifferentialDrive<LP, LD, RP, RD> {
    left: HBridgeWheel<LP, LD>,
    right: HBridgeWheel<RP, RD>,
    faults: u32,
}

impl<LP, LD, RP, RD> DifferentialDrive<LP, LD, RP, RD>
where
    LP: SetDutyCycle,
    LD: OutputPin,
    RP: SetDutyCycle,
    RD: OutputPin,
{
    pub fn new(left: HBridgeWheel<LP, LD>, right: HBridgeWheel<RP, RD>) -> Self {
        Self {
            left,
            right,
            faults: 0,
        }
    }

    pub fn left(&self) -> &HBridgeWheel<LP, LD> {
        &self.left
    }

    pub fn right(&self) -> &HBridgeWheel<RP, RD> {
        &self.right
    }

    /// Number of failed pin writes since creation
    pub fn fault_count(&self) -> u32 {
        self.faults
    }

    fn record(&mut self, side: Side, result: Result<(), WheelFault>) {
        if let Err(fault) = result {
            warn!("{} wheel fault: {}", side, fault);
            self.faults = self.faults.saturating_add(1);
        }
    }
}

impl<LP, LD, RP, RD> WheelOutput for DifferentialDrive<LP, LD, RP, RD>
where
    LP: SetDutyCycle,
    LD: OutputPin,
    RP: SetDutyCycle,
    RD: OutputPin,
{
    fn set_wheel(&mut self, side: Side, duty: u8, direction: WheelDirection) {
        trace!("{} wheel duty {} {}", side, duty, direction);
        let result = match side {
            Side::Left => self.left.set(duty, direction),
            Side::Right => self.right.set(duty, direction),
        };
        self.record(side, result);
    }

    fn stop_all(&mut self) {
        let result = self.left.stop();
        self.record(Side::Left, result);
        let result = self.right.stop();
        self.record(Side::Right, result);
    }
}
