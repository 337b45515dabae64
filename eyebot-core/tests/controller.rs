//! Controller scenarios against simulated wheels, countdown and clock
//!
//! The harness advances a millisecond clock and delivers the countdown
//! expiry the way a timer interrupt would.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use eyebot_core::config::{ControllerConfig, TrimOffsets};
use eyebot_core::drive::Velocity;
use eyebot_core::motion::{MotionController, MotionError, COMPLETION_QUEUE_LEN};
use eyebot_core::odometry::Pose;
use eyebot_core::state::OperationKind;
use eyebot_core::traits::{Clock, OneShotTimer, Side, TimerError, WheelDirection, WheelOutput};

#[derive(Clone, Default)]
struct SimClock(Rc<Cell<u64>>);

impl SimClock {
    fn set(&self, ms: u64) {
        self.0.set(ms);
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

#[derive(Default)]
struct TimerState {
    deadline: Option<u64>,
    arms: u32,
    disarms: u32,
    fail: Option<TimerError>,
}

#[derive(Clone)]
struct SimTimer {
    clock: SimClock,
    state: Rc<RefCell<TimerState>>,
}

impl SimTimer {
    /// Consume the countdown if it has elapsed
    fn take_expired(&self) -> bool {
        let mut state = self.state.borrow_mut();
        match state.deadline {
            Some(deadline) if self.clock.now_ms() >= deadline => {
                state.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl OneShotTimer for SimTimer {
    fn arm(&mut self, duration_ms: u32) -> Result<(), TimerError> {
        let mut state = self.state.borrow_mut();
        if let Some(err) = state.fail {
            return Err(err);
        }
        state.arms += 1;
        state.deadline = Some(self.clock.now_ms() + duration_ms as u64);
        Ok(())
    }

    fn disarm(&mut self) {
        let mut state = self.state.borrow_mut();
        state.disarms += 1;
        state.deadline = None;
    }

    fn is_armed(&self) -> bool {
        self.state.borrow().deadline.is_some()
    }
}

type WheelState = (u8, WheelDirection);

#[derive(Clone, Default)]
struct SimWheels(Rc<RefCell<[WheelState; 2]>>);

impl SimWheels {
    fn left(&self) -> WheelState {
        self.0.borrow()[0]
    }

    fn right(&self) -> WheelState {
        self.0.borrow()[1]
    }

    fn stopped(&self) -> bool {
        self.left().0 == 0 && self.right().0 == 0
    }
}

impl WheelOutput for SimWheels {
    fn set_wheel(&mut self, side: Side, duty: u8, direction: WheelDirection) {
        let index = match side {
            Side::Left => 0,
            Side::Right => 1,
        };
        self.0.borrow_mut()[index] = (duty, direction);
    }
}

struct Harness {
    ctrl: MotionController<SimWheels, SimTimer, SimClock>,
    clock: SimClock,
    timer: SimTimer,
    wheels: SimWheels,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(ControllerConfig::new())
    }

    fn with_config(config: ControllerConfig) -> Self {
        let clock = SimClock::default();
        let timer = SimTimer {
            clock: clock.clone(),
            state: Rc::new(RefCell::new(TimerState::default())),
        };
        let wheels = SimWheels::default();
        let ctrl = MotionController::new(wheels.clone(), timer.clone(), clock.clone(), config);
        ctrl.stop();
        Self {
            ctrl,
            clock,
            timer,
            wheels,
        }
    }

    /// Step the clock one millisecond at a time, firing expiry when due
    fn advance(&self, ms: u64) {
        for _ in 0..ms {
            self.clock.set(self.clock.now_ms() + 1);
            if self.timer.take_expired() {
                self.ctrl.on_timer_expired();
            }
        }
    }

    fn arms(&self) -> u32 {
        self.timer.state.borrow().arms
    }

    fn disarms(&self) -> u32 {
        self.timer.state.borrow().disarms
    }

    fn fail_arming(&self, err: TimerError) {
        self.timer.state.borrow_mut().fail = Some(err);
    }
}

/// Delay that advances the simulated clock
struct SimDelay<'a> {
    harness: &'a Harness,
    pending_ns: u64,
    polls: u32,
}

impl DelayNs for SimDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.polls += 1;
        self.pending_ns += ns as u64;
        while self.pending_ns >= 1_000_000 {
            self.pending_ns -= 1_000_000;
            self.harness.advance(1);
        }
    }
}

fn assert_pose(actual: Pose, x_mm: f32, y_mm: f32, heading_deg: f32) {
    let close = |a: f32, b: f32, tol: f32| (a - b).abs() < tol;
    assert!(
        close(actual.x_mm, x_mm, 0.5)
            && close(actual.y_mm, y_mm, 0.5)
            && close(actual.heading_deg, heading_deg, 0.05),
        "expected ({x_mm}, {y_mm}, {heading_deg}), got {actual:?}"
    );
}

#[test]
fn test_straight_drive_reaches_target() {
    let h = Harness::new();
    h.ctrl.drive_straight(500, 250).unwrap();

    assert!(!h.ctrl.is_done());
    assert_eq!(h.wheels.left(), (187, WheelDirection::Forward));
    assert_eq!(h.wheels.right(), (187, WheelDirection::Forward));

    h.advance(2000);
    assert!(h.ctrl.is_done());
    assert!(h.wheels.stopped());
    assert_eq!(h.ctrl.velocity(), Velocity::ZERO);
    assert_pose(h.ctrl.pose(), 0.0, 500.0, 0.0);

    let done = h.ctrl.poll_completion().unwrap();
    assert_eq!(done.kind, OperationKind::Straight);
    assert_pose(done.pose, 0.0, 500.0, 0.0);
    assert_eq!(h.ctrl.poll_completion(), None);
}

#[test]
fn test_straight_drive_follows_heading() {
    let h = Harness::new();
    h.ctrl.set_pose(Pose::new(100.0, 100.0, 90.0));
    h.ctrl.drive_straight(300, 100).unwrap();
    h.advance(3000);
    assert_pose(h.ctrl.pose(), 400.0, 100.0, 90.0);

    h.ctrl.drive_straight(-200, 100).unwrap();
    h.advance(2000);
    assert_pose(h.ctrl.pose(), 200.0, 100.0, 90.0);
}

#[test]
fn test_live_pose_during_motion() {
    let h = Harness::new();
    h.ctrl.drive_straight(1000, 100).unwrap();
    h.advance(2500);
    assert_pose(h.ctrl.pose(), 0.0, 250.0, 0.0);
}

#[test]
fn test_stop_while_running() {
    let h = Harness::new();
    h.ctrl.drive_straight(1000, 200).unwrap();
    h.advance(1000);

    h.ctrl.set_velocity(0, 0);
    assert!(h.wheels.stopped());
    assert!(!h.timer.is_armed());
    assert_eq!(h.disarms(), 1);
    assert!(h.ctrl.is_done());
    assert_eq!(h.ctrl.remaining_distance(), None);
    assert_pose(h.ctrl.pose(), 0.0, 200.0, 0.0);

    // The cancelled motion never completes
    h.advance(10_000);
    assert_eq!(h.ctrl.poll_completion(), None);
    assert_pose(h.ctrl.pose(), 0.0, 200.0, 0.0);
}

#[test]
fn test_remaining_distance_counts_down() {
    let h = Harness::new();
    assert_eq!(h.ctrl.remaining_distance(), None);

    h.ctrl.drive_straight(500, 250).unwrap();
    let mut last = h.ctrl.remaining_distance().unwrap();
    assert_eq!(last, 500);

    while !h.ctrl.is_done() {
        let remaining = h.ctrl.remaining_distance().unwrap();
        assert!(remaining <= last, "{remaining} > {last}");
        last = remaining;
        h.advance(1);
    }
    assert_eq!(last, 0);
    assert_eq!(h.ctrl.remaining_distance(), None);
}

#[test]
fn test_remaining_distance_during_curve_and_turn() {
    let h = Harness::new();
    h.ctrl.drive_curve(1000, 90, 200).unwrap();
    h.advance(2500);
    assert_eq!(h.ctrl.remaining_distance(), Some(500));

    h.ctrl.turn_in_place(90, 45).unwrap();
    assert_eq!(h.ctrl.remaining_distance(), Some(0));
}

#[test]
fn test_turn_in_place_takes_one_second() {
    let h = Harness::new();
    h.ctrl.turn_in_place(90, 45).unwrap();

    // Pivot: 255 * 45 / 180, left forward for clockwise
    assert_eq!(h.wheels.left(), (63, WheelDirection::Forward));
    assert_eq!(h.wheels.right(), (63, WheelDirection::Backward));

    h.advance(999);
    assert!(!h.ctrl.is_done());
    h.advance(1);
    assert!(h.ctrl.is_done());
    assert_pose(h.ctrl.pose(), 0.0, 0.0, 90.0);
}

#[test]
fn test_counter_clockwise_turn() {
    let h = Harness::new();
    h.ctrl.turn_in_place(-180, 90).unwrap();
    assert_eq!(h.wheels.left().1, WheelDirection::Backward);
    assert_eq!(h.wheels.right().1, WheelDirection::Forward);
    h.advance(1000);
    assert_pose(h.ctrl.pose(), 0.0, 0.0, -180.0);
}

#[test]
fn test_back_to_back_straight_truncates_first() {
    let h = Harness::new();
    h.ctrl.drive_straight(1000, 100).unwrap();
    h.advance(500);
    h.ctrl.drive_straight(1000, 100).unwrap();

    assert_eq!(h.arms(), 2);
    assert_eq!(h.disarms(), 1);
    assert_eq!(h.timer.state.borrow().deadline, Some(10_500));

    h.advance(10_000);
    assert!(h.ctrl.is_done());
    assert_pose(h.ctrl.pose(), 0.0, 1050.0, 0.0);

    // Only the second motion completes
    assert!(h.ctrl.poll_completion().is_some());
    assert_eq!(h.ctrl.poll_completion(), None);
}

#[test]
fn test_quarter_circle_curve() {
    let h = Harness::new();
    h.ctrl.drive_curve(1000, 90, 200).unwrap();
    assert_eq!(h.ctrl.velocity(), Velocity::new(200.0, 18.0));

    h.advance(5000);
    assert!(h.ctrl.is_done());
    let radius = 1000.0 / core::f32::consts::FRAC_PI_2;
    assert_pose(h.ctrl.pose(), radius, radius, 90.0);
}

#[test]
fn test_invalid_speed_changes_nothing() {
    let h = Harness::new();
    h.ctrl.drive_straight(1000, 100).unwrap();
    h.advance(200);
    let wheels = (h.wheels.left(), h.wheels.right());
    let op = h.ctrl.active_operation();

    assert_eq!(h.ctrl.drive_straight(100, 0), Err(MotionError::InvalidSpeed));
    assert_eq!(h.ctrl.turn_in_place(90, -10), Err(MotionError::InvalidSpeed));
    assert_eq!(h.ctrl.drive_curve(100, 10, 0), Err(MotionError::InvalidSpeed));
    assert_eq!(h.ctrl.drive_to(10, 100, 0), Err(MotionError::InvalidSpeed));

    assert_eq!((h.wheels.left(), h.wheels.right()), wheels);
    assert_eq!(h.ctrl.active_operation(), op);
    assert_eq!(h.arms(), 1);
    assert_eq!(h.disarms(), 0);
}

#[test]
fn test_arm_failure_stops_wheels() {
    let h = Harness::new();
    h.ctrl.set_velocity(200, 0);
    h.advance(1000);
    h.fail_arming(TimerError::Busy);

    assert_eq!(
        h.ctrl.drive_straight(500, 100),
        Err(MotionError::Timer(TimerError::Busy))
    );
    assert!(h.wheels.stopped());
    assert!(h.ctrl.is_done());
    assert_eq!(h.ctrl.velocity(), Velocity::ZERO);
    assert_pose(h.ctrl.pose(), 0.0, 200.0, 0.0);
}

#[test]
fn test_zero_length_request_is_done_immediately() {
    let h = Harness::new();
    h.ctrl.set_velocity(100, 0);
    h.advance(1000);

    h.ctrl.drive_straight(0, 100).unwrap();
    assert!(h.ctrl.is_done());
    assert!(h.wheels.stopped());
    assert_eq!(h.arms(), 0);
    assert_pose(h.ctrl.pose(), 0.0, 100.0, 0.0);

    h.ctrl.turn_in_place(0, 90).unwrap();
    assert!(h.ctrl.is_done());
    assert_eq!(h.ctrl.poll_completion(), None);
}

#[test]
fn test_set_pose_during_motion_rebases_target() {
    let h = Harness::new();
    h.ctrl.drive_straight(1000, 100).unwrap();
    h.advance(4000);

    h.ctrl.set_pose(Pose::new(0.0, 0.0, 90.0));
    assert_pose(h.ctrl.pose(), 0.0, 0.0, 90.0);
    let op = h.ctrl.active_operation().unwrap();
    assert_pose(op.final_pose, 600.0, 0.0, 90.0);

    h.advance(3000);
    assert_pose(h.ctrl.pose(), 300.0, 0.0, 90.0);
    assert_eq!(h.ctrl.remaining_distance(), Some(300));

    h.advance(3000);
    assert!(h.ctrl.is_done());
    assert_pose(h.ctrl.pose(), 600.0, 0.0, 90.0);
}

#[test]
fn test_set_pose_keeps_velocity_when_idle() {
    let h = Harness::new();
    h.ctrl.set_velocity(100, 0);
    h.advance(1000);
    h.ctrl.set_pose(Pose::ORIGIN);
    h.advance(1000);
    assert_pose(h.ctrl.pose(), 0.0, 100.0, 0.0);
}

#[test]
fn test_late_expiry_does_not_overshoot() {
    let h = Harness::new();
    h.ctrl.drive_straight(100, 100).unwrap();

    // Clock runs past the end before the interrupt is serviced
    h.clock.set(1500);
    assert_pose(h.ctrl.pose(), 0.0, 100.0, 0.0);
    assert!(h.timer.take_expired());
    assert!(h.ctrl.on_timer_expired());
    assert_pose(h.ctrl.pose(), 0.0, 100.0, 0.0);
}

#[test]
fn test_stale_expiry_is_ignored() {
    let h = Harness::new();
    assert!(!h.ctrl.on_timer_expired());

    h.ctrl.set_velocity(100, 0);
    assert!(!h.ctrl.on_timer_expired());
    // An indefinite velocity command keeps running
    assert_eq!(h.wheels.left().0, 75);
    assert_eq!(h.ctrl.poll_completion(), None);
}

#[test]
fn test_completion_queue_drops_oldest() {
    let h = Harness::new();
    for _ in 0..COMPLETION_QUEUE_LEN + 1 {
        h.ctrl.drive_straight(10, 100).unwrap();
        h.advance(100);
    }

    let first = h.ctrl.poll_completion().unwrap();
    assert_pose(first.pose, 0.0, 20.0, 0.0);
    let mut drained = 1;
    while h.ctrl.poll_completion().is_some() {
        drained += 1;
    }
    assert_eq!(drained, COMPLETION_QUEUE_LEN);
}

#[test]
fn test_drive_to() {
    let h = Harness::new();

    h.ctrl.drive_to(0, 300, 100).unwrap();
    assert_eq!(h.ctrl.active_operation().unwrap().kind, OperationKind::Straight);
    h.advance(3000);
    assert_pose(h.ctrl.pose(), 0.0, 300.0, 0.0);

    h.ctrl.drive_to(100, 1000, 200).unwrap();
    let op = h.ctrl.active_operation().unwrap();
    assert_eq!(op.kind, OperationKind::Curve);
    assert_eq!(op.total_ms, 5010);

    assert_eq!(
        h.ctrl.drive_to(100, 0, 200),
        Err(MotionError::InvalidGeometry)
    );
    // Rejected before the running curve was touched
    assert_eq!(h.ctrl.active_operation(), Some(op));
}

#[test]
fn test_wait_until_done_polls_delay() {
    let h = Harness::new();
    h.ctrl.turn_in_place(90, 90).unwrap();

    let mut delay = SimDelay {
        harness: &h,
        pending_ns: 0,
        polls: 0,
    };
    h.ctrl.wait_until_done(&mut delay);

    assert!(h.ctrl.is_done());
    assert_eq!(h.clock.now_ms(), 500);
    assert!(delay.polls > 0);
    assert_pose(h.ctrl.pose(), 0.0, 0.0, 90.0);
}

#[test]
fn test_wait_until_done_returns_when_idle() {
    let h = Harness::new();
    let mut delay = SimDelay {
        harness: &h,
        pending_ns: 0,
        polls: 0,
    };
    h.ctrl.wait_until_done(&mut delay);
    assert_eq!(delay.polls, 0);
}

#[test]
fn test_trim_applies_on_next_command() {
    let h = Harness::new();
    h.ctrl.set_velocity(170, 0);
    assert_eq!(h.wheels.left().0, 127);

    assert_eq!(h.ctrl.set_offsets(10, -300), TrimOffsets::new(10, 0));
    assert_eq!(h.ctrl.trim(), TrimOffsets::new(10, 0));
    assert_eq!(h.wheels.left().0, 127);

    h.ctrl.set_velocity(170, 0);
    assert_eq!(h.wheels.left().0, 137);
    assert_eq!(h.wheels.right().0, 127);
}

#[test]
fn test_configured_trim() {
    let config = ControllerConfig::new().with_trim(TrimOffsets::new(-20, 0));
    let h = Harness::with_config(config);
    h.ctrl.drive_straight(100, 340).unwrap();
    assert_eq!(h.wheels.left().0, 235);
    assert_eq!(h.wheels.right().0, 255);
}

#[test]
fn test_velocity_is_clamped() {
    let h = Harness::new();
    h.ctrl.set_velocity(1000, -1000);
    assert_eq!(h.ctrl.velocity(), Velocity::new(340.0, -180.0));
}
