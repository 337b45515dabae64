//! Interrupt-safe motion controller
//!
//! [`MotionController`] owns the wheels, the countdown timer and the clock.
//! Commands run in the main context; [`MotionController::on_timer_expired`]
//! runs in the timer interrupt. Both go through one critical-section mutex,
//! so a pose, a velocity and an operation record are always updated
//! together.
//!
//! The committed pose is only a base: queries add the displacement
//! integrated since `base_ms` under the commanded velocity. Every new
//! command first flushes the previous one (disarm, rebase, supersede)
//! before it touches the wheels.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::delay::DelayNs;
use heapless::Deque;
use libm::fabsf;

use super::error::MotionError;
use super::goto::{derive_goto, GotoPlan};
use super::plan::{plan_curve, plan_straight, plan_turn, MotionPlan};
use crate::config::{ControllerConfig, DriveLimits, TrimOffsets};
use crate::drive::{SpeedMapper, Velocity};
use crate::odometry::{estimate_pose, Pose};
use crate::state::{ActiveOperation, MotionEvent, MotionState, OperationKind};
use crate::traits::{Clock, OneShotTimer, WheelOutput};

/// Completion notifications kept until drained
pub const COMPLETION_QUEUE_LEN: usize = 4;

/// A finite motion that ran to its planned end
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Completion {
    pub kind: OperationKind,
    /// Pose committed at expiry
    pub pose: Pose,
}

struct Inner<W, T, C> {
    wheels: W,
    timer: T,
    clock: C,
    mapper: SpeedMapper,
    /// Pose at `base_ms`
    pose: Pose,
    base_ms: u64,
    /// Commanded velocity since `base_ms`, already clamped
    velocity: Velocity,
    state: MotionState,
    completions: Deque<Completion, COMPLETION_QUEUE_LEN>,
}

impl<W: WheelOutput, T: OneShotTimer, C: Clock> Inner<W, T, C> {
    fn live_pose(&self, now_ms: u64) -> Pose {
        let mut elapsed = now_ms.saturating_sub(self.base_ms);
        // Expiry may be serviced slightly late; never integrate past the end
        if let Some(op) = self.state.operation() {
            elapsed = elapsed.min(op.end_ms().saturating_sub(self.base_ms));
        }
        let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
        estimate_pose(self.pose, self.velocity, elapsed)
    }

    /// Commit the live estimate and cancel any finite motion
    ///
    /// Leaves the wheels as they are; the caller either drives or halts.
    fn flush(&mut self, now_ms: u64) {
        self.pose = self.live_pose(now_ms);
        self.base_ms = now_ms;

        if let Some(op) = self.state.operation() {
            trace!("superseding {} after {} ms", op.kind, op.elapsed_ms(now_ms));
            self.timer.disarm();
            self.state = self.state.transition(MotionEvent::Superseded);
        }
        self.velocity = Velocity::ZERO;
    }

    fn drive(&mut self, velocity: Velocity) {
        let velocity = self.mapper.clamp(velocity);
        self.mapper.map(velocity).apply(&mut self.wheels);
        self.velocity = velocity;
    }

    fn halt(&mut self) {
        self.wheels.stop_all();
        self.velocity = Velocity::ZERO;
    }

    fn start(&mut self, plan: MotionPlan) -> Result<(), MotionError> {
        let now_ms = self.clock.now_ms();
        self.flush(now_ms);

        if plan.is_empty() {
            self.halt();
            return Ok(());
        }

        let velocity = self.mapper.clamp(plan.velocity);
        let final_pose = estimate_pose(self.pose, velocity, plan.total_ms);

        if let Err(err) = self.timer.arm(plan.total_ms) {
            warn!("countdown arm failed: {}", err);
            self.halt();
            return Err(err.into());
        }

        self.drive(velocity);
        let op = ActiveOperation {
            kind: plan.kind,
            start_ms: now_ms,
            total_ms: plan.total_ms,
            final_pose,
        };
        self.state = self.state.transition(MotionEvent::Start(op));
        Ok(())
    }

    fn expire(&mut self) -> bool {
        let MotionState::Running(op) = self.state else {
            trace!("stale countdown expiry");
            return false;
        };

        self.wheels.stop_all();
        self.pose = op.final_pose;
        self.base_ms = op.end_ms();
        self.velocity = Velocity::ZERO;
        self.state = self.state.transition(MotionEvent::Expired);

        if self.completions.is_full() {
            self.completions.pop_front();
        }
        // Cannot fail after making room
        let _ = self.completions.push_back(Completion {
            kind: op.kind,
            pose: op.final_pose,
        });

        trace!("{} expired", op.kind);
        true
    }

    fn set_pose(&mut self, pose: Pose) {
        let now_ms = self.clock.now_ms();
        if let MotionState::Running(op) = &mut self.state {
            op.final_pose = estimate_pose(pose, self.velocity, op.remaining_ms(now_ms));
        }
        self.pose = pose;
        self.base_ms = now_ms;
    }

    fn remaining_distance(&self) -> Option<u32> {
        let op = self.state.operation()?;
        if !op.kind.tracks_distance() {
            return Some(0);
        }
        let remaining_ms = op.remaining_ms(self.clock.now_ms());
        let speed = fabsf(self.velocity.linear_mm_s);
        Some((remaining_ms as f32 * speed / 1000.0) as u32)
    }
}

/// Timed dead-reckoning motion controller
///
/// Designed to live in a `static` and be shared between the main context
/// and the timer interrupt; every method takes `&self`.
///
/// Construction does not touch the hardware. Call
/// [`MotionController::stop`] once at boot to put the wheels in a known
/// state.
pub struct MotionController<W, T, C> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner<W, T, C>>>,
    limits: DriveLimits,
    wait_poll_us: u32,
}

impl<W: WheelOutput, T: OneShotTimer, C: Clock> MotionController<W, T, C> {
    /// Create a controller at the origin, idle
    pub const fn new(wheels: W, timer: T, clock: C, config: ControllerConfig) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                wheels,
                timer,
                clock,
                mapper: SpeedMapper::new(config.limits, config.trim),
                pose: Pose::ORIGIN,
                base_ms: 0,
                velocity: Velocity::ZERO,
                state: MotionState::Idle,
                completions: Deque::new(),
            })),
            limits: config.limits,
            wait_poll_us: config.wait_poll_us,
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Inner<W, T, C>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Speed limits in effect
    pub fn limits(&self) -> DriveLimits {
        self.limits
    }

    /// Drive indefinitely at `linear_mm_s` while turning at `angular_deg_s`
    ///
    /// Cancels any finite motion. Out-of-range speeds are clamped, and
    /// `(0, 0)` stops the wheels.
    pub fn set_velocity(&self, linear_mm_s: i32, angular_deg_s: i32) {
        debug!("set_velocity {} mm/s {} deg/s", linear_mm_s, angular_deg_s);
        let velocity = Velocity::new(linear_mm_s as f32, angular_deg_s as f32);
        self.with(|inner| {
            let now_ms = inner.clock.now_ms();
            inner.flush(now_ms);
            inner.drive(velocity);
        });
    }

    /// Stop the wheels and cancel any finite motion
    pub fn stop(&self) {
        self.set_velocity(0, 0);
    }

    /// Commanded velocity
    pub fn velocity(&self) -> Velocity {
        self.with(|inner| inner.velocity)
    }

    /// Set per-wheel PWM trim
    ///
    /// Out-of-range values are replaced by 0. Applies from the next
    /// velocity change; wheels already running keep their duty.
    pub fn set_offsets(&self, left: i16, right: i16) -> TrimOffsets {
        let trim = TrimOffsets::new(left, right);
        info!("trim offsets left {} right {}", trim.left, trim.right);
        self.with(|inner| inner.mapper.set_trim(trim));
        trim
    }

    /// Current trim offsets
    pub fn trim(&self) -> TrimOffsets {
        self.with(|inner| inner.mapper.trim())
    }

    /// Overwrite the pose estimate
    ///
    /// The wheels keep their velocity. During a finite motion the pose
    /// committed at expiry is re-derived from `pose` and the time left.
    pub fn set_pose(&self, pose: Pose) {
        info!("set_pose {}", pose);
        self.with(|inner| inner.set_pose(pose));
    }

    /// Live pose estimate
    pub fn pose(&self) -> Pose {
        self.with(|inner| inner.live_pose(inner.clock.now_ms()))
    }

    /// Drive `distance_mm` along the current heading (negative = reverse)
    pub fn drive_straight(&self, distance_mm: i32, speed_mm_s: i32) -> Result<(), MotionError> {
        let plan = plan_straight(distance_mm, speed_mm_s, &self.limits)?;
        debug!("drive_straight {} mm at {} mm/s", distance_mm, speed_mm_s);
        self.with(|inner| inner.start(plan))
    }

    /// Rotate in place by `angle_deg` (positive = clockwise)
    pub fn turn_in_place(&self, angle_deg: i32, speed_deg_s: i32) -> Result<(), MotionError> {
        let plan = plan_turn(angle_deg, speed_deg_s, &self.limits)?;
        debug!("turn_in_place {} deg at {} deg/s", angle_deg, speed_deg_s);
        self.with(|inner| inner.start(plan))
    }

    /// Drive `distance_mm` while changing heading by `angle_deg`
    pub fn drive_curve(
        &self,
        distance_mm: i32,
        angle_deg: i32,
        speed_mm_s: i32,
    ) -> Result<(), MotionError> {
        let plan = plan_curve(distance_mm, angle_deg, speed_mm_s, &self.limits)?;
        debug!(
            "drive_curve {} mm {} deg at {} mm/s",
            distance_mm, angle_deg, speed_mm_s
        );
        self.with(|inner| inner.start(plan))
    }

    /// Approach a point `lateral_mm` to the right and `forward_mm` ahead
    ///
    /// Uses a single arc; see [`derive_goto`] for the approximation.
    pub fn drive_to(
        &self,
        lateral_mm: i32,
        forward_mm: i32,
        speed_mm_s: i32,
    ) -> Result<(), MotionError> {
        if speed_mm_s <= 0 {
            return Err(MotionError::InvalidSpeed);
        }
        match derive_goto(lateral_mm, forward_mm)? {
            GotoPlan::Straight { distance_mm } => self.drive_straight(distance_mm, speed_mm_s),
            GotoPlan::Curve {
                distance_mm,
                angle_deg,
            } => self.drive_curve(distance_mm, angle_deg, speed_mm_s),
        }
    }

    /// Distance left in the current motion
    ///
    /// `None` when idle, `Some(0)` during a turn.
    pub fn remaining_distance(&self) -> Option<u32> {
        self.with(|inner| inner.remaining_distance())
    }

    /// Snapshot of the finite motion in progress
    pub fn active_operation(&self) -> Option<ActiveOperation> {
        self.with(|inner| inner.state.operation().copied())
    }

    /// Check whether no finite motion is in progress
    pub fn is_done(&self) -> bool {
        self.with(|inner| inner.state.is_idle())
    }

    /// Block until the current finite motion has finished
    ///
    /// Sleeps on `delay` between polls so the expiry interrupt can run.
    pub fn wait_until_done<D: DelayNs>(&self, delay: &mut D) {
        while !self.is_done() {
            delay.delay_us(self.wait_poll_us);
        }
    }

    /// Take the oldest unread completion notification
    pub fn poll_completion(&self) -> Option<Completion> {
        self.with(|inner| inner.completions.pop_front())
    }

    /// Countdown expiry handler
    ///
    /// Call from the timer interrupt. Stops the wheels, commits the planned
    /// final pose and returns to idle. Returns `false` for a stale expiry
    /// that arrived with no motion running.
    pub fn on_timer_expired(&self) -> bool {
        self.with(|inner| inner.expire())
    }
}
