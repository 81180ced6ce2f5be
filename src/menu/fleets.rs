//! Auto-advancing fleet timers
//!
//! Each fleet item owns a [`FleetTimer`] that fills from 0% to 100% over the
//! configured duration. Timers hold no clock of their own: the host event
//! loop calls [`FleetTimers::advance`] with the elapsed time of each tick, and
//! the one timer that crosses 100% reports it exactly once.

use std::time::Duration;

use super::item::{ItemId, StepItem};

/// Default time a fleet stays on screen
pub const DEFAULT_FLEET_DURATION: Duration = Duration::from_millis(5000);

/// Lifecycle of a single fleet timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    /// Not counting (never started, or cancelled)
    Idle,
    Running,
    /// Frozen at its current fraction until resumed
    Paused,
    /// Reached 100%
    Finished,
}

/// Timed progress of one fleet item
#[derive(Debug, Clone, PartialEq)]
pub struct FleetTimer {
    pub item_id: ItemId,
    duration: Duration,
    elapsed: Duration,
    status: TimerStatus,
}

impl FleetTimer {
    /// A timer counting from zero. The duration is captured now; later changes
    /// to the menu's fleet duration do not rescale it.
    pub fn start(item_id: ItemId, duration: Duration) -> Self {
        Self {
            item_id,
            duration,
            elapsed: Duration::ZERO,
            status: TimerStatus::Running,
        }
    }

    /// A stopped timer pinned to full (`completed`) or empty progress.
    pub fn settled(item_id: ItemId, duration: Duration, completed: bool) -> Self {
        if completed {
            Self {
                item_id,
                duration,
                elapsed: duration,
                status: TimerStatus::Finished,
            }
        } else {
            Self {
                item_id,
                duration,
                elapsed: Duration::ZERO,
                status: TimerStatus::Idle,
            }
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// Elapsed fraction in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.status == TimerStatus::Finished {
            return 1.0;
        }
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0) as f32
    }

    /// Advance a running timer. Returns true only on the tick that reaches 100%.
    pub fn advance(&mut self, delta: Duration) -> bool {
        if self.status != TimerStatus::Running {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(delta).min(self.duration);
        if self.elapsed >= self.duration {
            self.status = TimerStatus::Finished;
            return true;
        }
        false
    }

    pub fn pause(&mut self) {
        if self.status == TimerStatus::Running {
            self.status = TimerStatus::Paused;
        }
    }

    /// Continue from the frozen fraction
    pub fn resume(&mut self) {
        if self.status == TimerStatus::Paused {
            self.status = TimerStatus::Running;
        }
    }

    /// Stop and discard progress
    pub fn cancel(&mut self) {
        self.elapsed = Duration::ZERO;
        self.status = TimerStatus::Idle;
    }
}

/// Timer bank of the fleets variant, index-aligned with the menu items
#[derive(Debug, Clone, PartialEq)]
pub struct FleetTimers {
    duration: Duration,
    timers: Vec<FleetTimer>,
}

impl Default for FleetTimers {
    fn default() -> Self {
        Self::new(DEFAULT_FLEET_DURATION)
    }
}

impl FleetTimers {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            timers: Vec::new(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Store a new duration for timers started from now on
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn timers(&self) -> &[FleetTimer] {
        &self.timers
    }

    pub fn get(&self, index: usize) -> Option<&FleetTimer> {
        self.timers.get(index)
    }

    /// Drop every timer and restart the one at `current_step`. Items before it
    /// read as full, items after it as empty.
    pub fn rebuild(&mut self, items: &[StepItem], current_step: usize) {
        self.timers = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                if index == current_step {
                    FleetTimer::start(item.id, self.duration)
                } else {
                    FleetTimer::settled(item.id, self.duration, index < current_step)
                }
            })
            .collect();
    }

    /// Feed elapsed time to the running timers. Returns true when one of them
    /// finished on this tick.
    pub fn advance(&mut self, delta: Duration) -> bool {
        let mut finished = false;
        for timer in &mut self.timers {
            if timer.advance(delta) {
                tracing::trace!(item_id = timer.item_id, "fleet finished");
                finished = true;
            }
        }
        finished
    }

    pub fn pause(&mut self) {
        self.timers.iter_mut().for_each(FleetTimer::pause);
    }

    pub fn resume(&mut self) {
        self.timers.iter_mut().for_each(FleetTimer::resume);
    }
}
