//! Deterministic scheduler for hosts that drive ticks from their own loop.
//!
//! The host advances the scheduler by the elapsed time and calls
//! `Viewer::tick` once per due tick. Tests use the same type to step the
//! animation without real time.

use crate::host::Scheduler;
use crate::ids::{IdAllocator, TimerHandle};

#[derive(Debug, Clone, Copy)]
struct ActiveTimer {
    handle: TimerHandle,
    period_ms: u32,
    elapsed_ms: f64,
}

#[derive(Debug, Default)]
pub struct ManualScheduler {
    ids: IdAllocator,
    active: Vec<ActiveTimer>,
    started: usize,
    cancelled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timers currently running.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.active.iter().any(|t| t.handle == handle)
    }

    /// Period of a running timer.
    pub fn period_of(&self, handle: TimerHandle) -> Option<u32> {
        self.active
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| t.period_ms)
    }

    /// Total timers ever started.
    pub fn started(&self) -> usize {
        self.started
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    /// Advance every running timer by `dt_ms` and return how many ticks came due
    /// in total. Leftover time carries into the next call.
    pub fn advance(&mut self, dt_ms: f64) -> usize {
        let mut due = 0;
        for timer in &mut self.active {
            timer.elapsed_ms += dt_ms;
            let period = f64::from(timer.period_ms);
            while timer.elapsed_ms >= period {
                timer.elapsed_ms -= period;
                due += 1;
            }
        }
        due
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, period_ms: u32) -> Option<TimerHandle> {
        let handle = self.ids.alloc_timer();
        self.active.push(ActiveTimer {
            handle,
            period_ms: period_ms.max(1),
            elapsed_ms: 0.0,
        });
        self.started += 1;
        Some(handle)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        let before = self.active.len();
        self.active.retain(|t| t.handle != handle);
        if self.active.len() != before {
            self.cancelled += 1;
        }
    }
}
