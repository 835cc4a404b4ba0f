//! Eased render loop.
//!
//! Idle -> Running on `schedule`, Running -> Idle once `current_frame` reaches
//! `end_frame`. Each tick moves a tenth of the remaining gap, rounded away from
//! zero (`floor` going down, `ceil` going up), so the last steps are exactly one
//! frame and the loop cannot stall short of the target.

use serde::{Deserialize, Serialize};

use crate::frame::FrameStrip;
use crate::host::{FrameSurface, Scheduler};
use crate::state::ViewerState;

/// Fraction of the remaining gap covered per tick.
pub const EASE_FACTOR: f64 = 0.1;

/// What one tick did.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TickOutcome {
    /// No timer was running; stale callback.
    Idle,
    /// Moved one ease step.
    Stepped { from: usize, to: usize },
    /// Target reached; the timer was released.
    Settled { frame: usize },
}

/// Signed ease step from `current` toward `end`.
#[inline]
pub fn ease_step(current: f64, end: f64) -> f64 {
    let gap = (end - current) * EASE_FACTOR;
    if end < current {
        gap.floor()
    } else {
        gap.ceil()
    }
}

#[derive(Debug, Clone)]
pub struct AnimationLoop {
    period_ms: u32,
}

impl AnimationLoop {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms: period_ms.max(1),
        }
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Start the recurring tick unless one is already running.
    /// Returns true when a new timer was started.
    pub fn schedule<S: Scheduler + ?Sized>(&self, state: &mut ViewerState, scheduler: &mut S) -> bool {
        if state.is_animating() {
            return false;
        }
        match scheduler.start(self.period_ms) {
            Some(handle) => {
                log::debug!("animation timer {:?} started ({} ms)", handle, self.period_ms);
                state.set_timer(Some(handle));
                true
            }
            None => {
                log::warn!("host refused to schedule the animation timer");
                false
            }
        }
    }

    /// Release the timer if one is running.
    pub fn cancel<S: Scheduler + ?Sized>(&self, state: &mut ViewerState, scheduler: &mut S) {
        if let Some(handle) = state.timer() {
            scheduler.cancel(handle);
            state.set_timer(None);
            log::debug!("animation timer {:?} released", handle);
        }
    }

    pub fn tick<H>(&self, state: &mut ViewerState, strip: &mut FrameStrip, host: &mut H) -> TickOutcome
    where
        H: FrameSurface + Scheduler + ?Sized,
    {
        if !state.is_animating() {
            return TickOutcome::Idle;
        }
        if state.current_frame == state.end_frame {
            self.cancel(state, host);
            let frame = strip.current().unwrap_or_else(|| state.normalized_current());
            return TickOutcome::Settled { frame };
        }

        let step = ease_step(state.current_frame, state.end_frame);
        let from = state.normalized_current();
        strip.mark_previous(from, host);
        state.current_frame += step;
        let to = state.normalized_current();
        strip.mark_current(to, host);
        TickOutcome::Stepped { from, to }
    }
}
