//! Pointer-drag tracking.
//!
//! Moves are sampled at most once per `monitor_interval`. Each sample measures
//! the distance travelled since the previous sample (not since pointer-down)
//! and adds the corresponding frame delta on top of the current position, so
//! the target accumulates over the whole drag.

use crate::config::ViewerConfig;
use crate::indexer::clamp_position;
use crate::state::ViewerState;

#[derive(Debug, Clone)]
pub struct GestureTracker {
    pointer_start_x: f64,
    monitor_start: f64,
    monitor_interval: f64,
    speed_multiplier: f64,
    samples: u64,
}

impl GestureTracker {
    pub fn new(cfg: &ViewerConfig) -> Self {
        Self {
            pointer_start_x: 0.0,
            monitor_start: 0.0,
            monitor_interval: cfg.monitor_interval,
            speed_multiplier: cfg.speed_multiplier,
            samples: 0,
        }
    }

    /// Number of end-frame recomputations so far.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn pointer_start_x(&self) -> f64 {
        self.pointer_start_x
    }

    /// Start a drag at `x`. Presses before the viewer is ready are dropped, so
    /// a press held through readiness never drags from a stale origin.
    pub fn on_pointer_down(&mut self, state: &mut ViewerState, x: f64) {
        if !state.is_ready() {
            return;
        }
        self.pointer_start_x = x;
        state.dragging = true;
    }

    pub fn on_pointer_up(&mut self, state: &mut ViewerState) {
        state.dragging = false;
    }

    pub fn on_pointer_cancel(&mut self, state: &mut ViewerState) {
        self.on_pointer_up(state);
    }

    /// Feed one pointer move at time `now` (ms). Returns the new end frame when
    /// this move produced a sample; the caller then schedules the animation.
    pub fn on_pointer_move(
        &mut self,
        state: &mut ViewerState,
        x: f64,
        now: f64,
        viewport_width: f64,
    ) -> Option<f64> {
        if !(state.is_ready() && state.dragging) {
            return None;
        }
        if now - self.monitor_start < self.monitor_interval {
            return None;
        }
        if !viewport_width.is_finite() || viewport_width <= 0.0 {
            log::debug!("gesture sample skipped: viewport width {viewport_width}");
            return None;
        }

        let distance = x - self.pointer_start_x;
        let span = (state.total_frames() - 1) as f64;
        let delta = (span * self.speed_multiplier * (distance / viewport_width)).ceil();
        let mut end = state.current_frame + delta;
        if state.disable_wrap() {
            end = clamp_position(end, state.total_frames(), state.zero_based());
        }
        state.end_frame = end;

        self.monitor_start = now;
        self.pointer_start_x = x;
        self.samples += 1;
        log::debug!("gesture sample: distance={distance} end_frame={end}");
        Some(end)
    }
}
