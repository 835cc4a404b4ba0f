//! Per-viewer mutable state.

use serde::{Deserialize, Serialize};

use crate::config::{ViewerConfig, WrapIndexing};
use crate::ids::TimerHandle;

/// Shared record read and written by the gesture tracker, the animation loop
/// and the loader. One instance per viewer, owned by the viewer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewerState {
    total_frames: usize,
    pub current_frame: f64,
    pub end_frame: f64,
    loaded_count: usize,
    pub dragging: bool,
    ready: bool,

    zero_based: bool,
    disable_wrap: bool,
    disable_spin: bool,
    wrap_indexing: WrapIndexing,

    timer: Option<TimerHandle>,
}

impl ViewerState {
    /// Build the initial state. `cfg` must already be validated.
    pub fn new(cfg: &ViewerConfig) -> Self {
        // Spin disabled: sit on frame 1 until dragged.
        let start = if cfg.disable_spin { 1.0 } else { 0.0 };
        Self {
            total_frames: cfg.total_frames,
            current_frame: start,
            end_frame: start,
            loaded_count: 0,
            dragging: false,
            ready: false,
            zero_based: cfg.zero_based,
            disable_wrap: cfg.disable_wrap,
            disable_spin: cfg.disable_spin,
            wrap_indexing: cfg.wrap_indexing,
            timer: None,
        }
    }

    #[inline]
    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    #[inline]
    pub fn loaded_count(&self) -> usize {
        self.loaded_count
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    #[inline]
    pub fn zero_based(&self) -> bool {
        self.zero_based
    }

    #[inline]
    pub fn disable_wrap(&self) -> bool {
        self.disable_wrap
    }

    #[inline]
    pub fn disable_spin(&self) -> bool {
        self.disable_spin
    }

    #[inline]
    pub fn wrap_indexing(&self) -> WrapIndexing {
        self.wrap_indexing
    }

    #[inline]
    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.timer.is_some()
    }

    pub fn is_fully_loaded(&self) -> bool {
        self.loaded_count >= self.total_frames
    }

    /// Count one more loaded frame; saturates at `total_frames`.
    pub(crate) fn record_loaded(&mut self) -> usize {
        if self.loaded_count < self.total_frames {
            self.loaded_count += 1;
        }
        self.loaded_count
    }

    /// Flip `ready` on. Returns false when it was already set.
    pub(crate) fn mark_ready(&mut self) -> bool {
        if self.ready {
            return false;
        }
        self.ready = true;
        true
    }

    pub(crate) fn set_timer(&mut self, timer: Option<TimerHandle>) {
        self.timer = timer;
    }

    /// Integer percentage of frames loaded (floored).
    pub fn progress_percent(&self) -> u32 {
        (self.loaded_count * 100 / self.total_frames.max(1)) as u32
    }
}
