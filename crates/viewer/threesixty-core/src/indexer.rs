//! Frame index normalization (wrap vs. clamp).
//!
//! Positions are plain `f64` frame numbers that may run past either end of the
//! strip while a drag accumulates. `normalize` folds such a position into a
//! slot index in `0..total_frames`:
//! - wrap: `ceil(pos % n)`, negatives shifted back into range;
//! - clamp: `pos` and `end` are pinned to `[base, n - 1 + base]` and the pinned
//!   values replace the caller's, so the narrowing persists in state.

use crate::config::WrapIndexing;
use crate::state::ViewerState;

/// Result of one normalization.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Normalized {
    pub display_index: usize,
    pub current: f64,
    pub end: f64,
}

/// Inclusive clamp-mode bounds.
#[inline]
pub fn clamp_bounds(total_frames: usize, zero_based: bool) -> (f64, f64) {
    let n = total_frames as f64;
    if zero_based {
        (0.0, n - 1.0)
    } else {
        (1.0, n)
    }
}

/// Pin `value` into the clamp-mode range.
#[inline]
pub fn clamp_position(value: f64, total_frames: usize, zero_based: bool) -> f64 {
    let (lo, hi) = clamp_bounds(total_frames, zero_based);
    value.min(hi).max(lo)
}

/// Fold `pos` into `0..total_frames` with the given wrap rule.
pub fn wrap_index(pos: f64, total_frames: usize, rule: WrapIndexing) -> usize {
    let n = total_frames as f64;
    let mut c = (pos % n).ceil();
    if c < 0.0 {
        c += match rule {
            WrapIndexing::Compat => n - 1.0,
            WrapIndexing::Euclidean => n,
        };
    }
    to_slot(c, total_frames)
}

#[inline]
fn to_slot(value: f64, total_frames: usize) -> usize {
    // NaN and negatives land on 0; fractional tails never address past the strip.
    (value.max(0.0) as usize).min(total_frames.saturating_sub(1))
}

/// Normalize a position pair. `total_frames` must be non-zero.
pub fn normalize(
    current: f64,
    end: f64,
    total_frames: usize,
    zero_based: bool,
    disable_wrap: bool,
    rule: WrapIndexing,
) -> Normalized {
    debug_assert!(total_frames > 0, "total_frames must be non-zero");
    if !disable_wrap {
        return Normalized {
            display_index: wrap_index(current, total_frames, rule),
            current,
            end,
        };
    }

    let (lo, _) = clamp_bounds(total_frames, zero_based);
    let c = clamp_position(current, total_frames, zero_based);
    let e = clamp_position(end, total_frames, zero_based);
    Normalized {
        display_index: to_slot((c - lo).ceil(), total_frames),
        current: c,
        end: e,
    }
}

impl ViewerState {
    /// Normalize the current position, writing clamp-mode narrowing back into
    /// state. Returns the slot index to display.
    pub fn normalized_current(&mut self) -> usize {
        let n = normalize(
            self.current_frame,
            self.end_frame,
            self.total_frames(),
            self.zero_based(),
            self.disable_wrap(),
            self.wrap_indexing(),
        );
        self.current_frame = n.current;
        self.end_frame = n.end;
        n.display_index
    }
}
