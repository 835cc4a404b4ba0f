//! Frame display states.

use serde::{Deserialize, Serialize};

use crate::host::FrameSurface;

/// Display state of one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameState {
    #[default]
    Neither,
    Previous,
    Current,
}

/// Ordered frame states, parallel to the on-screen order.
///
/// At most one frame is `Current`: promoting a frame demotes the old one to
/// `Previous`. Every change is mirrored onto the host surface.
#[derive(Debug, Clone)]
pub struct FrameStrip {
    states: Vec<FrameState>,
    current: Option<usize>,
}

impl FrameStrip {
    pub fn new(len: usize) -> Self {
        Self {
            states: vec![FrameState::Neither; len],
            current: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, index: usize) -> Option<FrameState> {
        self.states.get(index).copied()
    }

    /// Index of the frame currently shown.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn count(&self, state: FrameState) -> usize {
        self.states.iter().filter(|s| **s == state).count()
    }

    pub fn mark_previous<S: FrameSurface + ?Sized>(&mut self, index: usize, surface: &mut S) {
        let Some(slot) = self.states.get_mut(index) else {
            log::warn!("mark_previous: frame {index} out of range");
            return;
        };
        *slot = FrameState::Previous;
        if self.current == Some(index) {
            self.current = None;
        }
        surface.set_frame_state(index, FrameState::Previous);
    }

    pub fn mark_current<S: FrameSurface + ?Sized>(&mut self, index: usize, surface: &mut S) {
        if index >= self.states.len() {
            log::warn!("mark_current: frame {index} out of range");
            return;
        }
        if let Some(old) = self.current {
            if old != index {
                self.mark_previous(old, surface);
            }
        }
        self.states[index] = FrameState::Current;
        self.current = Some(index);
        surface.set_frame_state(index, FrameState::Current);
    }
}
