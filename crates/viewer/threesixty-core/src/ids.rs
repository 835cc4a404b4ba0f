//! Identifiers handed out by schedulers.

use serde::{Deserialize, Serialize};

/// Opaque handle for one recurring timer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(pub u32);

/// Monotonic allocator for TimerHandle.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_timer: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_timer(&mut self) -> TimerHandle {
        let id = TimerHandle(self.next_timer);
        self.next_timer = self.next_timer.wrapping_add(1);
        id
    }
}
