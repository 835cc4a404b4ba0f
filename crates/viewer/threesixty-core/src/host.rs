//! Host capability traits.
//!
//! The core never touches a rendering surface, a network or a clock directly.
//! Adapters (web/native) implement these traits and hand themselves to
//! [`Viewer::new`](crate::Viewer::new).

use crate::frame::FrameState;
use crate::ids::TimerHandle;

/// Surface that shows one frame at a time.
pub trait FrameSurface {
    /// Apply a display state to the frame at `index` (`0..total_frames`).
    fn set_frame_state(&mut self, index: usize, state: FrameState);

    /// Width of the interactive area, in the same unit as pointer coordinates.
    fn viewport_width(&self) -> f64;
}

/// Fetches frame resources. Completion is reported back through
/// [`Viewer::frame_loaded`](crate::Viewer::frame_loaded) or
/// [`Viewer::frame_failed`](crate::Viewer::frame_failed).
pub trait FrameSource {
    /// Issue the request. An `Err` (usually [`ViewerError::FrameRequest`]) means
    /// no completion signal will follow and counts as a failed attempt.
    ///
    /// [`ViewerError::FrameRequest`]: crate::ViewerError::FrameRequest
    fn request_frame(&mut self, index: usize, address: &str) -> crate::Result<()>;
}

/// Recurring timer service. Each period the host calls
/// [`Viewer::tick`](crate::Viewer::tick).
pub trait Scheduler {
    /// Start a recurring callback. `None` when the host could not schedule one.
    fn start(&mut self, period_ms: u32) -> Option<TimerHandle>;
    fn cancel(&mut self, handle: TimerHandle);
}

/// Optional loading indicator.
pub trait ProgressObserver {
    fn report_progress(&mut self, _percent: u32) {}
    /// All frames are loaded; the indicator can fade out.
    fn loading_finished(&mut self) {}
}

/// Everything a viewer needs from its host.
pub trait ViewerHost: FrameSurface + FrameSource + Scheduler + ProgressObserver {}

impl<T> ViewerHost for T where T: FrameSurface + FrameSource + Scheduler + ProgressObserver {}
