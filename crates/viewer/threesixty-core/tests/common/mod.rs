#![allow(dead_code)]

use threesixty_core::{
    FrameSource, FrameState, FrameSurface, ManualScheduler, ProgressObserver, Scheduler,
    TimerHandle, Viewer, ViewerConfig, ViewerError,
};

/// Host double that records everything the viewer asks of it.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub width: f64,
    pub sched: ManualScheduler,
    pub requests: Vec<(usize, String)>,
    pub states: Vec<(usize, FrameState)>,
    pub progress: Vec<u32>,
    pub finished: usize,
    /// Refuse every frame request, as a host that cannot create resources.
    pub refuse_requests: bool,
}

impl RecordingHost {
    pub fn new(width: f64) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }
}

impl FrameSurface for RecordingHost {
    fn set_frame_state(&mut self, index: usize, state: FrameState) {
        self.states.push((index, state));
    }

    fn viewport_width(&self) -> f64 {
        self.width
    }
}

impl FrameSource for RecordingHost {
    fn request_frame(&mut self, index: usize, address: &str) -> threesixty_core::Result<()> {
        self.requests.push((index, address.to_string()));
        if self.refuse_requests {
            return Err(ViewerError::FrameRequest {
                index,
                reason: "refused by host".into(),
            });
        }
        Ok(())
    }
}

impl Scheduler for RecordingHost {
    fn start(&mut self, period_ms: u32) -> Option<TimerHandle> {
        self.sched.start(period_ms)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.sched.cancel(handle)
    }
}

impl ProgressObserver for RecordingHost {
    fn report_progress(&mut self, percent: u32) {
        self.progress.push(percent);
    }

    fn loading_finished(&mut self) {
        self.finished += 1;
    }
}

pub fn mk_viewer(cfg: ViewerConfig) -> Viewer<RecordingHost> {
    Viewer::new(cfg, RecordingHost::new(400.0)).expect("valid config")
}

/// Build a viewer and answer every frame request until it is ready.
pub fn mk_ready_viewer(cfg: ViewerConfig) -> Viewer<RecordingHost> {
    let mut v = mk_viewer(cfg);
    v.load().unwrap();
    let total = v.state().total_frames();
    for i in 0..total {
        v.frame_loaded(i).unwrap();
    }
    assert!(v.state().is_ready());
    v
}

/// Tick until the loop settles; returns the number of ticks.
pub fn run_until_settled(v: &mut Viewer<RecordingHost>) -> usize {
    let mut ticks = 0;
    while v.state().is_animating() {
        v.tick();
        ticks += 1;
        assert!(ticks < 1000, "animation never settled");
    }
    ticks
}
