//! Viewer: owns the state, the components and the host, and exposes the
//! runtime surface (load callbacks, pointer handlers, `refresh`, `tick`).
//!
//! Every method runs to completion on the caller's thread; the host is expected
//! to serialize pointer events, load signals and timer ticks.

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::events::ViewerEvent;
use crate::frame::{FrameState, FrameStrip};
use crate::gesture::GestureTracker;
use crate::host::ViewerHost;
use crate::loader::{LoadPhase, LoadStep, SequenceLoader};
use crate::state::ViewerState;
use crate::ticker::{AnimationLoop, TickOutcome};

#[derive(Debug)]
pub struct Viewer<H: ViewerHost> {
    cfg: ViewerConfig,
    state: ViewerState,
    frames: FrameStrip,
    gesture: GestureTracker,
    animation: AnimationLoop,
    loader: SequenceLoader,
    host: H,
    events: Vec<ViewerEvent>,
}

impl<H: ViewerHost> Viewer<H> {
    /// Validate `cfg` and build an idle viewer. Nothing is requested until
    /// [`Viewer::load`] is called.
    pub fn new(cfg: ViewerConfig, host: H) -> crate::Result<Self> {
        cfg.validate()?;
        Ok(Self {
            state: ViewerState::new(&cfg),
            frames: FrameStrip::new(cfg.total_frames),
            gesture: GestureTracker::new(&cfg),
            animation: AnimationLoop::new(cfg.tick_period_ms()),
            loader: SequenceLoader::new(&cfg),
            host,
            events: Vec::new(),
            cfg,
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.cfg
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn frames(&self) -> &FrameStrip {
        &self.frames
    }

    pub fn frame_state(&self, index: usize) -> Option<FrameState> {
        self.frames.state(index)
    }

    /// Slot of the frame currently shown.
    pub fn current_index(&self) -> Option<usize> {
        self.frames.current()
    }

    pub fn load_phase(&self) -> LoadPhase {
        self.loader.phase()
    }

    pub fn gesture_samples(&self) -> u64 {
        self.gesture.samples()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Take the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<ViewerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start the sequential load chain.
    pub fn load(&mut self) -> crate::Result<()> {
        let started = self.loader.start(&self.state, &mut self.host);
        started.map_err(|err| self.load_failed(err))
    }

    /// The host finished loading frame `index`.
    pub fn frame_loaded(&mut self, index: usize) -> crate::Result<()> {
        let step = self
            .loader
            .on_loaded(index, &mut self.state, &mut self.host)
            .map_err(|err| self.load_failed(err))?;
        match step {
            LoadStep::Progress { loaded, percent } => self.events.push(ViewerEvent::Progress {
                loaded,
                total: self.state.total_frames(),
                percent,
            }),
            LoadStep::Complete { percent } => {
                self.events.push(ViewerEvent::Progress {
                    loaded: self.state.loaded_count(),
                    total: self.state.total_frames(),
                    percent,
                });
                self.become_ready();
            }
            LoadStep::Retry { .. } | LoadStep::Ignored => {}
        }
        Ok(())
    }

    /// The host failed to load frame `index`.
    pub fn frame_failed(&mut self, index: usize) -> crate::Result<()> {
        match self.loader.on_failed(index, &mut self.host) {
            Ok(LoadStep::Retry { index, attempt }) => {
                self.events.push(ViewerEvent::LoadRetry { index, attempt });
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(err) => Err(self.load_failed(err)),
        }
    }

    fn load_failed(&mut self, err: ViewerError) -> ViewerError {
        if let ViewerError::LoadFailure {
            index,
            address,
            attempts,
        } = &err
        {
            self.events.push(ViewerEvent::LoadFailed {
                index: *index,
                address: address.clone(),
                attempts: *attempts,
            });
        }
        err
    }

    fn become_ready(&mut self) {
        if !self.state.mark_ready() {
            return;
        }
        let first = if self.state.disable_spin() {
            0
        } else {
            self.state.normalized_current()
        };
        self.frames.mark_current(first, &mut self.host);
        self.host.loading_finished();
        log::info!(
            "all {} frames loaded, showing frame {first}",
            self.state.total_frames()
        );
        self.events.push(ViewerEvent::Ready);
        self.refresh();
    }

    pub fn pointer_down(&mut self, x: f64) {
        self.gesture.on_pointer_down(&mut self.state, x);
    }

    pub fn pointer_up(&mut self) {
        self.gesture.on_pointer_up(&mut self.state);
    }

    pub fn pointer_cancel(&mut self) {
        self.gesture.on_pointer_cancel(&mut self.state);
    }

    /// Pointer moved to `x` at `now` milliseconds.
    pub fn pointer_move(&mut self, x: f64, now: f64) {
        let width = self.host.viewport_width();
        if self
            .gesture
            .on_pointer_move(&mut self.state, x, now, width)
            .is_some()
        {
            self.refresh();
        }
    }

    /// (Re)start the animation loop if it is idle.
    pub fn refresh(&mut self) {
        if self.animation.schedule(&mut self.state, &mut self.host) {
            self.events.push(ViewerEvent::AnimationStarted);
        }
    }

    /// One timer period elapsed.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self
            .animation
            .tick(&mut self.state, &mut self.frames, &mut self.host);
        if let TickOutcome::Settled { frame } = outcome {
            self.events.push(ViewerEvent::AnimationSettled { frame });
        }
        outcome
    }

    /// Release the timer, if any. Used by hosts tearing the viewer down.
    pub fn stop(&mut self) {
        self.animation.cancel(&mut self.state, &mut self.host);
    }
}
