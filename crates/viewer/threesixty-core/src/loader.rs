//! Sequential frame loading.
//!
//! Frames are requested one at a time: frame `i + 1` is only requested after
//! frame `i` reported completion, which bounds in-flight requests to one.

use serde::{Deserialize, Serialize};

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::host::{FrameSource, ProgressObserver};
use crate::state::ViewerState;

/// Address template `domain + image_path + file_prefix + number + ext`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameAddress {
    pub domain: String,
    pub image_path: String,
    pub file_prefix: String,
    pub ext: String,
    /// Number added to the slot index (0 or 1).
    pub base: usize,
    /// Minimum digit count, 0 for no padding.
    pub pad_width: usize,
}

/// Digits needed to print `total_frames`, with log10 rounded to three places
/// first so exact powers of ten do not lose a digit to float error.
pub fn digit_count(total_frames: usize) -> usize {
    if total_frames == 0 {
        return 1;
    }
    let log = (total_frames as f64).log10();
    let rounded = (log * 1e3).round() / 1e3;
    rounded.floor() as usize + 1
}

impl FrameAddress {
    pub fn from_config(cfg: &ViewerConfig) -> Self {
        Self {
            domain: cfg.domain.clone(),
            image_path: cfg.image_path.clone(),
            file_prefix: cfg.file_prefix.clone(),
            ext: cfg.ext.clone(),
            base: cfg.base_index(),
            pad_width: if cfg.zero_padding {
                digit_count(cfg.total_frames)
            } else {
                0
            },
        }
    }

    /// Address of the frame in slot `index`.
    pub fn for_frame(&self, index: usize) -> String {
        let number = index + self.base;
        format!(
            "{}{}{}{:0width$}{}",
            self.domain,
            self.image_path,
            self.file_prefix,
            number,
            self.ext,
            width = self.pad_width
        )
    }
}

/// Where the load chain stands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadPhase {
    NotStarted,
    Loading { index: usize },
    Complete,
    Failed { index: usize },
}

/// Result of feeding one load signal to the loader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LoadStep {
    /// Signal did not match the outstanding request.
    Ignored,
    /// One more frame loaded; the next one has been requested.
    Progress { loaded: usize, percent: u32 },
    /// The last frame loaded.
    Complete { percent: u32 },
    /// The outstanding frame failed and was requested again.
    Retry { index: usize, attempt: u32 },
}

#[derive(Debug, Clone)]
pub struct SequenceLoader {
    address: FrameAddress,
    max_retries: u32,
    failures: u32,
    phase: LoadPhase,
}

impl SequenceLoader {
    pub fn new(cfg: &ViewerConfig) -> Self {
        Self {
            address: FrameAddress::from_config(cfg),
            max_retries: cfg.load_retries,
            failures: 0,
            phase: LoadPhase::NotStarted,
        }
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn address(&self) -> &FrameAddress {
        &self.address
    }

    /// Request the first frame. Only the first call does anything.
    pub fn start<H: FrameSource + ?Sized>(&mut self, state: &ViewerState, host: &mut H) -> crate::Result<()> {
        if self.phase != LoadPhase::NotStarted {
            return Ok(());
        }
        self.request(state.loaded_count(), host)
    }

    /// Ask the host for frame `index`. A refused request is re-issued on the
    /// same retry budget as a failed load.
    fn request<H: FrameSource + ?Sized>(&mut self, index: usize, host: &mut H) -> crate::Result<()> {
        loop {
            self.phase = LoadPhase::Loading { index };
            let address = self.address.for_frame(index);
            log::debug!("requesting frame {index} from {address}");
            match host.request_frame(index, &address) {
                Ok(()) => return Ok(()),
                Err(err) => {
                    log::warn!("frame {index} request refused: {err}");
                    self.record_failure(index)?;
                }
            }
        }
    }

    /// Spend one attempt on frame `index`. Once the budget is gone the chain
    /// stops in `Failed`.
    fn record_failure(&mut self, index: usize) -> crate::Result<u32> {
        self.failures += 1;
        let address = self.address.for_frame(index);
        if self.failures > self.max_retries {
            self.phase = LoadPhase::Failed { index };
            log::error!("frame {index} ({address}) failed {} times, giving up", self.failures);
            return Err(ViewerError::LoadFailure {
                index,
                address,
                attempts: self.failures,
            });
        }
        log::warn!("frame {index} ({address}) failed, retry {}/{}", self.failures, self.max_retries);
        Ok(self.failures)
    }

    /// The host finished loading frame `index`. Errors only when the request
    /// for the next frame is refused past the retry budget.
    pub fn on_loaded<H>(&mut self, index: usize, state: &mut ViewerState, host: &mut H) -> crate::Result<LoadStep>
    where
        H: FrameSource + ProgressObserver + ?Sized,
    {
        if self.phase != (LoadPhase::Loading { index }) {
            log::warn!("ignoring load signal for frame {index} ({:?})", self.phase);
            return Ok(LoadStep::Ignored);
        }
        self.failures = 0;
        let loaded = state.record_loaded();
        let percent = state.progress_percent();
        host.report_progress(percent);

        if state.is_fully_loaded() {
            self.phase = LoadPhase::Complete;
            return Ok(LoadStep::Complete { percent });
        }
        self.request(loaded, host)?;
        Ok(LoadStep::Progress { loaded, percent })
    }

    /// The host failed to load frame `index`. Re-requests it until retries run
    /// out, then the chain stops for good.
    pub fn on_failed<H>(&mut self, index: usize, host: &mut H) -> crate::Result<LoadStep>
    where
        H: FrameSource + ?Sized,
    {
        if self.phase != (LoadPhase::Loading { index }) {
            log::warn!("ignoring failure signal for frame {index} ({:?})", self.phase);
            return Ok(LoadStep::Ignored);
        }
        self.record_failure(index)?;
        self.request(index, host)?;
        Ok(LoadStep::Retry {
            index,
            attempt: self.failures,
        })
    }
}
