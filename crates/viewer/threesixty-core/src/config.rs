//! Viewer configuration.
//!
//! Field names follow the option names hosts already pass in JavaScript
//! (`totalFrames`, `speedMultiplier`, ...), so a JS options object or a JSON
//! document deserializes straight into [`ViewerConfig`].

use serde::{Deserialize, Serialize};

use crate::error::ViewerError;

/// Rule used to fold an out-of-range position back into the strip when wrap is enabled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapIndexing {
    /// `ceil(pos % n)`, negatives shifted by `n - 1`. Matches existing deployments.
    #[default]
    Compat,
    /// Plain euclidean modulo: negatives shifted by `n`.
    Euclidean,
}

/// Options for one viewer instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    /// Number of frames in the rotation.
    pub total_frames: usize,
    /// Animation tick frequency in Hz.
    pub framerate: f64,
    /// Gesture sensitivity.
    pub speed_multiplier: f64,
    pub disable_wrap: bool,
    /// Start and stay at frame 1 until dragged.
    pub disable_spin: bool,
    /// Frame numbers (and file names) start at 0 instead of 1.
    pub zero_based: bool,
    pub zero_padding: bool,

    // Host presentation.
    pub responsive: bool,
    pub width: u32,
    pub height: u32,
    /// Selector of the progress indicator, if any.
    pub progress: Option<String>,
    /// Selector of the image list inside the host element.
    pub img_list: String,

    // Resource address template.
    pub domain: String,
    pub image_path: String,
    pub file_prefix: String,
    pub ext: String,

    /// Minimum spacing between two gesture samples, in milliseconds.
    pub monitor_interval: f64,
    /// How many times a failed frame is re-requested before loading gives up.
    pub load_retries: u32,
    pub wrap_indexing: WrapIndexing,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            total_frames: 180,
            framerate: 60.0,
            speed_multiplier: 7.0,
            disable_wrap: false,
            disable_spin: false,
            zero_based: false,
            zero_padding: false,
            responsive: false,
            width: 300,
            height: 300,
            progress: None,
            img_list: ".threesixty_images".to_string(),
            domain: String::new(),
            image_path: String::new(),
            file_prefix: String::new(),
            ext: ".png".to_string(),
            monitor_interval: 10.0,
            load_retries: 2,
            wrap_indexing: WrapIndexing::Compat,
        }
    }
}

impl ViewerConfig {
    /// Parse a JSON options document; missing fields take their defaults.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would poison the frame math downstream.
    pub fn validate(&self) -> crate::Result<()> {
        if self.total_frames == 0 {
            return Err(ViewerError::invalid_config(
                "totalFrames",
                "must be greater than zero",
            ));
        }
        if !self.framerate.is_finite() || self.framerate <= 0.0 {
            return Err(ViewerError::invalid_config(
                "framerate",
                format!("must be a positive number, got {}", self.framerate),
            ));
        }
        if !self.speed_multiplier.is_finite() {
            return Err(ViewerError::invalid_config(
                "speedMultiplier",
                "must be finite",
            ));
        }
        if !self.monitor_interval.is_finite() || self.monitor_interval < 0.0 {
            return Err(ViewerError::invalid_config(
                "monitorInterval",
                format!("must be a non-negative number, got {}", self.monitor_interval),
            ));
        }
        Ok(())
    }

    /// Timer period derived from `framerate`.
    pub fn tick_period_ms(&self) -> u32 {
        (1000.0 / self.framerate).round().max(1.0) as u32
    }

    /// Lowest valid position: 0 when zero-based, 1 otherwise.
    #[inline]
    pub fn base_index(&self) -> usize {
        if self.zero_based {
            0
        } else {
            1
        }
    }
}
