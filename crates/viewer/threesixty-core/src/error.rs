//! Error types for the viewer core

use serde::{Deserialize, Serialize};

/// Errors surfaced by viewer construction and frame loading
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ViewerError {
    /// A configuration value is out of range
    #[error("Invalid config: {field} {reason}")]
    InvalidConfig { field: String, reason: String },

    /// Configuration document could not be parsed
    #[error("Config parse error: {reason}")]
    ConfigParse { reason: String },

    /// The host could not issue a request for a frame
    #[error("Frame {index} could not be requested: {reason}")]
    FrameRequest { index: usize, reason: String },

    /// A frame resource kept failing after all retries
    #[error("Frame {index} failed to load from {address} after {attempts} attempts")]
    LoadFailure {
        index: usize,
        address: String,
        attempts: u32,
    },
}

impl ViewerError {
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } | Self::ConfigParse { .. } => "config",
            Self::FrameRequest { .. } | Self::LoadFailure { .. } => "loading",
        }
    }
}

impl From<serde_json::Error> for ViewerError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigParse {
            reason: err.to_string(),
        }
    }
}
