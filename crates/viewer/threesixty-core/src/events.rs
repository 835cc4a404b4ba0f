//! Semantic events emitted by the viewer.
//!
//! Adapters drain these after each call and forward them to the host
//! (e.g. as JS callbacks). Frame visibility changes are not events; they go
//! straight to the surface.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ViewerEvent {
    Progress {
        loaded: usize,
        total: usize,
        percent: u32,
    },
    Ready,
    LoadRetry {
        index: usize,
        attempt: u32,
    },
    LoadFailed {
        index: usize,
        address: String,
        attempts: u32,
    },
    AnimationStarted,
    AnimationSettled {
        frame: usize,
    },
}
