//! Threesixty Core (host-agnostic)
//!
//! Frame-sequence engine behind the 360° image viewer: frame index
//! normalization, pointer-drag tracking, the eased render loop and the
//! sequential loader. Rendering, fetching and timers are host capabilities
//! (see [`host`]); adapters implement them and drive a [`Viewer`].

pub mod config;
pub mod error;
pub mod events;
pub mod frame;
pub mod gesture;
pub mod host;
pub mod ids;
pub mod indexer;
pub mod loader;
pub mod scheduler;
pub mod state;
pub mod ticker;
pub mod viewer;

// Re-exports for consumers (adapters)
pub use config::{ViewerConfig, WrapIndexing};
pub use error::ViewerError;
pub use events::ViewerEvent;
pub use frame::{FrameState, FrameStrip};
pub use gesture::GestureTracker;
pub use host::{FrameSource, FrameSurface, ProgressObserver, Scheduler, ViewerHost};
pub use ids::TimerHandle;
pub use indexer::{clamp_bounds, normalize, Normalized};
pub use loader::{FrameAddress, LoadPhase, LoadStep, SequenceLoader};
pub use scheduler::ManualScheduler;
pub use state::ViewerState;
pub use ticker::{ease_step, AnimationLoop, TickOutcome};
pub use viewer::Viewer;

/// Viewer result type
pub type Result<T> = core::result::Result<T, ViewerError>;
