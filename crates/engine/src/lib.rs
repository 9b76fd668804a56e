//! Scroll- and control-driven interaction layer over a loaded 3D model.
//!
//! [`Mount`] is the entry point: it owns an [`Engine`] (the per-frame
//! orchestrator) plus the handles host callbacks write to.

pub mod animation;
pub mod clipping;
pub mod config;
pub mod controls;
pub mod error;
pub mod events;
pub mod explode;
pub mod hotspots;
pub mod lifecycle;
pub mod motion;
pub mod render_loop;
pub mod scroll;
pub mod state;
pub mod tween;

pub use config::{ConfigError, EngineConfig, HotspotConfig};
pub use controls::{ControlCommand, ControlHandle, InputHandle};
pub use error::FrameError;
pub use events::EngineEvent;
pub use hotspots::{HotspotObserver, HotspotScreenPosition};
pub use lifecycle::{AssetSlot, CancelToken, FixedRate, FrameScheduler, Mount, RunSummary};
pub use render_loop::{Engine, FrameReport};
pub use state::{LoadState, SceneState};
