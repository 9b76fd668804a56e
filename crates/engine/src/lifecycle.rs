//! Mount and teardown of the engine on a host surface.
//!
//! A [`Mount`] owns the engine, the input inbox its handles write to, and
//! the slot the asset loader completes. Teardown runs exactly once: either
//! explicitly, through a [`CancelToken`], or when the mount is dropped.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gpu::RenderSurface;
use runtime::event_bus::Event;
use runtime::frame::FrameClock;
use runtime::inbox::{InputInbox, Viewport};
use scene::asset::{AssetError, LoadedAsset};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::controls::{ControlHandle, InputHandle, SharedInbox};
use crate::events::EngineEvent;
use crate::render_loop::{Engine, FrameReport};

type AssetResult = Result<LoadedAsset, AssetError>;

#[derive(Debug, Default)]
struct SlotState {
    pending: Option<AssetResult>,
    closed: bool,
}

/// Where the asynchronous loader drops its result. The mount picks it up at
/// the start of the next frame.
#[derive(Debug, Clone, Default)]
pub struct AssetSlot(Rc<RefCell<SlotState>>);

impl AssetSlot {
    /// Returns `false` if the mount is already gone; the result is dropped.
    pub fn complete(&self, result: AssetResult) -> bool {
        let mut slot = self.0.borrow_mut();
        if slot.closed {
            debug!("asset arrived after teardown; dropped");
            return false;
        }
        slot.pending = Some(result);
        true
    }

    fn take(&self) -> Option<AssetResult> {
        self.0.borrow_mut().pending.take()
    }

    fn close(&self) {
        let mut slot = self.0.borrow_mut();
        slot.closed = true;
        slot.pending = None;
    }
}

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Source of display-refresh timestamps, in seconds.
pub trait FrameScheduler {
    /// `None` ends the run.
    fn next_frame(&mut self) -> Option<f64>;
}

/// Fixed-rate timestamps for headless runs.
#[derive(Debug, Clone)]
pub struct FixedRate {
    step_s: f64,
    next_s: f64,
    remaining: Option<u64>,
}

impl FixedRate {
    pub fn new(hz: f64) -> Self {
        Self {
            step_s: if hz > 0.0 { 1.0 / hz } else { 0.0 },
            next_s: 0.0,
            remaining: None,
        }
    }

    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }
}

impl FrameScheduler for FixedRate {
    fn next_frame(&mut self) -> Option<f64> {
        if let Some(left) = self.remaining.as_mut() {
            if *left == 0 {
                return None;
            }
            *left -= 1;
        }
        let now = self.next_s;
        self.next_s += self.step_s;
        Some(now)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub submitted: u64,
    pub failed: u64,
}

#[derive(Debug)]
pub struct Mount {
    engine: Engine,
    inbox: SharedInbox,
    clock: FrameClock,
    asset: AssetSlot,
    cancel: CancelToken,
    summary: RunSummary,
    torn_down: bool,
}

impl Mount {
    pub fn new(config: EngineConfig, viewport: Viewport, surface: Box<dyn RenderSurface>) -> Self {
        let mut engine = Engine::new(config, viewport, surface);
        engine.events_mut().emit(
            0,
            EngineEvent::Mounted {
                width: viewport.width,
                height: viewport.height,
            },
        );
        info!(width = viewport.width, height = viewport.height, "engine mounted");
        Self {
            engine,
            inbox: Rc::new(RefCell::new(InputInbox::new())),
            clock: FrameClock::new(),
            asset: AssetSlot::default(),
            cancel: CancelToken::default(),
            summary: RunSummary::default(),
            torn_down: false,
        }
    }

    pub fn controls(&self) -> ControlHandle {
        ControlHandle::new(self.inbox.clone())
    }

    pub fn input(&self) -> InputHandle {
        InputHandle::new(self.inbox.clone())
    }

    pub fn asset_slot(&self) -> AssetSlot {
        self.asset.clone()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn is_running(&self) -> bool {
        !self.torn_down
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn drain_events(&mut self) -> Vec<Event<EngineEvent>> {
        self.engine.events_mut().drain()
    }

    /// Runs one frame at display time `now_s`. Returns `None` when the frame
    /// failed or the mount is torn down.
    pub fn tick(&mut self, now_s: f64) -> Option<FrameReport> {
        if self.torn_down {
            return None;
        }
        if self.cancel.is_cancelled() {
            self.teardown();
            return None;
        }

        let frame = self.clock.tick(now_s);
        self.summary.frames += 1;
        match self.asset.take() {
            Some(Ok(asset)) => self.engine.on_asset_ready(asset, frame.index),
            Some(Err(err)) => self.engine.on_asset_failed(err, frame.index),
            None => {}
        }

        let input = self.inbox.borrow_mut().drain();
        match self.engine.tick(frame, input) {
            Ok(report) => {
                self.summary.submitted += 1;
                Some(report)
            }
            Err(err) => {
                self.summary.failed += 1;
                warn!(frame = frame.index, error = %err, "frame skipped");
                self.engine.events_mut().emit_in(
                    frame,
                    EngineEvent::FrameFailed {
                        reason: err.to_string(),
                    },
                );
                None
            }
        }
    }

    /// Ticks until the scheduler runs dry or the mount is cancelled.
    pub fn run(&mut self, scheduler: &mut impl FrameScheduler) -> RunSummary {
        while !self.torn_down {
            if self.cancel.is_cancelled() {
                self.teardown();
                break;
            }
            let Some(now_s) = scheduler.next_frame() else {
                break;
            };
            self.tick(now_s);
        }
        self.summary
    }

    /// Stops the loop, detaches handles, and releases the surface. Safe to
    /// call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.cancel.cancel();
        self.inbox.borrow_mut().close();
        self.asset.close();
        self.engine.dispose();
        let frames = self.summary.frames;
        self.engine
            .events_mut()
            .emit(frames, EngineEvent::TornDown { frames });
        info!(frames, failed = self.summary.failed, "engine torn down");
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        self.teardown();
    }
}
