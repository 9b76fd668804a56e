use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::renderer::RenderFrame;

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// The surface (or its context) is gone; nothing more can be drawn.
    Lost,
    /// The frame was refused, e.g. while the surface is being reconfigured.
    Rejected(String),
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceError::Lost => write!(f, "render surface lost"),
            SurfaceError::Rejected(reason) => write!(f, "frame rejected: {reason}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// The mounted visual surface the engine draws into.
pub trait RenderSurface {
    /// Size in device pixels.
    fn resize(&mut self, width_px: u32, height_px: u32) -> Result<(), SurfaceError>;

    fn submit(&mut self, frame: RenderFrame) -> Result<(), SurfaceError>;

    /// Releases GPU resources and detaches from the host. Called exactly once.
    fn dispose(&mut self);
}

/// What a `HeadlessSurface` has seen so far.
#[derive(Debug, Default, Clone)]
pub struct SurfaceLog {
    pub size_px: (u32, u32),
    pub resizes: usize,
    pub submitted: usize,
    pub rejected: usize,
    pub disposed: usize,
    pub last_frame: Option<RenderFrame>,
}

/// A surface that keeps frames in memory instead of presenting them.
///
/// The log is shared, so a test (or the headless viewer) can keep a
/// `SurfaceMonitor` after the surface itself has been moved into the engine.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    log: Rc<RefCell<SurfaceLog>>,
    fail_next: usize,
}

#[derive(Debug, Clone)]
pub struct SurfaceMonitor(Rc<RefCell<SurfaceLog>>);

impl SurfaceMonitor {
    pub fn snapshot(&self) -> SurfaceLog {
        self.0.borrow().clone()
    }

    pub fn submitted(&self) -> usize {
        self.0.borrow().submitted
    }

    pub fn disposed(&self) -> usize {
        self.0.borrow().disposed
    }

    pub fn last_frame(&self) -> Option<RenderFrame> {
        self.0.borrow().last_frame.clone()
    }
}

impl HeadlessSurface {
    pub fn new(width_px: u32, height_px: u32) -> Self {
        let surface = Self::default();
        surface.log.borrow_mut().size_px = (width_px, height_px);
        surface
    }

    pub fn monitor(&self) -> SurfaceMonitor {
        SurfaceMonitor(self.log.clone())
    }

    /// Rejects the next `n` submits.
    pub fn fail_next(&mut self, n: usize) {
        self.fail_next = n;
    }
}

impl RenderSurface for HeadlessSurface {
    fn resize(&mut self, width_px: u32, height_px: u32) -> Result<(), SurfaceError> {
        let mut log = self.log.borrow_mut();
        if log.disposed > 0 {
            return Err(SurfaceError::Lost);
        }
        log.size_px = (width_px.max(1), height_px.max(1));
        log.resizes += 1;
        Ok(())
    }

    fn submit(&mut self, frame: RenderFrame) -> Result<(), SurfaceError> {
        let mut log = self.log.borrow_mut();
        if log.disposed > 0 {
            return Err(SurfaceError::Lost);
        }
        if self.fail_next > 0 {
            self.fail_next -= 1;
            log.rejected += 1;
            return Err(SurfaceError::Rejected("injected failure".into()));
        }
        log.submitted += 1;
        log.last_frame = Some(frame);
        Ok(())
    }

    fn dispose(&mut self) {
        let mut log = self.log.borrow_mut();
        log.disposed += 1;
        log.last_frame = None;
        debug!(submitted = log.submitted, "headless surface disposed");
    }
}
