//! Latest-value input inbox.
//!
//! Raw host callbacks (pointer move, resize, scroll progress, UI controls)
//! only write here. The frame loop drains the inbox once per frame, which
//! turns callback-driven mutation into a deterministic per-frame read.
//!
//! Channels:
//! - pointer: latest normalized position wins
//! - viewport: latest size wins
//! - scroll: latest progress per region wins; regions are reported in the
//!   order they were last updated
//! - commands: FIFO, bounded (oldest dropped when full)

use std::collections::{BTreeMap, VecDeque};

use foundation::math::Vec2;

/// Logical viewport size in CSS pixels plus the device pixel ratio.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    pub fn aspect(&self) -> f64 {
        if self.height <= 0.0 {
            return 1.0;
        }
        self.width / self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollUpdate {
    pub region: String,
    pub progress: f64,
    /// Monotonic write sequence; larger means more recent.
    pub seq: u64,
}

/// Everything accumulated since the previous drain.
#[derive(Debug, Clone, PartialEq)]
pub struct InboxDrain<C> {
    pub pointer: Option<Vec2>,
    pub viewport: Option<Viewport>,
    /// Ascending `seq`: the last entry is the most recently written region.
    pub scroll: Vec<ScrollUpdate>,
    pub commands: Vec<C>,
    pub dropped_commands: usize,
}

impl<C> InboxDrain<C> {
    pub fn is_empty(&self) -> bool {
        self.pointer.is_none()
            && self.viewport.is_none()
            && self.scroll.is_empty()
            && self.commands.is_empty()
    }
}

#[derive(Debug)]
pub struct InputInbox<C> {
    pointer: Option<Vec2>,
    viewport: Option<Viewport>,
    scroll: BTreeMap<String, (u64, f64)>,
    commands: VecDeque<C>,
    max_commands: usize,
    dropped_commands: usize,
    next_seq: u64,
    closed: bool,
}

impl<C> InputInbox<C> {
    pub const DEFAULT_MAX_COMMANDS: usize = 256;

    pub fn new() -> Self {
        Self::with_max_commands(Self::DEFAULT_MAX_COMMANDS)
    }

    pub fn with_max_commands(max_commands: usize) -> Self {
        Self {
            pointer: None,
            viewport: None,
            scroll: BTreeMap::new(),
            commands: VecDeque::new(),
            max_commands: max_commands.max(1),
            dropped_commands: 0,
            next_seq: 0,
            closed: false,
        }
    }

    /// Once closed, every push is ignored. Used at teardown to detach
    /// listeners that may still hold a handle.
    pub fn close(&mut self) {
        self.closed = true;
        self.pointer = None;
        self.viewport = None;
        self.scroll.clear();
        self.commands.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn push_pointer(&mut self, normalized: Vec2) {
        if self.closed {
            return;
        }
        self.pointer = Some(normalized);
    }

    pub fn push_viewport(&mut self, viewport: Viewport) {
        if self.closed {
            return;
        }
        self.viewport = Some(viewport);
    }

    pub fn push_scroll(&mut self, region: impl Into<String>, progress: f64) {
        if self.closed {
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.scroll.insert(region.into(), (seq, progress));
    }

    pub fn push_command(&mut self, command: C) {
        if self.closed {
            return;
        }
        if self.commands.len() >= self.max_commands {
            self.commands.pop_front();
            self.dropped_commands += 1;
        }
        self.commands.push_back(command);
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    pub fn drain(&mut self) -> InboxDrain<C> {
        let mut scroll: Vec<ScrollUpdate> = std::mem::take(&mut self.scroll)
            .into_iter()
            .map(|(region, (seq, progress))| ScrollUpdate {
                region,
                progress,
                seq,
            })
            .collect();
        scroll.sort_by_key(|u| u.seq);

        InboxDrain {
            pointer: self.pointer.take(),
            viewport: self.viewport.take(),
            scroll,
            commands: self.commands.drain(..).collect(),
            dropped_commands: std::mem::take(&mut self.dropped_commands),
        }
    }
}

impl<C> Default for InputInbox<C> {
    fn default() -> Self {
        Self::new()
    }
}
