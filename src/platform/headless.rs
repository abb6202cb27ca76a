//! In-memory host for native runs and tests
//!
//! Handles that tests need to observe after moving a piece into the loop share
//! their state through `Rc`, so a clone kept outside sees every write.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{Clock, DrawingSurface, FrameHandle, FrameScheduler, GraphicsContext, HostWindow};
use crate::engine::{Engine, EngineFactory};
use crate::error::EngineError;

/// Window whose size can be changed from outside
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    size: Rc<Cell<(u32, u32)>>,
}

impl HeadlessWindow {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Rc::new(Cell::new((width, height))),
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.size.set((width, height));
    }
}

impl HostWindow for HeadlessWindow {
    fn inner_size(&self) -> (u32, u32) {
        self.size.get()
    }
}

/// Canvas stand-in
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    pub backing: (u32, u32),
    pub display: (u32, u32),
}

impl DrawingSurface for HeadlessSurface {
    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing = (width, height);
    }

    fn set_display_size(&mut self, width: u32, height: u32) {
        self.display = (width, height);
    }
}

/// Graphics context that records every viewport call
#[derive(Debug, Clone, Default)]
pub struct RecordingGraphics {
    calls: Rc<RefCell<Vec<(i32, i32, u32, u32)>>>,
}

impl RecordingGraphics {
    pub fn viewport_calls(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn last_viewport(&self) -> Option<(i32, i32, u32, u32)> {
        self.calls.borrow().last().copied()
    }
}

impl GraphicsContext for RecordingGraphics {
    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.calls.borrow_mut().push((x, y, width, height));
    }
}

/// Frame scheduler driven by hand: the caller delivers frames itself
#[derive(Debug, Default)]
pub struct ManualFrames {
    next_id: i32,
    pending: Option<FrameHandle>,
    requests: u32,
    cancelled: Vec<FrameHandle>,
    /// Refuse every request (simulates a host that stopped delivering)
    pub refuse: bool,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback currently scheduled, if any
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn requests(&self) -> u32 {
        self.requests
    }

    pub fn cancelled(&self) -> &[FrameHandle] {
        &self.cancelled
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        if self.refuse {
            return None;
        }
        self.next_id += 1;
        self.requests += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled.push(handle);
    }
}

/// Clock frozen at a given time
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now(&self) -> f64 {
        self.0
    }
}

/// Everything a recording engine was asked to do
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineLog {
    pub start: Option<(f64, u32, u32)>,
    pub updates: Vec<(f64, u32, u32)>,
    pub renders: u32,
}

/// Engine that only records calls
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    log: Rc<RefCell<EngineLog>>,
}

impl RecordingEngine {
    pub fn log(&self) -> EngineLog {
        self.log.borrow().clone()
    }
}

impl Engine for RecordingEngine {
    fn update(&mut self, time: f64, width: u32, height: u32) {
        self.log.borrow_mut().updates.push((time, width, height));
    }

    fn render(&mut self) {
        self.log.borrow_mut().renders += 1;
    }
}

/// Factory for `RecordingEngine`, optionally failing construction
#[derive(Debug, Clone, Default)]
pub struct RecordingFactory {
    engine: RecordingEngine,
    fail_with: Option<String>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_string()),
            ..Self::default()
        }
    }

    /// Handle to the engine this factory will hand out
    pub fn engine(&self) -> RecordingEngine {
        self.engine.clone()
    }
}

impl EngineFactory for RecordingFactory {
    type Engine = RecordingEngine;

    async fn construct(
        self,
        start_time: f64,
        width: u32,
        height: u32,
    ) -> Result<RecordingEngine, EngineError> {
        if let Some(reason) = self.fail_with {
            return Err(EngineError::Construct(reason));
        }
        self.engine.log.borrow_mut().start = Some((start_time, width, height));
        Ok(self.engine)
    }
}
