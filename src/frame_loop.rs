//! Per-frame driver
//!
//! Each frame: re-register for the next frame, work out the owed ticks, run
//! them, render once. The re-registration comes first so the stored handle is
//! always the newest one, even if something later in the frame cancels it.

use crate::config::CatchUpPolicy;
use crate::engine::Engine;
use crate::platform::{DrawingSurface, FrameHandle, FrameScheduler, GraphicsContext, HostWindow};
use crate::sched::{SchedulerState, advance, ticks_owed};
use crate::viewport::ViewportSynchronizer;

/// Whether the callback chain is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// No frame scheduled
    Idle,
    /// Callback chain active
    Running,
}

/// What a single frame did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Ticks owed at this frame's timestamp
    pub owed: u64,
    /// Ticks actually run (less than `owed` only under a clamp)
    pub ticks: u64,
    /// Fullscreen resyncs performed during those ticks
    pub resyncs: u32,
    /// Whether the engine rendered
    pub rendered: bool,
}

/// Fixed-timestep frame loop
pub struct FrameLoop<E, W, S, G, F> {
    state: SchedulerState,
    viewport: ViewportSynchronizer<W, S, G>,
    engine: E,
    scheduler: F,
    catch_up: CatchUpPolicy,
    stall_warning_ticks: u64,
    phase: LoopPhase,
    frames: u64,
}

impl<E, W, S, G, F> FrameLoop<E, W, S, G, F>
where
    E: Engine,
    W: HostWindow,
    S: DrawingSurface,
    G: GraphicsContext,
    F: FrameScheduler,
{
    pub fn new(
        state: SchedulerState,
        viewport: ViewportSynchronizer<W, S, G>,
        engine: E,
        scheduler: F,
    ) -> Self {
        Self {
            state,
            viewport,
            engine,
            scheduler,
            catch_up: CatchUpPolicy::Unbounded,
            stall_warning_ticks: u64::MAX,
            phase: LoopPhase::Idle,
            frames: 0,
        }
    }

    pub fn with_catch_up(mut self, catch_up: CatchUpPolicy) -> Self {
        self.catch_up = catch_up;
        self
    }

    pub fn with_stall_warning(mut self, ticks: u64) -> Self {
        self.stall_warning_ticks = ticks;
        self
    }

    /// Idle -> Running: schedule the first frame
    pub fn start(&mut self) -> LoopPhase {
        if self.phase == LoopPhase::Running {
            return self.phase;
        }
        if self.reschedule().is_some() {
            self.phase = LoopPhase::Running;
            log::info!(
                "Frame loop running (tick {} ms, {} canvas)",
                self.state.tick_length(),
                self.viewport.mode().as_str()
            );
        }
        self.phase
    }

    /// Cancel the pending frame. Nothing runs until `start` is called again.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.state.loop_handle.take() {
            self.scheduler.cancel_frame(handle);
        }
        if self.phase == LoopPhase::Running {
            log::info!("Frame loop cancelled after {} frames", self.frames);
        }
        self.phase = LoopPhase::Idle;
    }

    /// Process one frame delivered at `frame_time`
    pub fn step(&mut self, frame_time: f64) -> FrameReport {
        if self.phase != LoopPhase::Running {
            log::debug!("Frame at {} delivered to an idle loop; ignored", frame_time);
            return FrameReport::default();
        }

        if self.reschedule().is_none() {
            // No further frames will arrive; finish this one regardless
            self.phase = LoopPhase::Idle;
        }

        let owed = ticks_owed(frame_time, &self.state);
        if owed > self.stall_warning_ticks {
            log::warn!(
                "Frame at {} owes {} ticks ({} catch-up)",
                frame_time,
                owed,
                self.catch_up.as_str()
            );
        }
        let ticks = self.catch_up.limit(owed);

        let resyncs = advance(&mut self.state, ticks, &mut self.viewport, &mut self.engine);

        self.engine.render();
        self.state.last_render = frame_time;
        self.frames += 1;

        FrameReport {
            owed,
            ticks,
            resyncs,
            rendered: true,
        }
    }

    fn reschedule(&mut self) -> Option<FrameHandle> {
        let handle = self.scheduler.request_frame();
        if handle.is_none() {
            log::error!("Host refused the next frame request; loop stops scheduling");
        }
        self.state.loop_handle = handle;
        handle
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// Handle of the currently scheduled frame
    pub fn loop_handle(&self) -> Option<FrameHandle> {
        self.state.loop_handle
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn viewport(&self) -> &ViewportSynchronizer<W, S, G> {
        &self.viewport
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    /// Frames processed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{
        HeadlessSurface, HeadlessWindow, ManualFrames, RecordingEngine, RecordingGraphics,
    };
    use crate::viewport::{SurfaceGeometry, SurfaceMode};

    type TestLoop =
        FrameLoop<RecordingEngine, HeadlessWindow, HeadlessSurface, RecordingGraphics, ManualFrames>;

    struct Harness {
        frame_loop: TestLoop,
        window: HeadlessWindow,
        graphics: RecordingGraphics,
        engine: RecordingEngine,
    }

    fn harness(mode: SurfaceMode, width: u32, height: u32) -> Harness {
        let window = HeadlessWindow::new(width, height);
        let graphics = RecordingGraphics::default();
        let engine = RecordingEngine::default();

        let mut viewport = ViewportSynchronizer::new(
            mode,
            window.clone(),
            HeadlessSurface::default(),
            graphics.clone(),
        );
        viewport.initialize();

        let state = SchedulerState::new(0.0, 1.0).unwrap();
        let mut frame_loop = FrameLoop::new(state, viewport, engine.clone(), ManualFrames::new());
        frame_loop.start();

        Harness {
            frame_loop,
            window,
            graphics,
            engine,
        }
    }

    #[test]
    fn test_three_updates_one_render() {
        let mut h = harness(SurfaceMode::Fixed, 320, 200);
        let report = h.frame_loop.step(3.4);

        assert_eq!(report.ticks, 3);
        assert_eq!(h.frame_loop.state().last_tick(), 3.0);
        assert_eq!(h.frame_loop.state().last_render, 3.4);

        let log = h.engine.log();
        assert_eq!(log.updates.len(), 3);
        assert_eq!(log.renders, 1);
    }

    #[test]
    fn test_zero_updates_still_renders() {
        let mut h = harness(SurfaceMode::Fixed, 320, 200);
        let report = h.frame_loop.step(0.5);

        assert_eq!(report.ticks, 0);
        assert!(report.rendered);
        let log = h.engine.log();
        assert!(log.updates.is_empty());
        assert_eq!(log.renders, 1);
    }

    #[test]
    fn test_one_render_per_frame() {
        let mut h = harness(SurfaceMode::Fixed, 320, 200);
        let frame_times = [0.2, 0.9, 5.0, 5.1, 40.7, 40.8, 41.9];
        for &t in &frame_times {
            h.frame_loop.step(t);
        }
        assert_eq!(h.engine.log().renders, frame_times.len() as u32);
        assert_eq!(h.frame_loop.frames(), frame_times.len() as u64);
    }

    #[test]
    fn test_remainder_carries_between_frames() {
        let mut h = harness(SurfaceMode::Fixed, 320, 200);
        h.frame_loop.step(1.6);
        h.frame_loop.step(2.5);
        h.frame_loop.step(3.1);

        // Same total as a single frame at 3.1
        let times: Vec<f64> = h.engine.log().updates.iter().map(|u| u.0).collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_step_reregisters_first() {
        let mut h = harness(SurfaceMode::Fixed, 320, 200);
        let first = h.frame_loop.loop_handle();
        assert!(first.is_some());

        h.frame_loop.step(2.0);
        let second = h.frame_loop.loop_handle();
        assert_ne!(first, second);
        assert_eq!(second, h.frame_loop.scheduler().pending());
        assert_eq!(h.frame_loop.scheduler().requests(), 2);
    }

    #[test]
    fn test_fixed_geometry_survives_window_changes() {
        let mut h = harness(SurfaceMode::Fixed, 800, 600);
        let startup: SurfaceGeometry = h.frame_loop.viewport().geometry();

        for (i, t) in (1..200u32).map(|i| (i, i as f64 * 7.3)) {
            h.window.resize(800 + i, 600 + i);
            h.frame_loop.step(t);
            assert_eq!(h.frame_loop.viewport().geometry(), startup);
        }
        assert_eq!(h.graphics.viewport_calls(), 1);
    }

    #[test]
    fn test_fullscreen_static_window_never_resyncs() {
        let mut h = harness(SurfaceMode::Fullscreen, 800, 600);
        for i in 1..100 {
            h.frame_loop.step(i as f64 * 16.7);
        }
        assert_eq!(h.graphics.viewport_calls(), 1);
    }

    #[test]
    fn test_fullscreen_resize_between_frames() {
        let mut h = harness(SurfaceMode::Fullscreen, 800, 600);
        h.frame_loop.step(5.5);
        assert_eq!(h.graphics.viewport_calls(), 1);

        h.window.resize(1024, 768);
        let report = h.frame_loop.step(9.2);
        assert_eq!(report.resyncs, 1);
        assert_eq!(h.graphics.viewport_calls(), 2);

        let geometry = h.frame_loop.viewport().geometry();
        assert_eq!((geometry.width, geometry.height), (1024, 768));
        assert_eq!(
            (geometry.display_width, geometry.display_height),
            (1024, 768)
        );
    }

    #[test]
    fn test_clamp_defers_owed_ticks() {
        let mut h = harness(SurfaceMode::Fixed, 320, 200);
        h.frame_loop = h.frame_loop.with_catch_up(CatchUpPolicy::Clamp { max_ticks: 4 });

        let report = h.frame_loop.step(10.5);
        assert_eq!(report.owed, 10);
        assert_eq!(report.ticks, 4);
        assert_eq!(h.frame_loop.state().last_tick(), 4.0);

        // Nothing is lost: later frames work off the backlog
        h.frame_loop.step(10.6);
        h.frame_loop.step(10.7);
        assert_eq!(h.frame_loop.state().last_tick(), 10.0);
        assert_eq!(h.engine.log().updates.len(), 10);
        assert_eq!(h.engine.log().renders, 3);
    }

    #[test]
    fn test_unbounded_catch_up_after_stall() {
        let mut h = harness(SurfaceMode::Fixed, 320, 200);
        let report = h.frame_loop.step(50_000.0);
        assert_eq!(report.ticks, 50_000);
        assert_eq!(h.engine.log().renders, 1);
    }

    #[test]
    fn test_cancel_stops_the_loop() {
        let mut h = harness(SurfaceMode::Fixed, 320, 200);
        h.frame_loop.step(1.5);
        let pending = h.frame_loop.loop_handle().unwrap();

        h.frame_loop.cancel();
        assert_eq!(h.frame_loop.phase(), LoopPhase::Idle);
        assert_eq!(h.frame_loop.loop_handle(), None);
        assert_eq!(h.frame_loop.scheduler().cancelled(), &[pending]);
        assert_eq!(h.frame_loop.scheduler().pending(), None);

        // A stale delivery does nothing
        let report = h.frame_loop.step(8.0);
        assert!(!report.rendered);
        assert_eq!(h.engine.log().renders, 1);

        // Restart resumes from the old clock
        assert_eq!(h.frame_loop.start(), LoopPhase::Running);
        h.frame_loop.step(8.0);
        assert_eq!(h.frame_loop.state().last_tick(), 8.0);
    }

    #[test]
    fn test_refused_request_goes_idle_after_frame() {
        let mut h = harness(SurfaceMode::Fixed, 320, 200);
        h.frame_loop.scheduler_mut().refuse = true;

        let report = h.frame_loop.step(2.5);
        assert!(report.rendered);
        assert_eq!(h.frame_loop.phase(), LoopPhase::Idle);
        assert_eq!(h.frame_loop.loop_handle(), None);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut h = harness(SurfaceMode::Fixed, 320, 200);
        assert_eq!(h.frame_loop.start(), LoopPhase::Running);
        assert_eq!(h.frame_loop.scheduler().requests(), 1);
    }
}
