//! Steady Tick - fixed-timestep frame loop for canvas simulations
//!
//! Core modules:
//! - `sched`: Simulation clock and tick arithmetic (pure, deterministic)
//! - `viewport`: Canvas sizing and graphics viewport synchronization
//! - `frame_loop`: Per-frame driver (re-register, tick, render)
//! - `platform`: Browser/headless host abstraction
//! - `renderer`: WebGPU surface and the demo engine
//! - `startup`: One-shot startup path producing an idle loop

pub mod config;
pub mod engine;
pub mod error;
pub mod frame_loop;
pub mod platform;
pub mod renderer;
pub mod sched;
pub mod startup;
pub mod viewport;

pub use config::{CatchUpPolicy, LoopConfig};
pub use engine::{Engine, EngineFactory};
pub use error::{ConfigError, EngineError, StartupError};
pub use frame_loop::{FrameLoop, FrameReport, LoopPhase};
pub use sched::{SchedulerState, advance, ticks_owed};
pub use viewport::{SurfaceGeometry, SurfaceMode, ViewportSynchronizer};

/// Loop configuration constants
pub mod consts {
    /// Default simulation step in milliseconds (rAF timestamps are ms)
    pub const DEFAULT_TICK_LENGTH_MS: f64 = 1.0;
    /// Owed ticks above which a frame is reported as a stall
    pub const DEFAULT_STALL_WARNING_TICKS: u64 = 1000;

    /// Canvas attribute that selects fullscreen mode when present
    pub const FULLSCREEN_ATTRIBUTE: &str = "fullscreen-mode";
    /// Default id of the drawing canvas
    pub const DEFAULT_CANVAS_ID: &str = "canvas";
}
