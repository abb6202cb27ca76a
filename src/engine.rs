//! Engine collaborator
//!
//! The loop never looks inside the engine. It hands it the simulation clock and
//! the current display size once per tick, and asks it to draw once per frame.

use crate::error::EngineError;

/// Simulation/rendering engine driven by the frame loop
pub trait Engine {
    /// Advance the simulation to `time` (ms, simulation clock)
    fn update(&mut self, time: f64, width: u32, height: u32);
    /// Draw the state left by the last update
    fn render(&mut self);
}

/// Asynchronous engine construction
pub trait EngineFactory {
    type Engine: Engine;

    fn construct(
        self,
        start_time: f64,
        width: u32,
        height: u32,
    ) -> impl Future<Output = Result<Self::Engine, EngineError>>;
}
