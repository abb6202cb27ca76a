//! Startup path
//!
//! Runs once: validate config, size the canvas, construct the engine. Any
//! failure here is final; the caller logs it and the loop never starts.

use crate::config::LoopConfig;
use crate::engine::EngineFactory;
use crate::error::StartupError;
use crate::frame_loop::FrameLoop;
use crate::platform::{Clock, DrawingSurface, FrameScheduler, GraphicsContext, HostWindow};
use crate::sched::SchedulerState;
use crate::viewport::{SurfaceMode, ViewportSynchronizer};

/// Host pieces a loop is assembled from
pub struct HostParts<W, S, G, F, C> {
    pub mode: SurfaceMode,
    pub window: W,
    pub surface: S,
    pub graphics: G,
    pub scheduler: F,
    pub clock: C,
}

/// Build an idle frame loop. Call `start` on the result to begin.
pub async fn prepare<Fac, W, S, G, F, C>(
    config: &LoopConfig,
    host: HostParts<W, S, G, F, C>,
    factory: Fac,
) -> Result<FrameLoop<Fac::Engine, W, S, G, F>, StartupError>
where
    Fac: EngineFactory,
    W: HostWindow,
    S: DrawingSurface,
    G: GraphicsContext,
    F: FrameScheduler,
    C: Clock,
{
    config.validate()?;

    let mut viewport = ViewportSynchronizer::new(host.mode, host.window, host.surface, host.graphics);
    let geometry = viewport.initialize();

    let start_time = host.clock.now();
    let state = SchedulerState::new(start_time, config.tick_length_ms)?;

    let (width, height) = viewport.display_size();
    let engine = factory.construct(start_time, width, height).await?;
    log::info!(
        "Engine constructed at t={:.1} for {}x{} {} canvas",
        start_time,
        geometry.display_width,
        geometry.display_height,
        geometry.mode.as_str()
    );

    Ok(FrameLoop::new(state, viewport, engine, host.scheduler)
        .with_catch_up(config.catch_up)
        .with_stall_warning(config.stall_warning_ticks))
}
