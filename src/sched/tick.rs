//! Tick arithmetic
//!
//! Converts a frame timestamp into whole simulation ticks and advances the
//! simulation clock by exactly that many tick lengths.

use super::state::SchedulerState;
use crate::engine::Engine;
use crate::platform::{DrawingSurface, GraphicsContext, HostWindow};
use crate::viewport::ViewportSynchronizer;

/// Whole ticks owed at `frame_time`.
///
/// A frame that lands at or before the next tick boundary owes nothing. Past
/// it, the count satisfies
/// `last_tick + n * tick_length <= frame_time < last_tick + (n + 1) * tick_length`;
/// the fractional remainder stays behind in `last_tick` for the next frame.
pub fn ticks_owed(frame_time: f64, state: &SchedulerState) -> u64 {
    if !frame_time.is_finite() {
        log::warn!("Non-finite frame time {}; owing no ticks", frame_time);
        return 0;
    }

    let next_tick = state.tick_time(1);
    if frame_time <= next_tick {
        return 0;
    }

    let elapsed = frame_time - state.last_tick;
    let mut n = (elapsed / state.tick_length()).floor() as u64;

    // The rounded quotient can sit one step off the boundary the clock will
    // actually compute, so settle n against tick_time itself.
    while n > 1 && state.tick_time(n) > frame_time {
        n -= 1;
    }
    while n < u64::MAX && state.tick_time(n + 1) <= frame_time {
        n += 1;
    }
    n
}

/// Run `n` ticks: move the clock, resync a fullscreen canvas if the window
/// drifted, then update the engine. Returns the number of resyncs.
///
/// Tick k lands on `base + k * tick_length`, so the clock after `n` ticks is
/// exactly `base + n * tick_length` with no accumulated rounding.
pub fn advance<E, W, S, G>(
    state: &mut SchedulerState,
    n: u64,
    viewport: &mut ViewportSynchronizer<W, S, G>,
    engine: &mut E,
) -> u32
where
    E: Engine,
    W: HostWindow,
    S: DrawingSurface,
    G: GraphicsContext,
{
    let base = state.last_tick;
    let tick_length = state.tick_length();
    let mut resyncs = 0;

    for k in 1..=n {
        state.last_tick = base + k as f64 * tick_length;

        if viewport.resync_if_needed() {
            resyncs += 1;
        }

        let (width, height) = viewport.display_size();
        engine.update(state.last_tick, width, height);
    }

    if n > 0 {
        log::trace!("Advanced {} ticks to {}", n, state.last_tick);
    }
    resyncs
}
