//! Scheduler state
//!
//! One instance per loop, owned by the loop and lent to each tick operation.

use crate::error::ConfigError;
use crate::platform::FrameHandle;

/// Simulation clock plus the handle of the pending frame callback
#[derive(Debug, Clone)]
pub struct SchedulerState {
    /// Simulation clock (ms); moves only by whole tick lengths
    pub(crate) last_tick: f64,
    /// Wall-clock time of the most recent render (ms)
    pub last_render: f64,
    tick_length: f64,
    /// Most recently scheduled frame callback
    pub loop_handle: Option<FrameHandle>,
}

impl SchedulerState {
    pub fn new(start_time: f64, tick_length: f64) -> Result<Self, ConfigError> {
        if !(tick_length.is_finite() && tick_length > 0.0) {
            return Err(ConfigError::InvalidTickLength(tick_length));
        }
        Ok(Self {
            last_tick: start_time,
            last_render: start_time,
            tick_length,
            loop_handle: None,
        })
    }

    pub fn last_tick(&self) -> f64 {
        self.last_tick
    }

    pub fn tick_length(&self) -> f64 {
        self.tick_length
    }

    /// Simulation time `k` ticks after the current clock
    #[inline]
    pub fn tick_time(&self, k: u64) -> f64 {
        self.last_tick + k as f64 * self.tick_length
    }
}
