//! Demo engine: clears the canvas to a color that breathes with simulation time
//!
//! Stands in for a real simulation so the browser build has something to
//! drive.

use glam::Vec3;

use super::gpu::SharedGpu;
use crate::engine::{Engine, EngineFactory};
use crate::error::EngineError;

/// Length of one full pulse (ms of simulation time)
pub const PULSE_PERIOD_MS: f64 = 4000.0;

const BACKDROP: Vec3 = Vec3::new(0x22 as f32 / 255.0, 0x22 as f32 / 255.0, 0x22 as f32 / 255.0);
const ACCENT: Vec3 = Vec3::new(0x79 as f32 / 255.0, 0xe0 as f32 / 255.0, 0x95 as f32 / 255.0);
/// How far toward the accent the pulse peaks
const PEAK_MIX: f32 = 0.35;

/// Color at `elapsed_ms` of simulation time since start
pub fn pulse_color(elapsed_ms: f64) -> Vec3 {
    let phase = (elapsed_ms / PULSE_PERIOD_MS).rem_euclid(1.0);
    let mix = 0.5 - 0.5 * (phase * std::f64::consts::TAU).cos();
    BACKDROP.lerp(ACCENT, mix as f32 * PEAK_MIX)
}

pub struct PulseEngine {
    gpu: SharedGpu,
    start_time: f64,
    time: f64,
    size: (u32, u32),
}

impl PulseEngine {
    pub fn new(gpu: SharedGpu, start_time: f64, width: u32, height: u32) -> Self {
        Self {
            gpu,
            start_time,
            time: start_time,
            size: (width, height),
        }
    }
}

impl Engine for PulseEngine {
    fn update(&mut self, time: f64, width: u32, height: u32) {
        self.time = time;
        if self.size != (width, height) {
            log::debug!("Engine size {}x{} -> {}x{}", self.size.0, self.size.1, width, height);
            self.size = (width, height);
        }
    }

    fn render(&mut self) {
        let color = pulse_color(self.time - self.start_time);
        let clear = wgpu::Color {
            r: color.x as f64,
            g: color.y as f64,
            b: color.z as f64,
            a: 1.0,
        };

        let mut gpu = self.gpu.borrow_mut();
        match gpu.clear(clear) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost) => {
                let (width, height) = gpu.size();
                gpu.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

/// Builds a `PulseEngine` on an already acquired surface
pub struct PulseFactory {
    gpu: SharedGpu,
}

impl PulseFactory {
    pub fn new(gpu: SharedGpu) -> Self {
        Self { gpu }
    }
}

impl EngineFactory for PulseFactory {
    type Engine = PulseEngine;

    async fn construct(
        self,
        start_time: f64,
        width: u32,
        height: u32,
    ) -> Result<PulseEngine, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::Construct(format!(
                "canvas has no area ({}x{})",
                width, height
            )));
        }
        Ok(PulseEngine::new(self.gpu, start_time, width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_starts_and_ends_on_backdrop() {
        assert!(pulse_color(0.0).abs_diff_eq(BACKDROP, 1e-6));
        assert!(pulse_color(PULSE_PERIOD_MS).abs_diff_eq(BACKDROP, 1e-5));
    }

    #[test]
    fn test_pulse_peaks_mid_period() {
        let peak = pulse_color(PULSE_PERIOD_MS / 2.0);
        let expected = BACKDROP.lerp(ACCENT, PEAK_MIX);
        assert!(peak.abs_diff_eq(expected, 1e-5));
        // Green channel brightens the most
        assert!(peak.y - BACKDROP.y > peak.x - BACKDROP.x);
    }

    #[test]
    fn test_pulse_handles_time_before_start() {
        let before = pulse_color(-PULSE_PERIOD_MS / 4.0);
        let after = pulse_color(PULSE_PERIOD_MS * 3.0 / 4.0);
        assert!(before.abs_diff_eq(after, 1e-5));
    }
}
