//! WebGPU rendering module
//!
//! A surface that acts as the loop's graphics context, and a demo engine that
//! clears it every frame.

pub mod gpu;
pub mod pulse;

pub use gpu::{GpuSurface, SharedGpu};
pub use pulse::{PulseEngine, PulseFactory};
