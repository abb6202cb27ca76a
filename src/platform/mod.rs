//! Platform abstraction layer
//!
//! The loop only talks to the host through these traits:
//! - Window geometry (polled, never subscribed)
//! - Canvas backing/display size
//! - Graphics viewport
//! - Frame delivery (requestAnimationFrame and its cancellation)
//! - Wall clock

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

/// Token for a scheduled next-frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Read-only source of the host window's inner size
pub trait HostWindow {
    fn inner_size(&self) -> (u32, u32);
}

/// The drawable element whose size the viewport synchronizer owns
pub trait DrawingSurface {
    /// Backing-store size in pixels
    fn set_backing_size(&mut self, width: u32, height: u32);
    /// On-screen layout size in pixels
    fn set_display_size(&mut self, width: u32, height: u32);
}

/// Graphics context capability used by the viewport synchronizer
pub trait GraphicsContext {
    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32);
}

/// Host frame-delivery primitive
pub trait FrameScheduler {
    /// Schedule the next frame callback. `None` means the host refused.
    fn request_frame(&mut self) -> Option<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Wall clock in frame-timestamp units (ms)
pub trait Clock {
    fn now(&self) -> f64;
}
