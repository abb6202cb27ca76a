//! Canvas sizing and graphics viewport synchronization
//!
//! Fixed mode sizes the canvas once at startup. Fullscreen mode follows the host
//! window, checking for drift once per simulated tick and only touching the
//! canvas and graphics context when the size actually changed.

use serde::{Deserialize, Serialize};

use crate::platform::{DrawingSurface, GraphicsContext, HostWindow};

/// Canvas layout mode, chosen once from the canvas attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SurfaceMode {
    /// Embedded canvas, sized once at startup
    #[default]
    Fixed,
    /// Canvas tracks the window size
    Fullscreen,
}

impl SurfaceMode {
    /// Mode for a canvas with or without the fullscreen marker attribute
    pub fn from_marker(fullscreen_marker: bool) -> Self {
        if fullscreen_marker {
            SurfaceMode::Fullscreen
        } else {
            SurfaceMode::Fixed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceMode::Fixed => "fixed",
            SurfaceMode::Fullscreen => "fullscreen",
        }
    }
}

/// Current canvas geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SurfaceGeometry {
    /// Backing-store size
    pub width: u32,
    pub height: u32,
    /// On-screen layout size
    pub display_width: u32,
    pub display_height: u32,
    pub mode: SurfaceMode,
}

impl SurfaceGeometry {
    fn sized(mode: SurfaceMode, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            display_width: width,
            display_height: height,
            mode,
        }
    }
}

/// Owns the canvas geometry and keeps it in step with the host window
pub struct ViewportSynchronizer<W, S, G> {
    window: W,
    surface: S,
    graphics: G,
    geometry: SurfaceGeometry,
    fixed_applied: bool,
}

impl<W, S, G> ViewportSynchronizer<W, S, G>
where
    W: HostWindow,
    S: DrawingSurface,
    G: GraphicsContext,
{
    pub fn new(mode: SurfaceMode, window: W, surface: S, graphics: G) -> Self {
        Self {
            window,
            surface,
            graphics,
            geometry: SurfaceGeometry {
                mode,
                ..Default::default()
            },
            fixed_applied: false,
        }
    }

    /// Startup sizing for either mode
    pub fn initialize(&mut self) -> SurfaceGeometry {
        match self.geometry.mode {
            SurfaceMode::Fixed => self.initialize_fixed(),
            SurfaceMode::Fullscreen => self.synchronize_fullscreen(),
        }
    }

    /// Size a fixed canvas to the window. Applies at most once.
    pub fn initialize_fixed(&mut self) -> SurfaceGeometry {
        if self.geometry.mode != SurfaceMode::Fixed {
            log::warn!("initialize_fixed called on a fullscreen canvas; ignored");
            return self.geometry;
        }
        if self.fixed_applied {
            return self.geometry;
        }
        self.apply_window_size();
        self.fixed_applied = true;
        log::info!(
            "Fixed canvas sized to {}x{}",
            self.geometry.width,
            self.geometry.height
        );
        self.geometry
    }

    /// Re-read the window size and apply it unconditionally
    pub fn synchronize_fullscreen(&mut self) -> SurfaceGeometry {
        self.apply_window_size();
        log::debug!(
            "Fullscreen canvas resynced to {}x{}",
            self.geometry.width,
            self.geometry.height
        );
        self.geometry
    }

    /// True iff the window size differs from the backing size of `current`
    pub fn needs_resync(&self, current: &SurfaceGeometry) -> bool {
        let (width, height) = self.window.inner_size();
        width != current.width || height != current.height
    }

    /// Per-tick fullscreen check. Returns true if a resync happened.
    pub fn resync_if_needed(&mut self) -> bool {
        if self.geometry.mode == SurfaceMode::Fullscreen && self.needs_resync(&self.geometry) {
            self.synchronize_fullscreen();
            true
        } else {
            false
        }
    }

    fn apply_window_size(&mut self) {
        let (width, height) = self.window.inner_size();
        self.surface.set_backing_size(width, height);
        self.surface.set_display_size(width, height);
        self.graphics.set_viewport(0, 0, width, height);
        self.geometry = SurfaceGeometry::sized(self.geometry.mode, width, height);
    }

    pub fn geometry(&self) -> SurfaceGeometry {
        self.geometry
    }

    pub fn mode(&self) -> SurfaceMode {
        self.geometry.mode
    }

    /// Size handed to the engine on every update
    pub fn display_size(&self) -> (u32, u32) {
        (self.geometry.display_width, self.geometry.display_height)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn graphics(&self) -> &G {
        &self.graphics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{HeadlessSurface, HeadlessWindow, RecordingGraphics};

    fn synchronizer(
        mode: SurfaceMode,
        window: &HeadlessWindow,
        graphics: &RecordingGraphics,
    ) -> ViewportSynchronizer<HeadlessWindow, HeadlessSurface, RecordingGraphics> {
        ViewportSynchronizer::new(
            mode,
            window.clone(),
            HeadlessSurface::default(),
            graphics.clone(),
        )
    }

    #[test]
    fn test_mode_from_marker() {
        assert_eq!(SurfaceMode::from_marker(true), SurfaceMode::Fullscreen);
        assert_eq!(SurfaceMode::from_marker(false), SurfaceMode::Fixed);
    }

    #[test]
    fn test_initialize_fixed_applies_once() {
        let window = HeadlessWindow::new(640, 480);
        let graphics = RecordingGraphics::default();
        let mut sync = synchronizer(SurfaceMode::Fixed, &window, &graphics);

        let geometry = sync.initialize_fixed();
        assert_eq!(geometry.width, 640);
        assert_eq!(geometry.display_height, 480);
        assert_eq!(sync.surface().backing, (640, 480));
        assert_eq!(sync.surface().display, (640, 480));
        assert_eq!(graphics.last_viewport(), Some((0, 0, 640, 480)));

        // A later window change must not leak into a fixed canvas
        window.resize(1000, 1000);
        let again = sync.initialize_fixed();
        assert_eq!(again, geometry);
        assert!(!sync.resync_if_needed());
        assert_eq!(graphics.viewport_calls(), 1);
    }

    #[test]
    fn test_initialize_fixed_ignored_in_fullscreen() {
        let window = HeadlessWindow::new(640, 480);
        let graphics = RecordingGraphics::default();
        let mut sync = synchronizer(SurfaceMode::Fullscreen, &window, &graphics);

        let geometry = sync.initialize_fixed();
        assert_eq!(geometry.width, 0);
        assert_eq!(graphics.viewport_calls(), 0);
    }

    #[test]
    fn test_needs_resync_compares_backing_size() {
        let window = HeadlessWindow::new(800, 600);
        let graphics = RecordingGraphics::default();
        let mut sync = synchronizer(SurfaceMode::Fullscreen, &window, &graphics);
        let geometry = sync.initialize();

        assert!(!sync.needs_resync(&geometry));
        window.resize(800, 601);
        assert!(sync.needs_resync(&geometry));
        window.resize(801, 600);
        assert!(sync.needs_resync(&geometry));
    }

    #[test]
    fn test_synchronize_fullscreen_is_idempotent() {
        let window = HeadlessWindow::new(800, 600);
        let graphics = RecordingGraphics::default();
        let mut sync = synchronizer(SurfaceMode::Fullscreen, &window, &graphics);

        let first = sync.synchronize_fullscreen();
        let second = sync.synchronize_fullscreen();
        assert_eq!(first, second);
        assert_eq!(graphics.viewport_calls(), 2);
        assert_eq!(graphics.last_viewport(), Some((0, 0, 800, 600)));
    }

    #[test]
    fn test_resync_only_on_drift() {
        let window = HeadlessWindow::new(800, 600);
        let graphics = RecordingGraphics::default();
        let mut sync = synchronizer(SurfaceMode::Fullscreen, &window, &graphics);
        sync.initialize();

        for _ in 0..10 {
            assert!(!sync.resync_if_needed());
        }
        assert_eq!(graphics.viewport_calls(), 1);

        window.resize(1024, 768);
        assert!(sync.resync_if_needed());
        assert!(!sync.resync_if_needed());
        assert_eq!(graphics.viewport_calls(), 2);
        assert_eq!(sync.display_size(), (1024, 768));
        assert_eq!(sync.surface().backing, (1024, 768));
    }
}
