//! WebGPU surface
//!
//! Owns the swap chain for the canvas. As a graphics context, applying a
//! viewport reconfigures the swap chain to the new canvas size.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::StartupError;
use crate::platform::GraphicsContext;

/// Surface shared between the viewport synchronizer and the engine
pub type SharedGpu = Rc<RefCell<GpuSurface>>;

pub struct GpuSurface {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    /// Last viewport applied: x, y, width, height
    viewport: (i32, i32, u32, u32),
}

impl GpuSurface {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, StartupError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("steady-tick-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| StartupError::GraphicsUnavailable(e.to_string()))?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| {
                StartupError::GraphicsUnavailable("surface reports no formats".to_string())
            })?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::info!(
            "Surface config: {}x{}, format: {:?}",
            config.width,
            config.height,
            config.format
        );
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            viewport: (0, 0, width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn viewport(&self) -> (i32, i32, u32, u32) {
        self.viewport
    }

    /// Clear the whole frame to `color` and present it
    pub fn clear(&mut self, color: wgpu::Color) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("clear_encoder"),
            });

        {
            let _render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("clear_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl GraphicsContext for GpuSurface {
    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.viewport = (x, y, width, height);
        if (width, height) != self.size() {
            self.resize(width, height);
        }
    }
}

impl GraphicsContext for SharedGpu {
    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.borrow_mut().set_viewport(x, y, width, height);
    }
}

/// Acquire a WebGPU (or WebGL2 fallback) surface for `canvas`
#[cfg(target_arch = "wasm32")]
pub async fn acquire(
    canvas: &web_sys::HtmlCanvasElement,
    width: u32,
    height: u32,
) -> Result<GpuSurface, StartupError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
        ..Default::default()
    });

    let surface = instance
        .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
        .map_err(|e| StartupError::GraphicsUnavailable(e.to_string()))?;

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await
        .map_err(|e| StartupError::GraphicsUnavailable(e.to_string()))?;

    log::info!("Using adapter: {:?}", adapter.get_info().name);

    GpuSurface::new(surface, &adapter, width, height).await
}
