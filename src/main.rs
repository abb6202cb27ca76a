//! Steady Tick entry point
//!
//! Browser: size the canvas, acquire the GPU surface, construct the engine and
//! hand the loop to requestAnimationFrame. Native: replay a short headless
//! session and log what the loop did.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use steady_tick::platform::HostWindow;
    use steady_tick::platform::web::{
        self, AnimationFrames, BrowserWindow, CanvasSurface, PerformanceClock,
    };
    use steady_tick::renderer::{self, PulseFactory, SharedGpu};
    use steady_tick::startup::{self, HostParts};
    use steady_tick::{LoopConfig, LoopPhase, StartupError};

    thread_local! {
        /// Start/cancel hook for the running loop; `true` starts, `false` cancels
        static LOOP_CONTROL: RefCell<Option<Box<dyn Fn(bool) -> LoopPhase>>> =
            RefCell::new(None);
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Trace) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        let config = LoopConfig::load();
        let level = config.log_level().unwrap_or(log::Level::Info);
        log::set_max_level(level.to_level_filter());

        log::info!("Steady Tick starting...");

        match start(&config).await {
            Ok(()) => log::info!("Steady Tick running!"),
            Err(e) => {
                log::error!("Startup failed: {}", e);
                if e.is_fatal_precondition() {
                    web::alert(&format!("Failed to initialize graphics: {}", e));
                }
            }
        }
    }

    async fn start(config: &LoopConfig) -> Result<(), StartupError> {
        let window = web::window()?;
        let canvas = web::find_canvas(&config.canvas_id)?;
        let mode = web::surface_mode(&canvas);
        log::info!("Canvas #{} in {} mode", config.canvas_id, mode.as_str());

        let host_window = BrowserWindow::new(window.clone());
        let (width, height) = host_window.inner_size();
        let gpu: SharedGpu = Rc::new(RefCell::new(
            renderer::gpu::acquire(&canvas, width, height).await?,
        ));

        let host = HostParts {
            mode,
            window: host_window,
            surface: CanvasSurface::new(canvas),
            graphics: gpu.clone(),
            scheduler: AnimationFrames::new(window.clone()),
            clock: PerformanceClock::new(window),
        };

        let frame_loop = startup::prepare(config, host, PulseFactory::new(gpu)).await?;
        let frame_loop = Rc::new(RefCell::new(frame_loop));

        web::install_frame_callback(&frame_loop);
        frame_loop.borrow_mut().start();

        LOOP_CONTROL.with(|control| {
            let frame_loop = frame_loop.clone();
            *control.borrow_mut() = Some(Box::new(move |run: bool| {
                let mut frame_loop = frame_loop.borrow_mut();
                if run {
                    frame_loop.start()
                } else {
                    frame_loop.cancel();
                    frame_loop.phase()
                }
            }));
        });

        Ok(())
    }

    /// Returns whether the loop is running afterwards
    pub fn control(run: bool) -> bool {
        LOOP_CONTROL.with(|control| match control.borrow().as_ref() {
            Some(hook) => hook(run) == LoopPhase::Running,
            None => {
                log::warn!("Loop control used before the loop started");
                false
            }
        })
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

/// Cancel the pending frame; the loop stays idle until `resume_loop`
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn stop_loop() -> bool {
    wasm_app::control(false)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn resume_loop() -> bool {
    wasm_app::control(true)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Steady Tick (native) starting...");
    log::info!("Browser mode requires wasm32 - run with `trunk serve` for the web version");

    if let Err(e) = headless_session() {
        log::error!("Headless session failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Two seconds of 60 Hz frames against a fullscreen canvas that resizes halfway
#[cfg(not(target_arch = "wasm32"))]
fn headless_session() -> Result<(), steady_tick::StartupError> {
    use steady_tick::LoopConfig;
    use steady_tick::platform::headless::{
        FixedClock, HeadlessSurface, HeadlessWindow, ManualFrames, RecordingFactory,
        RecordingGraphics,
    };
    use steady_tick::startup::{self, HostParts};
    use steady_tick::viewport::SurfaceMode;

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const FRAMES: u32 = 120;

    let config = LoopConfig::load();
    let window = HeadlessWindow::new(800, 600);
    let graphics = RecordingGraphics::default();
    let factory = RecordingFactory::new();
    let engine = factory.engine();

    let host = HostParts {
        mode: SurfaceMode::Fullscreen,
        window: window.clone(),
        surface: HeadlessSurface::default(),
        graphics: graphics.clone(),
        scheduler: ManualFrames::new(),
        clock: FixedClock(0.0),
    };
    let mut frame_loop = pollster::block_on(startup::prepare(&config, host, factory))?;
    frame_loop.start();

    let mut resyncs = 0;
    for frame in 1..=FRAMES {
        if frame == FRAMES / 2 {
            window.resize(1024, 768);
        }
        resyncs += frame_loop.step(frame as f64 * FRAME_MS).resyncs;
    }

    let log = engine.log();
    log::info!(
        "{} frames: {} updates, {} renders, {} resyncs, {} viewport calls, clock at {:.1} ms",
        frame_loop.frames(),
        log.updates.len(),
        log.renders,
        resyncs,
        graphics.viewport_calls(),
        frame_loop.state().last_tick()
    );
    log::info!("Final canvas: {:?}", frame_loop.viewport().geometry());
    Ok(())
}
