//! Window creation and event handling via winit.
//!
//! [`GlobeApp`] implements winit's [`ApplicationHandler`]: it builds the
//! window, GPU renderer, texture loader and scene on `resumed`, forwards
//! resize and pointer events to the scene, and drives one scene frame per
//! `RedrawRequested`, requesting the next redraw right after.

use std::sync::Arc;
use std::time::{Duration, Instant};

use globe_assets::{OfflineSource, TextureLoader, TextureSource, UrlSource};
use globe_config::Config;
use globe_render::{GlobeRenderer, RenderContextError, init_render_context_blocking};
use globe_scene::{SceneContext, Viewport};
use tracing::{error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::input::PointerState;

/// Fatal startup failures.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    Render(#[from] RenderContextError),
}

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
        .with_fullscreen(
            config
                .window
                .fullscreen
                .then_some(Fullscreen::Borderless(None)),
        )
}

/// Device pixel ratio the renderer uses: the window's scale factor, capped.
pub fn effective_pixel_ratio(scale_factor: f64, max_pixel_ratio: f64) -> f64 {
    scale_factor.min(max_pixel_ratio)
}

/// Logical viewport for a window of `physical` pixels at `scale_factor`.
pub fn viewport_for(physical: PhysicalSize<u32>, scale_factor: f64, max_pixel_ratio: f64) -> Viewport {
    let logical: LogicalSize<u32> = physical.to_logical(scale_factor);
    Viewport::new(
        logical.width,
        logical.height,
        effective_pixel_ratio(scale_factor, max_pixel_ratio),
    )
}

fn texture_source(config: &Config) -> Arc<dyn TextureSource> {
    if config.textures.offline {
        info!("Offline mode: textures will not be fetched");
        Arc::new(OfflineSource)
    } else {
        Arc::new(UrlSource::new(config.textures.max_bytes))
    }
}

/// Counts rendered frames and logs the rate once per interval.
#[derive(Debug)]
struct FrameStats {
    interval: Duration,
    window_start: Instant,
    frames: u32,
}

impl FrameStats {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            window_start: Instant::now(),
            frames: 0,
        }
    }

    /// Record a frame; returns frames per second when an interval closes.
    fn record(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        let elapsed = now.duration_since(self.window_start);
        if elapsed < self.interval {
            return None;
        }
        let fps = self.frames as f64 / elapsed.as_secs_f64();
        self.frames = 0;
        self.window_start = now;
        Some(fps)
    }
}

/// Everything that only exists once the window is up.
struct Running {
    window: Arc<Window>,
    renderer: GlobeRenderer,
    scene: SceneContext,
}

/// Application state for the globe viewer.
pub struct GlobeApp {
    config: Config,
    running: Option<Running>,
    pointer: PointerState,
    stats: Option<FrameStats>,
    fatal: Option<BootstrapError>,
}

impl GlobeApp {
    pub fn new(config: Config) -> Self {
        let stats = config
            .debug
            .show_fps
            .then(|| FrameStats::new(Duration::from_secs(1)));
        Self {
            config,
            running: None,
            pointer: PointerState::new(),
            stats,
            fatal: None,
        }
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<Running, BootstrapError> {
        let window = Arc::new(event_loop.create_window(window_attributes_from_config(&self.config))?);

        let viewport = viewport_for(
            window.inner_size(),
            window.scale_factor(),
            self.config.render.max_pixel_ratio,
        );
        let (buffer_width, buffer_height) = viewport.drawing_buffer_size();
        info!(
            "Window created: {}x{} logical, pixel ratio {:.2}",
            viewport.width(),
            viewport.height(),
            viewport.pixel_ratio()
        );

        let context = init_render_context_blocking(
            window.clone(),
            buffer_width,
            buffer_height,
            self.config.render.vsync,
            self.config.render.msaa_samples,
        )?;

        let loader = TextureLoader::new(
            self.config.textures.worker_count,
            texture_source(&self.config),
        );
        let scene = SceneContext::bootstrap(&self.config, viewport, Box::new(loader));
        let renderer = GlobeRenderer::new(context, &scene);

        Ok(Running {
            window,
            renderer,
            scene,
        })
    }

    /// Take the error that stopped startup, if any.
    pub fn take_fatal(&mut self) -> Option<BootstrapError> {
        self.fatal.take()
    }

    fn apply_window_size(&mut self, physical: PhysicalSize<u32>) {
        let Some(running) = &mut self.running else {
            return;
        };
        let viewport = viewport_for(
            physical,
            running.window.scale_factor(),
            self.config.render.max_pixel_ratio,
        );
        running.scene.set_pixel_ratio(viewport.pixel_ratio());
        running.scene.resize(viewport.width(), viewport.height());

        let (w, h) = running.scene.viewport().drawing_buffer_size();
        running.renderer.resize(w, h);
        info!(
            "Window resized to {}x{} (drawing buffer {w}x{h})",
            viewport.width(),
            viewport.height()
        );
    }

    fn redraw(&mut self) {
        let Some(running) = &mut self.running else {
            return;
        };

        let drag = self.pointer.drag();
        if drag != glam::Vec2::ZERO {
            running.scene.drag(drag.x, drag.y);
        }
        let scroll = self.pointer.scroll();
        if scroll != 0.0 {
            running.scene.zoom(scroll);
        }
        self.pointer.clear_transients();

        if running.scene.frame(&mut running.renderer)
            && let Some(stats) = &mut self.stats
            && let Some(fps) = stats.record(Instant::now())
        {
            info!(
                fps = format!("{fps:.1}"),
                skipped = running.scene.skipped_frames(),
                "frame rate"
            );
        }

        running.window.request_redraw();
    }
}

impl ApplicationHandler for GlobeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => {
                running.window.request_redraw();
                self.running = Some(running);
            }
            Err(e) => {
                error!("Startup failed: {e}");
                self.fatal = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.running = None;
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.apply_window_size(new_size);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(running) = &self.running {
                    let inner = running.window.inner_size();
                    info!("Scale factor changed to {scale_factor:.2}");
                    self.apply_window_size(inner);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let scale = self
                    .running
                    .as_ref()
                    .map_or(1.0, |r| r.window.scale_factor());
                let logical = position.to_logical::<f64>(scale);
                self.pointer.on_cursor_moved(logical.x, logical.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.pointer.on_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.pointer.on_scroll(delta);
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer.on_cursor_left();
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            let frames = running.scene.clock.frame;
            let skipped = running.scene.skipped_frames();
            if skipped > 0 {
                warn!("{skipped} of {frames} frames were skipped");
            }
            info!("Exiting after {frames} frames");
        }
    }
}

/// Creates an event loop and runs the viewer until the window closes.
#[instrument(skip(config))]
pub fn run(config: Config) -> Result<(), BootstrapError> {
    let event_loop = EventLoop::new()?;
    let mut app = GlobeApp::new(config);
    event_loop.run_app(&mut app)?;
    match app.take_fatal() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_attributes_from_config() {
        let mut config = Config::default();
        config.window.title = "Earth".to_string();
        config.window.width = 800;
        config.window.height = 600;
        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.title, "Earth");
        assert!(attrs.fullscreen.is_none());

        config.window.fullscreen = true;
        let attrs = window_attributes_from_config(&config);
        assert!(attrs.fullscreen.is_some());
    }

    #[test]
    fn test_pixel_ratio_is_capped() {
        assert_eq!(effective_pixel_ratio(1.25, 2.0), 1.25);
        assert_eq!(effective_pixel_ratio(3.0, 2.0), 2.0);
    }

    #[test]
    fn test_viewport_from_physical_size() {
        let viewport = viewport_for(PhysicalSize::new(2560, 1440), 2.0, 2.0);
        assert_eq!((viewport.width(), viewport.height()), (1280, 720));
        assert_eq!(viewport.drawing_buffer_size(), (2560, 1440));
    }

    #[test]
    fn test_capped_ratio_shrinks_drawing_buffer() {
        let viewport = viewport_for(PhysicalSize::new(3000, 1500), 3.0, 2.0);
        assert_eq!((viewport.width(), viewport.height()), (1000, 500));
        assert_eq!(viewport.drawing_buffer_size(), (2000, 1000));
    }

    #[test]
    fn test_frame_stats_report_once_per_interval() {
        let mut stats = FrameStats::new(Duration::from_secs(1));
        let start = stats.window_start;
        for i in 1..60 {
            assert!(stats.record(start + Duration::from_millis(i * 10)).is_none());
        }
        let fps = stats.record(start + Duration::from_secs(1)).unwrap();
        assert!((fps - 60.0).abs() < 1e-9);
        assert_eq!(stats.frames, 0);
    }

    #[test]
    fn test_offline_config_selects_offline_source() {
        let mut config = Config::default();
        config.textures.offline = true;
        let source = texture_source(&config);
        assert!(source.fetch("https://example.com/earth.jpg").is_err());
    }
}
