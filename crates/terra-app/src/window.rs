//! Window creation and the per-frame host driver.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`]. Each
//! `RedrawRequested` reads the [`FrameClock`], asks the [`Animator`] for this
//! frame's transforms, advances the orbit controls, draws, and requests the
//! next redraw.

use std::sync::Arc;

use glam::Vec3;
use terra_config::Config;
use terra_geo::{CITIES, PinGroup};
use terra_render::{
    Camera, DepthBuffer, FrameEncoder, RenderContext, RenderPassBuilder, SurfaceError,
    SurfaceResizeEvent, SurfaceWrapper, init_render_context_blocking,
};
use terra_scene::{Animator, EarthTextures, GlobeScene, GlobeSettings};
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::controls::OrbitControls;
use crate::error::AppError;
use crate::frame_clock::FrameClock;
use crate::pointer::PointerState;

/// Frames between frame-rate log lines when `debug.log_frame_stats` is set.
const FRAME_STATS_INTERVAL: u64 = 300;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attributes = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attributes.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attributes
    }
}

/// GPU resources that exist once the window is up.
struct Renderer {
    gpu: RenderContext,
    depth: DepthBuffer,
    scene: GlobeScene,
}

/// Application state: window, GPU resources, camera, controls and clock.
pub struct AppState {
    config: Config,
    settings: GlobeSettings,
    pins: PinGroup,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    surface_wrapper: SurfaceWrapper,
    camera: Camera,
    controls: OrbitControls,
    pointer: PointerState,
    animator: Animator,
    clock: FrameClock,
    stats_window_start: f64,
}

impl AppState {
    pub fn with_config(config: Config) -> Self {
        let settings = GlobeSettings::from_config(&config);
        let pins = PinGroup::from_cities(&CITIES, settings.pin_style);

        let surface_wrapper = SurfaceWrapper::new(
            config.window.width,
            config.window.height,
            1.0,
            config.render.max_pixel_ratio,
        );

        let position = Vec3::from_array(config.camera.position);
        let target = Vec3::from_array(config.camera.target);
        let camera = Camera::looking_at(
            position,
            target,
            config.camera.fov_y_degrees,
            surface_wrapper.aspect_ratio(),
            config.camera.near,
            config.camera.far,
        );
        let controls = OrbitControls::new(position, target, &config.controls);

        Self {
            animator: Animator::new(settings.rotation_rate),
            settings,
            pins,
            window: None,
            renderer: None,
            surface_wrapper,
            camera,
            controls,
            pointer: PointerState::new(),
            clock: FrameClock::new(),
            stats_window_start: 0.0,
            config,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn surface_wrapper(&self) -> &SurfaceWrapper {
        &self.surface_wrapper
    }

    fn initialize_rendering(&mut self, window: Arc<Window>) -> Result<(), AppError> {
        let render_size = self.surface_wrapper.render_size();
        let gpu = init_render_context_blocking(window, render_size, self.config.window.vsync)?;

        let depth = DepthBuffer::new(&gpu.device, render_size);
        let textures = EarthTextures::load(&self.config.globe);
        let scene = GlobeScene::new(
            &gpu.device,
            &gpu.queue,
            gpu.surface_format,
            self.settings,
            &textures,
            &self.pins,
        )?;

        info!(
            "Rendering initialized: {}x{} {:?}",
            render_size.width, render_size.height, gpu.surface_format
        );
        self.renderer = Some(Renderer { gpu, depth, scene });
        Ok(())
    }

    /// Handle `WindowEvent::Resized`.
    pub fn handle_resized(&mut self, physical_width: u32, physical_height: u32) {
        if let Some(resize) = self
            .surface_wrapper
            .handle_resize(physical_width, physical_height)
        {
            self.apply_resize(resize);
        }
    }

    /// Handle `WindowEvent::ScaleFactorChanged` with the window's new inner size.
    pub fn handle_scale_factor_changed(
        &mut self,
        scale_factor: f64,
        physical_width: u32,
        physical_height: u32,
    ) {
        if let Some(resize) = self.surface_wrapper.handle_scale_factor_changed(
            scale_factor,
            physical_width,
            physical_height,
        ) {
            self.apply_resize(resize);
        }
    }

    fn apply_resize(&mut self, resize: SurfaceResizeEvent) {
        self.camera.set_aspect_ratio(resize.aspect_ratio);

        if let Some(renderer) = &mut self.renderer {
            renderer.gpu.resize(resize.render);
            renderer.depth.resize(&renderer.gpu.device, resize.render);
        }

        info!(
            "Viewport {:.0}x{:.0}, pixel ratio {:.2}, render {}x{}",
            resize.logical_width,
            resize.logical_height,
            resize.pixel_ratio,
            resize.render.width,
            resize.render.height
        );
    }

    /// Feed accumulated pointer input into the controls and move the camera.
    fn update_camera(&mut self) {
        let drag = self.pointer.take_drag();
        if drag != glam::Vec2::ZERO {
            let height = self.surface_wrapper.physical_size().height as f32;
            self.controls.rotate(drag.x, drag.y, height);
        }
        let scroll = self.pointer.take_scroll();
        if scroll != 0.0 {
            self.controls.zoom(scroll);
        }
        self.controls.update();
        self.controls.apply_to(&mut self.camera);
    }

    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let elapsed = self.clock.begin_frame();
        let command = self.animator.tick(elapsed);
        self.update_camera();
        self.log_frame_stats(elapsed);

        let Some(renderer) = &mut self.renderer else {
            return;
        };
        renderer.scene.apply(&renderer.gpu.queue, &command);
        renderer
            .scene
            .update_camera(&renderer.gpu.queue, &self.camera);

        match renderer.gpu.get_current_texture() {
            Ok(surface_texture) => {
                let mut frame =
                    FrameEncoder::new(&renderer.gpu.device, &renderer.gpu.queue, surface_texture);
                {
                    let builder = RenderPassBuilder::new()
                        .label("globe-pass")
                        .clear_rgb(self.settings.clear_color)
                        .depth(&renderer.depth.view, DepthBuffer::CLEAR_VALUE);
                    let mut pass = frame.begin_render_pass(&builder);
                    renderer.scene.render(&mut pass);
                }
                frame.submit();
            }
            Err(SurfaceError::Lost) => {
                warn!("Surface lost after reconfigure, resizing");
                let size = self.surface_wrapper.render_size();
                renderer.gpu.resize(size);
            }
            Err(SurfaceError::Timeout) => {
                warn!("Surface acquisition timed out, skipping frame");
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory, shutting down");
                self.clock.stop();
                event_loop.exit();
            }
        }
    }

    fn log_frame_stats(&mut self, elapsed: f64) {
        if !self.config.debug.log_frame_stats {
            return;
        }
        let frames = self.clock.frame_count();
        if frames.is_multiple_of(FRAME_STATS_INTERVAL) {
            let span = elapsed - self.stats_window_start;
            if span > 0.0 {
                debug!(
                    "{:.1} fps over the last {FRAME_STATS_INTERVAL} frames",
                    FRAME_STATS_INTERVAL as f64 / span
                );
            }
            self.stats_window_start = elapsed;
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let inner_size = window.inner_size();
        self.surface_wrapper = SurfaceWrapper::new(
            inner_size.width,
            inner_size.height,
            window.scale_factor(),
            self.config.render.max_pixel_ratio,
        );
        self.camera
            .set_aspect_ratio(self.surface_wrapper.aspect_ratio());
        info!(
            "Surface wrapper initialized: {}x{} (scale: {:.2})",
            inner_size.width,
            inner_size.height,
            window.scale_factor()
        );

        if let Err(e) = self.initialize_rendering(window.clone()) {
            error!("{e}");
            self.clock.stop();
            event_loop.exit();
            return;
        }

        // The animation starts from zero once the first frame can be drawn.
        self.clock = FrameClock::new();
        window.request_redraw();
        self.window = Some(window);
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
                self.clock.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.handle_resized(new_size.width, new_size.height);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = &self.window {
                    let inner = window.inner_size();
                    self.handle_scale_factor_changed(scale_factor, inner.width, inner.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer.on_cursor_left();
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.pointer.on_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.pointer.on_scroll(delta);
            }
            WindowEvent::Touch(touch) => {
                self.pointer
                    .on_touch(touch.id, touch.phase, touch.location.x, touch.location.y);
            }
            WindowEvent::RedrawRequested => {
                if !self.clock.is_running() {
                    return;
                }
                self.render_frame(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Creates an event loop and runs the viewer until the window closes.
#[instrument(skip(config))]
pub fn run_with_config(config: Config) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::with_config(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_camera_matches_config() {
        let state = AppState::default();
        let camera = state.camera();
        assert_eq!(camera.position, Vec3::new(12.0, 5.0, 4.0));
        assert!((camera.fov_y - 25f32.to_radians()).abs() < 1e-6);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 100.0);
        assert!((camera.aspect_ratio - 1280.0 / 720.0).abs() < 1e-6);
    }

    #[test]
    fn test_resize_updates_camera_aspect() {
        let mut state = AppState::default();
        state.handle_resized(1000, 500);
        assert!((state.camera().aspect_ratio - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_high_dpi_caps_pixel_ratio() {
        let mut state = AppState::default();
        state.handle_scale_factor_changed(3.0, 3000, 1500);
        let wrapper = state.surface_wrapper();
        assert_eq!(wrapper.pixel_ratio(), 2.0);
        assert!((state.camera().aspect_ratio - 2.0).abs() < 1e-6);
        let render = wrapper.render_size();
        assert_eq!((render.width, render.height), (2000, 1000));
    }

    #[test]
    fn test_pins_built_from_registry() {
        let state = AppState::default();
        assert_eq!(state.pins.len(), 9);
        assert_eq!(state.pins.pins[0].label, Some("Berlin"));
    }

    #[test]
    fn test_rotation_rate_from_config() {
        let mut config = Config::default();
        config.globe.rotation_rate = 0.5;
        let state = AppState::with_config(config);
        assert_eq!(state.animator.rotation_rate(), 0.5);
    }
}
