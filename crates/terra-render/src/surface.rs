//! Viewport sizing: logical window size, capped pixel ratio and render size.
//!
//! winit reports physical sizes together with a scale factor (the device
//! pixel ratio). The viewer renders at `logical size * min(dpr, cap)`, so a
//! 3x display with the default cap of 2 renders at 2x. The camera aspect is
//! always the logical width over the logical height.

/// Minimum surface dimension (prevents zero-size panics).
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Pixel dimensions of a surface or render target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

/// Produced whenever the render size, pixel ratio or aspect ratio changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceResizeEvent {
    /// Size to configure the surface and depth target with.
    pub render: PhysicalSize,
    pub logical_width: f64,
    pub logical_height: f64,
    /// `min(scale_factor, max_pixel_ratio)`.
    pub pixel_ratio: f64,
    /// `logical_width / logical_height`.
    pub aspect_ratio: f32,
}

/// Tracks window size and scale factor and derives the render target size.
///
/// Zero-size windows (Wayland before the first configure, minimized windows)
/// are clamped to 1×1 so the aspect ratio stays finite.
#[derive(Clone, Debug)]
pub struct SurfaceWrapper {
    physical: PhysicalSize,
    scale_factor: f64,
    max_pixel_ratio: f64,
    configured: bool,
}

impl SurfaceWrapper {
    /// Create from the window's physical size, scale factor and pixel ratio cap.
    pub fn new(
        physical_width: u32,
        physical_height: u32,
        scale_factor: f64,
        max_pixel_ratio: f64,
    ) -> Self {
        Self {
            physical: clamp_size(physical_width, physical_height),
            scale_factor: sanitize_ratio(scale_factor),
            max_pixel_ratio: sanitize_ratio(max_pixel_ratio),
            configured: physical_width > 0 && physical_height > 0,
        }
    }

    /// Handle `WindowEvent::Resized`. Returns `None` if nothing changed.
    pub fn handle_resize(
        &mut self,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        let physical = clamp_size(physical_width, physical_height);
        if physical == self.physical && self.configured {
            return None;
        }
        self.physical = physical;
        self.configured = true;
        Some(self.resize_event())
    }

    /// Handle `WindowEvent::ScaleFactorChanged` together with the window's new
    /// physical size.
    pub fn handle_scale_factor_changed(
        &mut self,
        scale_factor: f64,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        let scale_factor = sanitize_ratio(scale_factor);
        let physical = clamp_size(physical_width, physical_height);
        if scale_factor == self.scale_factor && physical == self.physical && self.configured {
            return None;
        }
        self.scale_factor = scale_factor;
        self.physical = physical;
        self.configured = true;
        Some(self.resize_event())
    }

    /// Snapshot of the current sizing.
    pub fn resize_event(&self) -> SurfaceResizeEvent {
        SurfaceResizeEvent {
            render: self.render_size(),
            logical_width: self.logical_width(),
            logical_height: self.logical_height(),
            pixel_ratio: self.pixel_ratio(),
            aspect_ratio: self.aspect_ratio(),
        }
    }

    pub fn physical_size(&self) -> PhysicalSize {
        self.physical
    }

    pub fn logical_width(&self) -> f64 {
        self.physical.width as f64 / self.scale_factor
    }

    pub fn logical_height(&self) -> f64 {
        self.physical.height as f64 / self.scale_factor
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Device pixel ratio used for rendering: `min(scale_factor, cap)`.
    pub fn pixel_ratio(&self) -> f64 {
        self.scale_factor.min(self.max_pixel_ratio)
    }

    pub fn aspect_ratio(&self) -> f32 {
        (self.logical_width() / self.logical_height()) as f32
    }

    /// Render target size: logical size times the capped pixel ratio.
    pub fn render_size(&self) -> PhysicalSize {
        let ratio = self.pixel_ratio();
        let scale = |logical: f64| ((logical * ratio).round() as u32).max(MIN_SURFACE_DIMENSION);
        PhysicalSize {
            width: scale(self.logical_width()),
            height: scale(self.logical_height()),
        }
    }

    /// Whether a real (non-zero) size has been seen.
    pub fn is_configured(&self) -> bool {
        self.configured
    }
}

fn clamp_size(width: u32, height: u32) -> PhysicalSize {
    PhysicalSize {
        width: width.max(MIN_SURFACE_DIMENSION),
        height: height.max(MIN_SURFACE_DIMENSION),
    }
}

/// Non-finite or non-positive ratios fall back to 1.
fn sanitize_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}
