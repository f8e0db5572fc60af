//! The complete globe scene and its draw order.

use terra_geo::PinGroup;
use terra_render::{Camera, CameraBinding, TextureError, TextureUploader};
use tracing::{info, instrument};

use crate::animator::RenderCommand;
use crate::atmosphere::AtmosphereRenderer;
use crate::earth::{EarthRenderer, EarthTextures};
use crate::pins::PinRenderer;
use crate::settings::GlobeSettings;

/// Earth, pins and atmosphere sharing one camera binding and one set of
/// [`GlobeSettings`].
pub struct GlobeScene {
    settings: GlobeSettings,
    camera: CameraBinding,
    earth: EarthRenderer,
    pins: PinRenderer,
    atmosphere: AtmosphereRenderer,
}

impl GlobeScene {
    #[instrument(skip_all)]
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        settings: GlobeSettings,
        textures: &EarthTextures,
        pins: &PinGroup,
    ) -> Result<Self, TextureError> {
        let camera = CameraBinding::new(device);
        let uploader = TextureUploader::new(device);

        let earth = EarthRenderer::new(
            device,
            queue,
            surface_format,
            &camera.layout,
            &settings,
            textures,
            &uploader,
        )?;
        let pin_renderer = PinRenderer::new(device, surface_format, &camera.layout, pins);
        let atmosphere =
            AtmosphereRenderer::new(device, surface_format, &camera.layout, &settings);

        info!(
            "Globe scene ready: {} segments, {} pins",
            settings.sphere_segments,
            pin_renderer.instance_count()
        );

        Ok(Self {
            settings,
            camera,
            earth,
            pins: pin_renderer,
            atmosphere,
        })
    }

    pub fn settings(&self) -> &GlobeSettings {
        &self.settings
    }

    /// Upload the transforms for one frame.
    pub fn apply(&self, queue: &wgpu::Queue, command: &RenderCommand) {
        self.earth
            .update(queue, &self.settings, command.earth_model());
        self.pins.update(queue, command.pin_group_model());
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &Camera) {
        self.camera.update(queue, camera);
    }

    /// Earth first, then pins, then the blended atmosphere on top.
    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_bind_group(0, &self.camera.bind_group, &[]);
        self.earth.render(render_pass);
        self.pins.render(render_pass);
        self.atmosphere.render(render_pass);
    }
}
