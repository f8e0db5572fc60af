//! Textured earth sphere lit by the sun.

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use terra_config::GlobeConfig;
use terra_render::{
    BufferAllocator, ColorSpace, DepthBuffer, GpuTexture, IndexData, MeshBuffer, TextureData,
    TextureError, TextureUploader, VertexPositionNormalUv, create_sampler,
};
use tracing::{info, warn};

use crate::settings::GlobeSettings;
use crate::sphere::UvSphere;

/// WGSL source for the earth surface shader.
pub const EARTH_SHADER_SOURCE: &str = include_str!("shaders/earth.wgsl");

/// Per-frame earth material uniform (group 1, binding 0).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct EarthUniform {
    pub model: [[f32; 4]; 4],
    /// xyz is the unit sun direction.
    pub sun_direction: [f32; 4],
    pub atmosphere_day_color: [f32; 4],
    pub atmosphere_twilight_color: [f32; 4],
}

static_assertions::assert_eq_size!(EarthUniform, [u8; 112]);

impl EarthUniform {
    pub fn new(settings: &GlobeSettings, model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            sun_direction: settings.sun_direction.extend(0.0).to_array(),
            atmosphere_day_color: settings.palette.day.extend(1.0).to_array(),
            atmosphere_twilight_color: settings.palette.twilight.extend(1.0).to_array(),
        }
    }
}

/// CPU copies of the three earth maps.
#[derive(Clone, Debug)]
pub struct EarthTextures {
    pub day: TextureData,
    pub night: TextureData,
    /// Red: ocean specular mask. Green: cloud cover.
    pub specular_clouds: TextureData,
}

const FALLBACK_DAY: [u8; 4] = [28, 64, 132, 255];
const FALLBACK_NIGHT: [u8; 4] = [4, 6, 14, 255];
const FALLBACK_SPECULAR_CLOUDS: [u8; 4] = [0, 0, 0, 255];

impl EarthTextures {
    /// Load the maps named in `config`. A missing or unreadable map is
    /// replaced by a flat color so the globe still renders.
    pub fn load(config: &GlobeConfig) -> Self {
        Self {
            day: load_or_fallback(&config.day_texture_path(), FALLBACK_DAY),
            night: load_or_fallback(&config.night_texture_path(), FALLBACK_NIGHT),
            specular_clouds: load_or_fallback(
                &config.specular_clouds_texture_path(),
                FALLBACK_SPECULAR_CLOUDS,
            ),
        }
    }

    /// Flat-colored maps, used when no asset directory is available.
    pub fn fallback() -> Self {
        Self {
            day: TextureData::solid(FALLBACK_DAY),
            night: TextureData::solid(FALLBACK_NIGHT),
            specular_clouds: TextureData::solid(FALLBACK_SPECULAR_CLOUDS),
        }
    }
}

fn load_or_fallback(path: &Path, fallback: [u8; 4]) -> TextureData {
    match TextureData::load(path) {
        Ok(data) => {
            info!(
                "Loaded texture {} ({}x{})",
                path.display(),
                data.width,
                data.height
            );
            data
        }
        Err(e) => {
            warn!("Using flat fallback for {}: {e}", path.display());
            TextureData::solid(fallback)
        }
    }
}

/// Pipeline, mesh and bindings for the earth sphere.
pub struct EarthRenderer {
    pipeline: wgpu::RenderPipeline,
    mesh: MeshBuffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    // Held so the bound views stay valid.
    _textures: [GpuTexture; 3],
}

impl EarthRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
        settings: &GlobeSettings,
        textures: &EarthTextures,
        uploader: &TextureUploader,
    ) -> Result<Self, TextureError> {
        let day = uploader.upload(device, queue, "earth-day", &textures.day, ColorSpace::Srgb)?;
        let night = uploader.upload(
            device,
            queue,
            "earth-night",
            &textures.night,
            ColorSpace::Srgb,
        )?;
        let specular_clouds = uploader.upload(
            device,
            queue,
            "earth-specular-clouds",
            &textures.specular_clouds,
            ColorSpace::Linear,
        )?;
        let sampler = create_sampler(device, "earth-sampler", settings.anisotropy);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("earth-shader"),
            source: wgpu::ShaderSource::Wgsl(EARTH_SHADER_SOURCE.into()),
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("earth-bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<EarthUniform>() as u64,
                        ),
                    },
                    count: None,
                },
                texture_entry(1),
                texture_entry(2),
                texture_entry(3),
                wgpu::BindGroupLayoutEntry {
                    binding: 4,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("earth-pipeline-layout"),
            bind_group_layouts: &[camera_layout, &layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("earth-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[VertexPositionNormalUv::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(DepthBuffer::depth_stencil_state(true)),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let sphere = UvSphere::new(1.0, settings.sphere_segments, settings.sphere_segments);
        let allocator = BufferAllocator::new(device);
        let mesh = allocator.create_mesh("earth", &sphere.vertices, IndexData::U32(&sphere.indices));
        let uniform_buffer = allocator
            .create_uniform_buffer("earth-uniform", &EarthUniform::new(settings, Mat4::IDENTITY));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("earth-bg"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&day.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&night.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&specular_clouds.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Ok(Self {
            pipeline,
            mesh,
            uniform_buffer,
            bind_group,
            _textures: [day, night, specular_clouds],
        })
    }

    /// Write this frame's model matrix together with the shared settings.
    pub fn update(&self, queue: &wgpu::Queue, settings: &GlobeSettings, model: Mat4) {
        let uniform = EarthUniform::new(settings, model);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(1, &self.bind_group, &[]);
        self.mesh.bind(render_pass);
        self.mesh.draw(render_pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<EarthUniform>() % 16, 0);
    }

    #[test]
    fn test_uniform_carries_shared_settings() {
        let settings = GlobeSettings::default();
        let uniform = EarthUniform::new(&settings, Mat4::IDENTITY);
        assert_eq!(uniform.sun_direction, [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(uniform.atmosphere_day_color[..3], settings.palette.day.to_array());
        assert_eq!(
            uniform.atmosphere_twilight_color[..3],
            settings.palette.twilight.to_array()
        );
        assert_eq!(uniform.model, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn test_missing_textures_fall_back() {
        let config = GlobeConfig {
            asset_dir: "/nonexistent/terra-assets".into(),
            ..Default::default()
        };
        let textures = EarthTextures::load(&config);
        assert_eq!(textures.day, TextureData::solid(FALLBACK_DAY));
        assert_eq!(textures.night, TextureData::solid(FALLBACK_NIGHT));
        assert_eq!(
            textures.specular_clouds,
            TextureData::solid(FALLBACK_SPECULAR_CLOUDS)
        );
    }
}
