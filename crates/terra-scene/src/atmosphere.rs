//! Atmosphere shell: a slightly larger sphere drawn inside-out with alpha
//! blending so only a glowing rim shows around the globe.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use terra_render::{BufferAllocator, DepthBuffer, IndexData, MeshBuffer, VertexPositionNormalUv};

use crate::settings::GlobeSettings;
use crate::sphere::UvSphere;

/// WGSL source for the atmosphere shell shader.
pub const ATMOSPHERE_SHADER_SOURCE: &str = include_str!("shaders/atmosphere.wgsl");

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct AtmosphereUniform {
    pub model: [[f32; 4]; 4],
    pub sun_direction: [f32; 4],
    pub day_color: [f32; 4],
    pub twilight_color: [f32; 4],
}

static_assertions::assert_eq_size!(AtmosphereUniform, [u8; 112]);

impl AtmosphereUniform {
    /// The shell does not spin; only its scale comes from the settings.
    pub fn new(settings: &GlobeSettings) -> Self {
        Self {
            model: shell_model(settings.atmosphere_scale).to_cols_array_2d(),
            sun_direction: settings.sun_direction.extend(0.0).to_array(),
            day_color: settings.palette.day.extend(1.0).to_array(),
            twilight_color: settings.palette.twilight.extend(1.0).to_array(),
        }
    }
}

fn shell_model(scale: f32) -> Mat4 {
    Mat4::from_scale(Vec3::splat(scale))
}

pub struct AtmosphereRenderer {
    pipeline: wgpu::RenderPipeline,
    mesh: MeshBuffer,
    bind_group: wgpu::BindGroup,
}

impl AtmosphereRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
        settings: &GlobeSettings,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("atmosphere-shader"),
            source: wgpu::ShaderSource::Wgsl(ATMOSPHERE_SHADER_SOURCE.into()),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("atmosphere-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<AtmosphereUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("atmosphere-pipeline-layout"),
            bind_group_layouts: &[camera_layout, &layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("atmosphere-pipeline"),
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
                // Back faces only: the far side of the shell, behind the globe's limb.
                cull_mode: Some(wgpu::Face::Front),
                ..Default::default()
            },
            depth_stencil: Some(DepthBuffer::depth_stencil_state(false)),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let sphere = UvSphere::new(1.0, settings.sphere_segments, settings.sphere_segments);
        let allocator = BufferAllocator::new(device);
        let mesh = allocator.create_mesh(
            "atmosphere",
            &sphere.vertices,
            IndexData::U32(&sphere.indices),
        );
        let uniform_buffer = allocator
            .create_uniform_buffer("atmosphere-uniform", &AtmosphereUniform::new(settings));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("atmosphere-bg"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            mesh,
            bind_group,
        }
    }

    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(1, &self.bind_group, &[]);
        self.mesh.bind(render_pass);
        self.mesh.draw(render_pass);
    }
}
