//! Instanced city pins. One small sphere mesh, one instance per pin, all
//! transformed by the pin group's model matrix.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use terra_geo::PinGroup;
use terra_render::{BufferAllocator, DepthBuffer, IndexData, MeshBuffer, VertexPositionNormalUv};
use tracing::debug;

use crate::sphere::UvSphere;

/// WGSL source for the pin shader.
pub const PIN_SHADER_SOURCE: &str = include_str!("shaders/pin.wgsl");

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PinUniform {
    pub group_model: [[f32; 4]; 4],
    /// Linear RGB; alpha unused.
    pub color: [f32; 4],
}

static_assertions::assert_eq_size!(PinUniform, [u8; 80]);

impl PinUniform {
    pub fn new(group_model: Mat4, color: [f32; 3]) -> Self {
        let [r, g, b] = color;
        Self {
            group_model: group_model.to_cols_array_2d(),
            color: [r, g, b, 1.0],
        }
    }
}

/// Per-instance pin center on the unit sphere.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PinInstance {
    pub offset: [f32; 3],
}

impl PinInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![3 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Instances in pin order.
    pub fn from_group(group: &PinGroup) -> Vec<Self> {
        group
            .positions()
            .into_iter()
            .map(|offset| Self { offset })
            .collect()
    }
}

pub struct PinRenderer {
    pipeline: wgpu::RenderPipeline,
    mesh: MeshBuffer,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    color: [f32; 3],
}

impl PinRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
        group: &PinGroup,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pin-shader"),
            source: wgpu::ShaderSource::Wgsl(PIN_SHADER_SOURCE.into()),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pin-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<PinUniform>() as u64
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pin-pipeline-layout"),
            bind_group_layouts: &[camera_layout, &layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pin-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[VertexPositionNormalUv::layout(), PinInstance::layout()],
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

        let style = group.style;
        let sphere = UvSphere::new(style.radius, style.width_segments, style.height_segments);
        let allocator = BufferAllocator::new(device);
        let mesh = allocator.create_mesh("pin", &sphere.vertices, IndexData::U32(&sphere.indices));

        let mut instances = PinInstance::from_group(group);
        let instance_count = instances.len() as u32;
        if instances.is_empty() {
            // Keep the buffer non-empty; nothing is drawn with zero instances.
            instances.push(PinInstance::zeroed());
        }
        let instance_buffer = allocator.create_vertex_buffer("pin-instances", &instances);

        let uniform_buffer = allocator
            .create_uniform_buffer("pin-uniform", &PinUniform::new(Mat4::IDENTITY, style.color));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pin-bg"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        debug!("Pin renderer ready with {instance_count} instances");

        Self {
            pipeline,
            mesh,
            instance_buffer,
            instance_count,
            uniform_buffer,
            bind_group,
            color: style.color,
        }
    }

    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    pub fn update(&self, queue: &wgpu::Queue, group_model: Mat4) {
        let uniform = PinUniform::new(group_model, self.color);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.instance_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(1, &self.bind_group, &[]);
        self.mesh.bind(render_pass);
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        self.mesh.draw_instanced(render_pass, self.instance_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra_geo::{CITIES, PinStyle};

    #[test]
    fn test_instances_follow_city_order() {
        let group = PinGroup::from_cities(&CITIES, PinStyle::default());
        let instances = PinInstance::from_group(&group);
        assert_eq!(instances.len(), 9);
        for (instance, pin) in instances.iter().zip(&group.pins) {
            let expected = pin.position.as_vec3().to_array();
            assert_eq!(instance.offset, expected);
        }
    }

    #[test]
    fn test_instance_layout_uses_location_three() {
        let layout = PinInstance::layout();
        assert_eq!(layout.array_stride, 12);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
        assert_eq!(layout.attributes[0].shader_location, 3);
    }

    #[test]
    fn test_uniform_color_is_opaque() {
        let uniform = PinUniform::new(Mat4::IDENTITY, [0.0, 0.0, 1.0]);
        assert_eq!(uniform.color, [0.0, 0.0, 1.0, 1.0]);
    }
}
