//! Vertex, index, instance and uniform buffer creation.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Indexed mesh uploaded to the GPU.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub index_format: wgpu::IndexFormat,
}

impl MeshBuffer {
    /// Bind the vertex buffer to slot 0 and the index buffer.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), self.index_format);
    }

    /// Draw `instances` copies of the mesh.
    pub fn draw_instanced(&self, render_pass: &mut wgpu::RenderPass<'_>, instances: u32) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..instances);
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        self.draw_instanced(render_pass, 1);
    }
}

/// Index data that can be either u16 or u32 format.
pub enum IndexData<'a> {
    U16(&'a [u16]),
    U32(&'a [u32]),
}

impl IndexData<'_> {
    pub fn format(&self) -> wgpu::IndexFormat {
        match self {
            IndexData::U16(_) => wgpu::IndexFormat::Uint16,
            IndexData::U32(_) => wgpu::IndexFormat::Uint32,
        }
    }

    pub fn count(&self) -> u32 {
        match self {
            IndexData::U16(data) => data.len() as u32,
            IndexData::U32(data) => data.len() as u32,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            IndexData::U16(data) => bytemuck::cast_slice(data),
            IndexData::U32(data) => bytemuck::cast_slice(data),
        }
    }
}

/// Creates labelled GPU buffers from CPU data.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    /// Upload a vertex slice and its indices as one [`MeshBuffer`].
    pub fn create_mesh<V: Pod>(&self, label: &str, vertices: &[V], indices: IndexData) -> MeshBuffer {
        MeshBuffer {
            vertex_buffer: self.create_vertex_buffer(&format!("{label}-vertices"), vertices),
            index_buffer: self.init(
                &format!("{label}-indices"),
                indices.as_bytes(),
                wgpu::BufferUsages::INDEX,
            ),
            index_count: indices.count(),
            index_format: indices.format(),
        }
    }

    /// Vertex buffer usable for per-vertex or per-instance data.
    pub fn create_vertex_buffer<V: Pod>(&self, label: &str, data: &[V]) -> wgpu::Buffer {
        self.init(
            label,
            bytemuck::cast_slice(data),
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        )
    }

    /// Uniform buffer initialised with `value`, writable every frame.
    pub fn create_uniform_buffer<T: Pod>(&self, label: &str, value: &T) -> wgpu::Buffer {
        self.init(
            label,
            bytemuck::bytes_of(value),
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        )
    }

    fn init(&self, label: &str, contents: &[u8], usage: wgpu::BufferUsages) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            })
    }
}

/// Position, normal and texture coordinate; 32 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexPositionNormalUv {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(VertexPositionNormalUv, [u8; 32]);

impl VertexPositionNormalUv {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    /// Per-vertex layout at shader locations 0 (position), 1 (normal), 2 (uv).
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_stride_and_locations() {
        let layout = VertexPositionNormalUv::layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, [0, 12, 24]);
        let locations: Vec<u32> = layout
            .attributes
            .iter()
            .map(|a| a.shader_location)
            .collect();
        assert_eq!(locations, [0, 1, 2]);
    }

    #[test]
    fn test_index_data_u16() {
        let indices = [0u16, 1, 2, 2, 3, 0];
        let data = IndexData::U16(&indices);
        assert_eq!(data.format(), wgpu::IndexFormat::Uint16);
        assert_eq!(data.count(), 6);
        assert_eq!(data.as_bytes().len(), 12);
    }

    #[test]
    fn test_index_data_u32() {
        let indices = [0u32, 1, 2];
        let data = IndexData::U32(&indices);
        assert_eq!(data.format(), wgpu::IndexFormat::Uint32);
        assert_eq!(data.count(), 3);
        assert_eq!(data.as_bytes().len(), 12);
    }

    #[test]
    fn test_create_mesh_records_index_count() {
        let Some((device, _queue)) = crate::depth::create_test_device() else {
            return;
        };
        let vertices = [VertexPositionNormalUv {
            position: [0.0; 3],
            normal: [0.0, 1.0, 0.0],
            uv: [0.0; 2],
        }; 3];
        let mesh = BufferAllocator::new(&device).create_mesh(
            "triangle",
            &vertices,
            IndexData::U16(&[0, 1, 2]),
        );
        assert_eq!(mesh.index_count, 3);
        assert_eq!(mesh.index_format, wgpu::IndexFormat::Uint16);
        assert_eq!(mesh.vertex_buffer.size(), 96);
    }
}
