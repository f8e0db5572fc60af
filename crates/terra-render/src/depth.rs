//! Reverse-Z depth target sized to the viewport's render size.

use crate::surface::PhysicalSize;

/// Depth texture paired with the swapchain image.
///
/// Near geometry has the larger depth value, so the buffer clears to 0.0 and
/// tests with `GreaterEqual`.
pub struct DepthBuffer {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    size: PhysicalSize,
}

impl DepthBuffer {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Far plane in reverse-Z.
    pub const CLEAR_VALUE: f32 = 0.0;

    pub const COMPARE_FUNCTION: wgpu::CompareFunction = wgpu::CompareFunction::GreaterEqual;

    pub fn new(device: &wgpu::Device, size: PhysicalSize) -> Self {
        let size = PhysicalSize {
            width: size.width.max(1),
            height: size.height.max(1),
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-buffer"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            size,
        }
    }

    /// Recreate the texture at a new size. Returns `false` when the size is
    /// unchanged and nothing was allocated.
    pub fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize) -> bool {
        if self.size == size {
            return false;
        }
        *self = Self::new(device, size);
        true
    }

    pub fn size(&self) -> PhysicalSize {
        self.size
    }

    /// Pipeline depth state for this buffer. Transparent passes test against
    /// depth without writing it.
    pub fn depth_stencil_state(write_enabled: bool) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format: Self::FORMAT,
            depth_write_enabled: write_enabled,
            depth_compare: Self::COMPARE_FUNCTION,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}

#[cfg(test)]
pub(crate) fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    // Returns None on machines without a usable adapter (headless CI).
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .ok()?;
        adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_z_constants() {
        assert_eq!(DepthBuffer::FORMAT, wgpu::TextureFormat::Depth32Float);
        assert_eq!(DepthBuffer::CLEAR_VALUE, 0.0);
        assert_eq!(
            DepthBuffer::COMPARE_FUNCTION,
            wgpu::CompareFunction::GreaterEqual
        );
    }

    #[test]
    fn test_depth_state_write_flag() {
        assert!(DepthBuffer::depth_stencil_state(true).depth_write_enabled);
        let transparent = DepthBuffer::depth_stencil_state(false);
        assert!(!transparent.depth_write_enabled);
        assert_eq!(transparent.depth_compare, wgpu::CompareFunction::GreaterEqual);
    }

    #[test]
    fn test_depth_texture_matches_render_size() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let size = PhysicalSize {
            width: 1600,
            height: 900,
        };
        let depth = DepthBuffer::new(&device, size);
        assert_eq!(depth.size(), size);
        assert_eq!(depth.texture.width(), 1600);
        assert!(
            depth
                .texture
                .usage()
                .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
        );
    }

    #[test]
    fn test_resize_reallocates_only_on_change() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let small = PhysicalSize {
            width: 800,
            height: 600,
        };
        let mut depth = DepthBuffer::new(&device, small);
        assert!(!depth.resize(&device, small));

        let large = PhysicalSize {
            width: 1920,
            height: 1080,
        };
        assert!(depth.resize(&device, large));
        assert_eq!(depth.size(), large);
    }
}
