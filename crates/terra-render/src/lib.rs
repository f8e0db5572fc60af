//! wgpu plumbing for the globe viewer: device and surface setup, viewport
//! sizing, camera uniforms, depth target, frame encoding and texture upload.

pub mod buffer;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod surface;
pub mod texture;

pub use buffer::{BufferAllocator, IndexData, MeshBuffer, VertexPositionNormalUv};
pub use camera::{Camera, CameraBinding, CameraUniform};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{FrameEncoder, RenderPassBuilder};
pub use surface::{PhysicalSize, SurfaceResizeEvent, SurfaceWrapper};
pub use texture::{
    ColorSpace, GpuTexture, TextureData, TextureError, TextureUploader, create_sampler,
    mip_level_count,
};
