//! wgpu plumbing: device and surface setup, output sizing, camera, depth,
//! mesh buffers, and frame encoding.

pub mod buffer;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod surface;

pub use buffer::{BufferAllocator, MeshBuffer, VertexPositionNormalUv};
pub use camera::Camera;
pub use depth::DepthBuffer;
pub use gpu::{
    ContextOptions, RenderContext, RenderContextError, SurfaceError, init_render_context_blocking,
};
pub use pass::{DEEP_SPACE, FrameEncoder, RenderPassBuilder, TRANSPARENT};
pub use surface::{LogicalSize, OutputSurface, PhysicalSize, SurfaceResizeEvent};

/// Headless device for tests that need real GPU objects. `None` when no
/// adapter is available (e.g. CI without a GPU).
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    pub fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    force_fallback_adapter: false,
                    compatible_surface: None,
                })
                .await
                .ok()?;
            adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()
        })
    }
}
