//! Vertex, index, and uniform buffer management.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Vertex and index buffers for one mesh.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    /// Bind vertex slot 0 and the index buffer, then draw all indices.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Creates GPU buffers from CPU data.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    pub fn create_mesh(
        &self,
        label: &str,
        vertices: &[VertexPositionNormalUv],
        indices: &[u32],
    ) -> MeshBuffer {
        MeshBuffer {
            vertex_buffer: self.create_init(
                &format!("{label}-vertices"),
                bytemuck::cast_slice(vertices),
                wgpu::BufferUsages::VERTEX,
            ),
            index_buffer: self.create_init(
                &format!("{label}-indices"),
                bytemuck::cast_slice(indices),
                wgpu::BufferUsages::INDEX,
            ),
            index_count: indices.len() as u32,
        }
    }

    /// Uniform buffer initialised with `value`, writable via the queue.
    pub fn create_uniform<T: Pod>(&self, label: &str, value: &T) -> wgpu::Buffer {
        self.create_init(
            label,
            bytemuck::bytes_of(value),
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        )
    }

    /// Zeroed vertex buffer of `size` bytes, rewritten each frame via the queue.
    pub fn create_dynamic_vertex(&self, label: &str, size: u64) -> wgpu::Buffer {
        self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            // wgpu rejects zero-sized bindings
            size: size.max(16),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_init(&self, label: &str, contents: &[u8], usage: wgpu::BufferUsages) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: usage | wgpu::BufferUsages::COPY_DST,
            })
    }
}

/// Vertex with position, normal, and UV coordinates.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexPositionNormalUv {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl VertexPositionNormalUv {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexPositionNormalUv>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_device;

    #[test]
    fn test_vertex_layout_stride() {
        let layout = VertexPositionNormalUv::layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes.len(), 3);
        assert_eq!(layout.attributes[2].offset, 24);
    }

    #[test]
    fn test_create_mesh_counts_indices() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let vertices = [VertexPositionNormalUv::zeroed(); 3];
        let mesh = BufferAllocator::new(&device).create_mesh("tri", &vertices, &[0, 1, 2]);
        assert_eq!(mesh.index_count, 3);
        assert_eq!(mesh.vertex_buffer.size(), 96);
    }

    #[test]
    fn test_dynamic_vertex_buffer_never_empty() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let buffer = BufferAllocator::new(&device).create_dynamic_vertex("empty", 0);
        assert!(buffer.size() > 0);
    }
}
