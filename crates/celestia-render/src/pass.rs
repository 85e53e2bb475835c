//! Render pass configuration and per-frame command encoding.

use crate::depth::DepthBuffer;

/// Opaque deep-space blue used when the window is not transparent.
pub const DEEP_SPACE: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.08,
    a: 1.0,
};

/// Fully transparent clear for overlay windows.
pub const TRANSPARENT: wgpu::Color = wgpu::Color::TRANSPARENT;

/// Builder for a single color + optional depth render pass.
#[derive(Debug, Clone)]
pub struct RenderPassBuilder {
    clear_color: wgpu::Color,
    depth_view: Option<wgpu::TextureView>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    pub fn new() -> Self {
        Self {
            clear_color: DEEP_SPACE,
            depth_view: None,
            label: None,
        }
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Attach a reverse-Z depth buffer, cleared to [`DepthBuffer::CLEAR_VALUE`].
    pub fn depth(mut self, depth: &DepthBuffer) -> Self {
        self.depth_view = Some(depth.view.clone());
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn begin<'encoder>(
        &'encoder self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        color_view: &'encoder wgpu::TextureView,
    ) -> wgpu::RenderPass<'encoder> {
        let color_attachment = wgpu::RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(self.clear_color),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };

        let depth_stencil_attachment =
            self.depth_view
                .as_ref()
                .map(|view| wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(DepthBuffer::CLEAR_VALUE),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// Command encoder bound to one acquired surface texture.
///
/// [`FrameEncoder::submit`] consumes the encoder, so a frame can only be
/// submitted and presented once.
pub struct FrameEncoder {
    encoder: wgpu::CommandEncoder,
    surface_texture: wgpu::SurfaceTexture,
    surface_view: wgpu::TextureView,
}

impl FrameEncoder {
    pub fn new(device: &wgpu::Device, surface_texture: wgpu::SurfaceTexture) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            encoder,
            surface_texture,
            surface_view,
        }
    }

    pub fn begin_render_pass<'a>(
        &'a mut self,
        builder: &'a RenderPassBuilder,
    ) -> wgpu::RenderPass<'a> {
        builder.begin(&mut self.encoder, &self.surface_view)
    }

    /// Submit the recorded commands and present the surface texture.
    pub fn submit(self, queue: &wgpu::Queue) {
        queue.submit(std::iter::once(self.encoder.finish()));
        self.surface_texture.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_clear_is_deep_space() {
        let builder = RenderPassBuilder::new();
        assert_eq!(builder.clear_color, DEEP_SPACE);
        assert!(builder.depth_view.is_none());
    }

    #[test]
    fn test_builder_overrides_clear_and_label() {
        let builder = RenderPassBuilder::new()
            .clear_color(TRANSPARENT)
            .label("scene");
        assert_eq!(builder.clear_color.a, 0.0);
        assert_eq!(builder.label, Some("scene"));
    }
}
