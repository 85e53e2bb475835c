//! wgpu renderer for a [`Scene`].

mod pipeline;
mod shaders;
mod uniforms;

pub use pipeline::{STAR_INSTANCE_STRIDE, ScenePipelines, cull_mode};
pub use uniforms::{FrameUniform, ObjectUniform};

use celestia_render::{
    BufferAllocator, DepthBuffer, FrameEncoder, MeshBuffer, PhysicalSize, RenderContext,
    RenderPassBuilder,
};
use tracing::{debug, info};

use crate::error::RenderFailure;
use crate::geometry::{ring_mesh, sphere_mesh};
use crate::host::SceneRenderer;
use crate::scene::Scene;
use crate::texture::PlanetTexture;

/// Mesh plus its object uniform and bind group.
struct DrawObject {
    mesh: MeshBuffer,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct StarBatch {
    instances: wgpu::Buffer,
    count: u32,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

fn object_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    label: &str,
    uniform: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform.as_entire_binding(),
        }],
    })
}

/// Texture upload data: the generated map, or a single white texel when the
/// map is empty.
fn texture_upload(texture: &PlanetTexture) -> (u32, &[u8]) {
    const WHITE: [u8; 4] = [255; 4];
    if texture.is_empty() {
        let white: &'static [u8] = &WHITE;
        (1, white)
    } else {
        (texture.size, &texture.pixels)
    }
}

fn star_instances(positions: &[glam::Vec3]) -> Vec<[f32; 3]> {
    positions.iter().map(|p| p.to_array()).collect()
}

/// Draws the planet, its atmosphere and halo, and the starfield into a
/// window surface.
pub struct GpuSceneRenderer {
    context: RenderContext,
    depth: DepthBuffer,
    pass: RenderPassBuilder,
    pipelines: ScenePipelines,
    frame_uniform: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
    planet: DrawObject,
    atmosphere: DrawObject,
    halo: DrawObject,
    stars: StarBatch,
    clear_color: wgpu::Color,
}

impl GpuSceneRenderer {
    /// Upload the scene's meshes and texture. Geometry and the surface map
    /// are created once here; only uniforms and star positions change per
    /// frame.
    pub fn new(context: RenderContext, scene: &Scene, clear_color: wgpu::Color) -> Self {
        use wgpu::util::DeviceExt;

        let device = &context.device;
        let (width, height) = context.size();
        let planet_def = &scene.planet;
        let pipelines = ScenePipelines::new(
            device,
            context.surface_format,
            planet_def.atmosphere.material.side,
            planet_def.halo.material.side,
        );
        let allocator = BufferAllocator::new(device);

        let frame_uniform = allocator.create_uniform(
            "celestia-frame-uniform",
            &FrameUniform::new(&scene.camera, &scene.lights),
        );
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("celestia-frame-bg"),
            layout: &pipelines.frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_uniform.as_entire_binding(),
            }],
        });

        let (tex_size, tex_data) = texture_upload(&scene.texture);
        let texture = device.create_texture_with_data(
            &context.queue,
            &wgpu::TextureDescriptor {
                label: Some("celestia-planet-texture"),
                size: wgpu::Extent3d {
                    width: tex_size,
                    height: tex_size,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            tex_data,
        );
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("celestia-planet-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("celestia-texture-bg"),
            layout: &pipelines.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let make_object = |label: &str, mesh: crate::geometry::MeshData, uniform: ObjectUniform| {
            let uniform = allocator.create_uniform(&format!("{label}-uniform"), &uniform);
            DrawObject {
                mesh: allocator.create_mesh(label, &mesh.vertices, &mesh.indices),
                bind_group: object_bind_group(
                    device,
                    &pipelines.object_layout,
                    &format!("{label}-bg"),
                    &uniform,
                ),
                uniform,
            }
        };

        let (w_seg, h_seg) = planet_def.segments;
        let planet = make_object(
            "celestia-planet",
            sphere_mesh(planet_def.radius, w_seg, h_seg),
            ObjectUniform::physical(planet_def.world_matrix(), &planet_def.material),
        );
        let (w_seg, h_seg) = planet_def.atmosphere.segments;
        let atmosphere = make_object(
            "celestia-atmosphere",
            sphere_mesh(planet_def.atmosphere.radius, w_seg, h_seg),
            ObjectUniform::shell(
                planet_def.atmosphere_matrix(),
                &planet_def.atmosphere.material,
            ),
        );
        let halo = make_object(
            "celestia-halo",
            ring_mesh(
                planet_def.halo.inner_radius,
                planet_def.halo.outer_radius,
                planet_def.halo.segments,
            ),
            ObjectUniform::shell(planet_def.halo_matrix(), &planet_def.halo.material),
        );

        let star_uniform = allocator.create_uniform(
            "celestia-stars-uniform",
            &ObjectUniform::points(&scene.starfield.material),
        );
        let star_data = star_instances(scene.starfield.positions());
        let instances = allocator.create_dynamic_vertex(
            "celestia-star-instances",
            star_data.len() as u64 * STAR_INSTANCE_STRIDE,
        );
        if !star_data.is_empty() {
            context
                .queue
                .write_buffer(&instances, 0, bytemuck::cast_slice(&star_data));
        }
        let stars = StarBatch {
            instances,
            count: scene.starfield.len() as u32,
            bind_group: object_bind_group(
                device,
                &pipelines.object_layout,
                "celestia-stars-bg",
                &star_uniform,
            ),
            uniform: star_uniform,
        };

        let depth = DepthBuffer::new(device, width, height);
        let pass = RenderPassBuilder::new()
            .clear_color(clear_color)
            .depth(&depth)
            .label("celestia-scene-pass");

        info!(
            "Renderer ready: {}x{} {:?}, {} stars",
            width, height, context.surface_format, stars.count
        );

        Self {
            depth,
            pass,
            pipelines,
            frame_uniform,
            frame_bind_group,
            texture_bind_group,
            planet,
            atmosphere,
            halo,
            stars,
            clear_color,
            context,
        }
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    fn write_uniforms(&self, scene: &Scene) {
        let queue = &self.context.queue;
        let planet = &scene.planet;
        let write = |buffer: &wgpu::Buffer, uniform: ObjectUniform| {
            queue.write_buffer(buffer, 0, bytemuck::bytes_of(&uniform));
        };

        queue.write_buffer(
            &self.frame_uniform,
            0,
            bytemuck::bytes_of(&FrameUniform::new(&scene.camera, &scene.lights)),
        );
        write(
            &self.planet.uniform,
            ObjectUniform::physical(planet.world_matrix(), &planet.material),
        );
        write(
            &self.atmosphere.uniform,
            ObjectUniform::shell(planet.atmosphere_matrix(), &planet.atmosphere.material),
        );
        write(
            &self.halo.uniform,
            ObjectUniform::shell(planet.halo_matrix(), &planet.halo.material),
        );
        write(
            &self.stars.uniform,
            ObjectUniform::points(&scene.starfield.material),
        );
        if self.stars.count > 0 {
            let star_data = star_instances(scene.starfield.positions());
            queue.write_buffer(&self.stars.instances, 0, bytemuck::cast_slice(&star_data));
        }
    }
}

impl SceneRenderer for GpuSceneRenderer {
    fn resize(&mut self, size: PhysicalSize) {
        self.context.resize(size.width, size.height);
        let (width, height) = self.context.size();
        self.depth.resize(&self.context.device, width, height);
        self.pass = RenderPassBuilder::new()
            .clear_color(self.clear_color)
            .depth(&self.depth)
            .label("celestia-scene-pass");
        debug!("Renderer resized to {width}x{height}");
    }

    fn render(&mut self, scene: &Scene) -> Result<(), RenderFailure> {
        let surface_texture = match self.context.get_current_texture() {
            Ok(texture) => texture,
            Err(error) => {
                return match RenderFailure::from_surface_error(error) {
                    Some(failure) => Err(failure),
                    None => {
                        debug!("Surface timeout, skipping frame");
                        Ok(())
                    }
                };
            }
        };

        self.write_uniforms(scene);

        let mut frame = FrameEncoder::new(&self.context.device, surface_texture);
        {
            let mut pass = frame.begin_render_pass(&self.pass);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);

            if self.stars.count > 0 {
                pass.set_pipeline(&self.pipelines.stars);
                pass.set_bind_group(1, &self.stars.bind_group, &[]);
                pass.set_vertex_buffer(0, self.stars.instances.slice(..));
                pass.draw(0..6, 0..self.stars.count);
            }

            pass.set_pipeline(&self.pipelines.planet);
            pass.set_bind_group(1, &self.planet.bind_group, &[]);
            pass.set_bind_group(2, &self.texture_bind_group, &[]);
            self.planet.mesh.draw(&mut pass);

            pass.set_pipeline(&self.pipelines.halo);
            pass.set_bind_group(1, &self.halo.bind_group, &[]);
            self.halo.mesh.draw(&mut pass);

            pass.set_pipeline(&self.pipelines.atmosphere);
            pass.set_bind_group(1, &self.atmosphere.bind_group, &[]);
            self.atmosphere.mesh.draw(&mut pass);
        }
        frame.submit(&self.context.queue);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_texture_uploads_white_texel() {
        let empty = PlanetTexture {
            size: 0,
            pixels: Vec::new(),
        };
        let (size, data) = texture_upload(&empty);
        assert_eq!(size, 1);
        assert_eq!(data, &[255, 255, 255, 255]);
    }

    #[test]
    fn test_texture_upload_passes_pixels_through() {
        let texture = crate::texture::generate_planet_texture(4, 9);
        let (size, data) = texture_upload(&texture);
        assert_eq!(size, 4);
        assert_eq!(data.len(), 4 * 4 * 4);
    }
}
