//! Render pipelines for the planet, its shells, and the starfield.

use celestia_render::{DepthBuffer, VertexPositionNormalUv};

use super::shaders;
use super::uniforms::{FrameUniform, ObjectUniform};
use crate::scene::Side;

/// Per-instance star center.
pub const STAR_INSTANCE_STRIDE: wgpu::BufferAddress = 12;

fn star_instance_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
    wgpu::VertexBufferLayout {
        array_stride: STAR_INSTANCE_STRIDE,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &ATTRIBUTES,
    }
}

fn uniform_layout<T>(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: std::num::NonZeroU64::new(std::mem::size_of::<T>() as u64),
            },
            count: None,
        }],
    })
}

/// Face culling for a material side.
pub fn cull_mode(side: Side) -> Option<wgpu::Face> {
    match side {
        Side::Front => Some(wgpu::Face::Back),
        Side::Back => Some(wgpu::Face::Front),
        Side::Double => None,
    }
}

struct PipelineSpec<'a> {
    label: &'a str,
    module: &'a wgpu::ShaderModule,
    layout: &'a wgpu::PipelineLayout,
    vs: &'a str,
    fs: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    cull_mode: Option<wgpu::Face>,
    depth: wgpu::DepthStencilState,
}

fn create_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    spec: PipelineSpec<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(spec.layout),
        vertex: wgpu::VertexState {
            module: spec.module,
            entry_point: Some(spec.vs),
            buffers: spec.buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: spec.cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(spec.depth),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: spec.module,
            entry_point: Some(spec.fs),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

/// All pipelines and bind group layouts the scene renderer needs.
pub struct ScenePipelines {
    /// Group 0: [`FrameUniform`].
    pub frame_layout: wgpu::BindGroupLayout,
    /// Group 1: [`ObjectUniform`].
    pub object_layout: wgpu::BindGroupLayout,
    /// Group 2 of the planet pipeline: surface map and sampler.
    pub texture_layout: wgpu::BindGroupLayout,
    pub planet: wgpu::RenderPipeline,
    pub atmosphere: wgpu::RenderPipeline,
    pub halo: wgpu::RenderPipeline,
    pub stars: wgpu::RenderPipeline,
}

impl ScenePipelines {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        atmosphere_side: Side,
        halo_side: Side,
    ) -> Self {
        let frame_layout = uniform_layout::<FrameUniform>(device, "celestia-frame-bgl");
        let object_layout = uniform_layout::<ObjectUniform>(device, "celestia-object-bgl");
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("celestia-texture-bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let planet_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("celestia-planet-layout"),
            bind_group_layouts: &[&frame_layout, &object_layout, &texture_layout],
            immediate_size: 0,
        });
        let flat_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("celestia-flat-layout"),
            bind_group_layouts: &[&frame_layout, &object_layout],
            immediate_size: 0,
        });

        let planet_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("celestia-planet-shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::planet_source().into()),
        });
        let shell_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("celestia-shell-shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::shell_source().into()),
        });
        let star_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("celestia-star-shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::STARS.into()),
        });

        let mesh_buffers = [VertexPositionNormalUv::layout()];
        let star_buffers = [star_instance_layout()];

        let planet = create_pipeline(
            device,
            format,
            PipelineSpec {
                label: "celestia-planet-pipeline",
                module: &planet_module,
                layout: &planet_layout,
                vs: "vs_mesh",
                fs: "fs_planet",
                buffers: &mesh_buffers,
                cull_mode: cull_mode(Side::Front),
                depth: DepthBuffer::write_state(),
            },
        );
        let atmosphere = create_pipeline(
            device,
            format,
            PipelineSpec {
                label: "celestia-atmosphere-pipeline",
                module: &shell_module,
                layout: &flat_layout,
                vs: "vs_mesh",
                fs: "fs_shell",
                buffers: &mesh_buffers,
                cull_mode: cull_mode(atmosphere_side),
                depth: DepthBuffer::read_only_state(),
            },
        );
        let halo = create_pipeline(
            device,
            format,
            PipelineSpec {
                label: "celestia-halo-pipeline",
                module: &shell_module,
                layout: &flat_layout,
                vs: "vs_mesh",
                fs: "fs_shell",
                buffers: &mesh_buffers,
                cull_mode: cull_mode(halo_side),
                depth: DepthBuffer::read_only_state(),
            },
        );
        let stars = create_pipeline(
            device,
            format,
            PipelineSpec {
                label: "celestia-star-pipeline",
                module: &star_module,
                layout: &flat_layout,
                vs: "vs_star",
                fs: "fs_star",
                buffers: &star_buffers,
                cull_mode: None,
                depth: DepthBuffer::read_only_state(),
            },
        );

        Self {
            frame_layout,
            object_layout,
            texture_layout,
            planet,
            atmosphere,
            halo,
            stars,
        }
    }
}
