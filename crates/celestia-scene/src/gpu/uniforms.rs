//! Uniform blocks shared by all scene shaders.

use bytemuck::{Pod, Zeroable};
use celestia_render::Camera;
use glam::Mat4;

use crate::scene::{Lights, PhysicalMaterial, PointMaterial, ShellMaterial};

/// Per-frame data: camera and lights. Bound at group 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// Camera basis for star billboards.
    pub camera_right: [f32; 4],
    pub camera_up: [f32; 4],
    /// Linear RGB premultiplied by intensity.
    pub ambient: [f32; 4],
    /// xyz position, w range.
    pub light_position: [[f32; 4]; 2],
    /// Linear RGB premultiplied by intensity, w decay.
    pub light_color: [[f32; 4]; 2],
}

impl FrameUniform {
    pub fn new(camera: &Camera, lights: &Lights) -> Self {
        let scaled = |color: [f32; 3], intensity: f32, w: f32| {
            [
                color[0] * intensity,
                color[1] * intensity,
                color[2] * intensity,
                w,
            ]
        };
        let ambient = lights.ambient;
        let [key, rim] = lights.points;

        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_pos: camera.position.extend(1.0).to_array(),
            camera_right: camera.right().extend(0.0).to_array(),
            camera_up: camera.up().extend(0.0).to_array(),
            ambient: scaled(ambient.color.to_linear(), ambient.intensity, 0.0),
            light_position: [
                key.position.extend(key.range).to_array(),
                rim.position.extend(rim.range).to_array(),
            ],
            light_color: [
                scaled(key.color.to_linear(), key.intensity, key.decay),
                scaled(rim.color.to_linear(), rim.intensity, rim.decay),
            ],
        }
    }
}

/// Per-object data. Bound at group 1.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Linear RGB, opacity.
    pub color: [f32; 4],
    /// Roughness, metalness, clearcoat, clearcoat roughness.
    pub surface: [f32; 4],
    /// Linear sheen RGB scaled by sheen, transmission.
    pub sheen: [f32; 4],
    /// x: billboard size.
    pub params: [f32; 4],
}

fn rgba(rgb: [f32; 3], alpha: f32) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], alpha]
}

impl ObjectUniform {
    pub fn physical(model: Mat4, material: &PhysicalMaterial) -> Self {
        let sheen = material.sheen_color.to_linear().map(|c| c * material.sheen);
        Self {
            model: model.to_cols_array_2d(),
            color: rgba(material.color.to_linear(), material.opacity),
            surface: [
                material.roughness,
                material.metalness,
                material.clearcoat,
                material.clearcoat_roughness,
            ],
            sheen: rgba(sheen, material.transmission),
            params: [0.0; 4],
        }
    }

    pub fn shell(model: Mat4, material: &ShellMaterial) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: rgba(material.color.to_linear(), material.opacity),
            ..Self::zeroed()
        }
    }

    pub fn points(material: &PointMaterial) -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            color: rgba(material.color.to_linear(), material.opacity),
            params: [material.size, 0.0, 0.0, 0.0],
            ..Self::zeroed()
        }
    }
}
