//! The scene graph: camera, lights, the planet with its children, and the
//! starfield.

use celestia_render::Camera;
use glam::{EulerRot, Mat4, Vec3};

use crate::clock::Clock;
use crate::starfield::{ShellBounds, StarSample};
use crate::texture::PlanetTexture;

/// An sRGB color given as `0xRRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color(pub [f32; 3]);

impl Color {
    pub const fn from_hex(hex: u32) -> Self {
        Self([
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
        ])
    }

    /// Linear-light components for shading.
    pub fn to_linear(self) -> [f32; 3] {
        self.0.map(|c| {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        })
    }
}

/// Translation plus Euler rotation applied X, then Y, then Z.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    /// Rotation in radians about each local axis.
    pub rotation: Vec3,
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_euler(
                EulerRot::XYZ,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            )
    }
}

/// Which faces of a mesh are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
    Double,
}

/// Physically inspired surface parameters for the planet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicalMaterial {
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub sheen: f32,
    pub sheen_color: Color,
    pub opacity: f32,
    pub transmission: f32,
}

/// Unlit translucent material for the atmosphere and halo.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShellMaterial {
    pub color: Color,
    pub opacity: f32,
    pub side: Side,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointMaterial {
    pub color: Color,
    /// Billboard edge length in world units.
    pub size: f32,
    pub opacity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

/// Point light with distance cutoff and decay exponent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    /// Distance at which the contribution reaches zero.
    pub range: f32,
    pub decay: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lights {
    pub ambient: AmbientLight,
    pub points: [PointLight; 2],
}

/// Back-face shell slightly larger than the planet.
#[derive(Clone, Debug, PartialEq)]
pub struct Atmosphere {
    pub radius: f32,
    pub segments: (u32, u32),
    pub material: ShellMaterial,
    /// Relative to the planet.
    pub transform: Transform,
}

/// Pulsing ring behind the planet.
#[derive(Clone, Debug, PartialEq)]
pub struct Halo {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub segments: u32,
    /// `opacity` is rewritten from the clock on every tick.
    pub material: ShellMaterial,
    /// Relative to the planet.
    pub transform: Transform,
}

/// The planet owns its atmosphere and halo, so their transforms can only
/// ever be composed with the planet's.
#[derive(Clone, Debug, PartialEq)]
pub struct Planet {
    pub radius: f32,
    pub segments: (u32, u32),
    pub material: PhysicalMaterial,
    pub transform: Transform,
    pub atmosphere: Atmosphere,
    pub halo: Halo,
}

impl Planet {
    pub fn world_matrix(&self) -> Mat4 {
        self.transform.matrix()
    }

    pub fn atmosphere_matrix(&self) -> Mat4 {
        self.world_matrix() * self.atmosphere.transform.matrix()
    }

    pub fn halo_matrix(&self) -> Mat4 {
        self.world_matrix() * self.halo.transform.matrix()
    }
}

/// Fixed-size point cloud drifting about the Z axis.
///
/// Current positions are always derived from the base positions and an
/// accumulated phase, so repeated ticks cannot drift a star off its shell.
#[derive(Clone, Debug, PartialEq)]
pub struct Starfield {
    base_positions: Vec<Vec3>,
    positions: Vec<Vec3>,
    speeds: Vec<f32>,
    phases: Vec<f64>,
    bounds: ShellBounds,
    pub material: PointMaterial,
}

impl Starfield {
    pub fn new(sample: StarSample, bounds: ShellBounds, material: PointMaterial) -> Self {
        let phases = vec![0.0; sample.positions.len()];
        Self {
            positions: sample.positions.clone(),
            base_positions: sample.positions,
            speeds: sample.speeds,
            phases,
            bounds,
            material,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn speeds(&self) -> &[f32] {
        &self.speeds
    }

    pub fn bounds(&self) -> ShellBounds {
        self.bounds
    }

    /// Advance each star's phase by `step(index, speed)` and recompute its
    /// position in place.
    pub(crate) fn advance(&mut self, mut step: impl FnMut(usize, f32) -> f64) {
        for (i, ((position, base), phase)) in self
            .positions
            .iter_mut()
            .zip(&self.base_positions)
            .zip(self.phases.iter_mut())
            .enumerate()
        {
            *phase = (*phase + step(i, self.speeds[i])).rem_euclid(std::f64::consts::TAU);
            *position = crate::motion::rotate_z(*base, *phase as f32);
        }
    }
}

/// Everything one mount renders.
pub struct Scene {
    pub camera: Camera,
    pub lights: Lights,
    pub planet: Planet,
    pub starfield: Starfield,
    /// Surface map for the planet, generated once per scene.
    pub texture: PlanetTexture,
    pub clock: Clock,
    /// Accumulated planet spin in radians.
    pub(crate) spin: f64,
}

impl Scene {
    pub fn spin(&self) -> f64 {
        self.spin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex(0xff0000).0, [1.0, 0.0, 0.0]);
        let c = Color::from_hex(0x2291ff).0;
        assert!((c[1] - 0x91 as f32 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_linear_conversion_endpoints() {
        assert_eq!(Color::from_hex(0x000000).to_linear(), [0.0, 0.0, 0.0]);
        let white = Color::from_hex(0xffffff).to_linear();
        assert!(white.iter().all(|c| (c - 1.0).abs() < 1e-5));
        let mid = Color::from_hex(0x808080).to_linear()[0];
        assert!((mid - 0.2158).abs() < 1e-3);
    }

    #[test]
    fn test_child_transform_follows_parent() {
        let mut parent = Transform::default();
        parent.rotation.y = FRAC_PI_2;
        let child = Transform {
            translation: Vec3::new(0.0, 0.0, -2.6),
            rotation: Vec3::new(FRAC_PI_2, 0.0, 0.0),
        };
        let world = parent.matrix() * child.matrix();
        let origin = world.transform_point3(Vec3::ZERO);
        // Rotating the parent a quarter turn about Y swings -Z to -X.
        assert!((origin - Vec3::new(-2.6, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_starfield_advance_keeps_radius() {
        let sample = StarSample {
            positions: vec![Vec3::new(40.0, 0.0, 3.0), Vec3::new(-20.0, 30.0, -9.0)],
            speeds: vec![0.001, 0.0012],
        };
        let material = PointMaterial {
            color: Color::from_hex(0xffffff),
            size: 0.3,
            opacity: 1.0,
        };
        let mut field = Starfield::new(sample.clone(), ShellBounds::new(34.0, 64.0), material);
        for _ in 0..10_000 {
            field.advance(|_, speed| speed as f64);
        }
        for (p, base) in field.positions().iter().zip(&sample.positions) {
            assert!((p.length() - base.length()).abs() < 1e-4);
            assert_eq!(p.z, base.z);
        }
        assert_eq!(field.len(), 2);
    }
}
