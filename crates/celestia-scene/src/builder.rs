//! Scene graph construction.

use celestia_config::SceneConfig;
use celestia_render::{Camera, PhysicalSize};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::MountError;
use crate::host::SurfaceTarget;
use crate::scene::{
    AmbientLight, Atmosphere, Color, Halo, Lights, PhysicalMaterial, Planet, PointLight,
    PointMaterial, Scene, ShellMaterial, Side, Starfield, Transform,
};
use crate::starfield::{ShellBounds, sample_starfield};
use crate::texture::paint_planet_texture;

pub const CAMERA_FOV_DEGREES: f32 = 55.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 2000.0;
pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 1.8, 17.5);

pub const PLANET_RADIUS: f32 = 5.2;
pub const ATMOSPHERE_RADIUS: f32 = 5.38;
pub const HALO_INNER_RADIUS: f32 = 7.0;
pub const HALO_OUTER_RADIUS: f32 = 12.2;
/// Offset of the halo behind the planet along the planet's local Z.
pub const HALO_OFFSET: f32 = -2.6;

/// Builds the scene graph from a [`SceneConfig`]. Pure apart from the
/// randomness it draws.
pub struct SceneBuilder<'a> {
    config: &'a SceneConfig,
    aspect_ratio: f32,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(config: &'a SceneConfig) -> Self {
        Self {
            config,
            aspect_ratio: 16.0 / 9.0,
        }
    }

    /// Initial camera aspect ratio. Ignored unless finite and positive.
    pub fn aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            self.aspect_ratio = aspect_ratio;
        }
        self
    }

    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Scene {
        let texture = paint_planet_texture(self.config.texture_size, rng);

        let (r_min, r_max) = self.config.radius_range;
        let bounds = ShellBounds::new(r_min, r_max);
        let sample = sample_starfield(rng, self.config.star_count as usize, bounds);
        debug!(
            "Sampled {} stars in shell [{}, {}]",
            sample.positions.len(),
            bounds.r_min,
            bounds.r_max
        );

        let mut camera = Camera::perspective(
            CAMERA_FOV_DEGREES,
            self.aspect_ratio,
            CAMERA_NEAR,
            CAMERA_FAR,
        );
        camera.position = CAMERA_POSITION;
        camera.look_at(Vec3::ZERO);

        let halo = Halo {
            inner_radius: HALO_INNER_RADIUS,
            outer_radius: HALO_OUTER_RADIUS,
            segments: 64,
            material: ShellMaterial {
                color: Color::from_hex(0x2291ff),
                opacity: self.config.halo_base_opacity
                    + 0.5 * self.config.halo_pulse_amplitude,
                side: Side::Double,
            },
            transform: Transform {
                translation: Vec3::new(0.0, 0.0, HALO_OFFSET),
                rotation: Vec3::new(std::f32::consts::FRAC_PI_2, 0.0, 0.0),
            },
        };

        let planet = Planet {
            radius: PLANET_RADIUS,
            segments: (48, 48),
            material: PhysicalMaterial {
                color: Color::from_hex(0x1589ff),
                roughness: 0.32,
                metalness: 0.56,
                clearcoat: 0.3,
                clearcoat_roughness: 0.23,
                sheen: 0.73,
                sheen_color: Color::from_hex(0x006aff),
                opacity: 0.99,
                transmission: 0.14,
            },
            transform: Transform::default(),
            atmosphere: Atmosphere {
                radius: ATMOSPHERE_RADIUS,
                segments: (60, 60),
                material: ShellMaterial {
                    color: Color::from_hex(0x43dfff),
                    opacity: 0.13,
                    side: Side::Back,
                },
                transform: Transform::default(),
            },
            halo,
        };

        let starfield = Starfield::new(
            sample,
            bounds,
            PointMaterial {
                color: Color::from_hex(0xbbf6fb),
                size: 0.29,
                opacity: 0.68,
            },
        );

        Scene {
            camera,
            lights: default_lights(),
            planet,
            starfield,
            texture,
            clock: Clock::new(),
            spin: 0.0,
        }
    }
}

/// Ambient fill plus a blue key light and a cyan rim light.
pub fn default_lights() -> Lights {
    Lights {
        ambient: AmbientLight {
            color: Color::from_hex(0x70aaff),
            intensity: 0.39,
        },
        points: [
            PointLight {
                color: Color::from_hex(0x0080ff),
                intensity: 1.05,
                position: Vec3::new(-13.0, 10.0, 25.0),
                range: 60.0,
                decay: 2.4,
            },
            PointLight {
                color: Color::from_hex(0x0fffc2),
                intensity: 0.78,
                position: Vec3::new(12.0, -12.0, 20.0),
                range: 40.0,
                decay: 2.1,
            },
        ],
    }
}

/// Random source for one scene: seeded from config when given, otherwise
/// from entropy.
pub fn scene_rng(config: &SceneConfig) -> ChaCha8Rng {
    let seed = config.seed.unwrap_or_else(rand::random);
    debug!("Scene seed {seed}");
    ChaCha8Rng::seed_from_u64(seed)
}

/// Build a fully wired scene and attach a renderer for it to `target`.
///
/// Fails if the configured texture is larger than the target supports or
/// the target cannot produce a usable surface.
pub fn build_scene<T: SurfaceTarget>(
    target: T,
    size: PhysicalSize,
    config: &SceneConfig,
) -> Result<(Scene, T::Renderer), MountError> {
    MountError::check_texture_size(config.texture_size, target.max_texture_size())?;
    let aspect = size.width as f32 / size.height.max(1) as f32;
    let scene = SceneBuilder::new(config)
        .aspect_ratio(aspect)
        .build(&mut scene_rng(config));
    let renderer = target.attach(&scene, size)?;
    info!(
        "Scene built: {} stars, {}px texture, {}x{} surface",
        scene.starfield.len(),
        scene.texture.size,
        size.width,
        size.height
    );
    Ok((scene, renderer))
}
