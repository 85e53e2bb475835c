//! Per-tick animation rules.
//!
//! Everything here is a function of the scene clock and the accumulated
//! planet spin; no entity keeps a timer of its own.

use std::f64::consts::TAU;

use celestia_config::{RotationPacing, SceneConfig, StarDrift};
use glam::Vec3;

use crate::clock::FrameTime;
use crate::scene::Scene;

/// Refresh rate a per-second pacing is normalised to.
pub const REFERENCE_RATE: f64 = 60.0;

/// Motion constants for one scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    pub rotation_speed: f32,
    pub tilt_amplitude: f32,
    pub atmosphere_counter_ratio: f32,
    pub star_drift_angle: f32,
    pub halo_base_opacity: f32,
    pub halo_pulse_amplitude: f32,
    pub pulse_rate: f32,
    pub parallax_amplitude: f32,
    pub pacing: RotationPacing,
    pub drift: StarDrift,
}

impl Motion {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            rotation_speed: config.rotation_speed,
            tilt_amplitude: config.tilt_amplitude,
            atmosphere_counter_ratio: config.atmosphere_counter_ratio,
            star_drift_angle: config.star_drift_angle,
            halo_base_opacity: config.halo_base_opacity,
            halo_pulse_amplitude: config.halo_pulse_amplitude,
            pulse_rate: config.pulse_rate,
            parallax_amplitude: config.parallax_amplitude,
            pacing: config.pacing,
            drift: config.drift,
        }
    }

    /// Halo opacity at elapsed time `t`, bounded to
    /// `[base, base + amplitude]`.
    pub fn halo_opacity(&self, t: f64) -> f32 {
        let pulse = 0.5 + 0.5 * (t * self.pulse_rate as f64).sin();
        self.halo_base_opacity + self.halo_pulse_amplitude * pulse as f32
    }

    /// How many reference ticks this frame counts for.
    fn tick_scale(&self, frame: FrameTime) -> f64 {
        match self.pacing {
            RotationPacing::PerFrame => 1.0,
            RotationPacing::PerSecond => frame.delta * REFERENCE_RATE,
        }
    }
}

impl Default for Motion {
    fn default() -> Self {
        Self::from_config(&SceneConfig::default())
    }
}

/// Rotate `p` about the Z axis by `angle` radians.
pub fn rotate_z(p: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos, p.z)
}

/// Apply one tick of animation to `scene`.
pub fn advance(scene: &mut Scene, motion: &Motion, frame: FrameTime) {
    let scale = motion.tick_scale(frame);

    scene.spin += motion.rotation_speed as f64 * scale;
    let spin = scene.spin;

    // Angles are wrapped before narrowing so f32 keeps sub-step precision
    // however long the scene has run.
    let planet = &mut scene.planet;
    planet.transform.rotation.y = spin.rem_euclid(TAU) as f32;
    planet.transform.rotation.x = (spin.sin() * motion.tilt_amplitude as f64) as f32;
    planet.atmosphere.transform.rotation.y =
        -((spin * motion.atmosphere_counter_ratio as f64).rem_euclid(TAU)) as f32;
    planet.halo.material.opacity = motion.halo_opacity(frame.elapsed);

    let rigid_step = motion.star_drift_angle as f64 * scale;
    match motion.drift {
        StarDrift::Rigid => scene.starfield.advance(|_, _| rigid_step),
        StarDrift::PerStar => scene
            .starfield
            .advance(|_, speed| speed as f64 * scale),
    }

    let camera = &mut scene.camera;
    camera.position.x = (spin.sin() * motion.parallax_amplitude as f64) as f32;
    camera.look_at(Vec3::ZERO);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SceneBuilder;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn scene() -> Scene {
        SceneBuilder::new(&SceneConfig {
            star_count: 64,
            texture_size: 8,
            ..SceneConfig::default()
        })
        .build(&mut ChaCha8Rng::seed_from_u64(1))
    }

    fn frame(elapsed: f64) -> FrameTime {
        FrameTime {
            elapsed,
            delta: 1.0 / 60.0,
        }
    }

    #[test]
    fn test_rotate_z_preserves_radius() {
        let p = Vec3::new(33.0, -41.5, 12.25);
        for angle in [0.0005, 0.5, 1.234, 3.0, -2.2] {
            let q = rotate_z(p, angle);
            assert!((q.length() - p.length()).abs() < 1e-4);
            assert_eq!(q.z, p.z);
        }
    }

    #[test]
    fn test_halo_opacity_bounded() {
        let motion = Motion::default();
        let (lo, hi) = (
            motion.halo_base_opacity,
            motion.halo_base_opacity + motion.halo_pulse_amplitude,
        );
        for step in 0..20_000 {
            let t = step as f64 * 0.037;
            let opacity = motion.halo_opacity(t);
            assert!(
                opacity >= lo - 1e-6 && opacity <= hi + 1e-6,
                "opacity {opacity} at t={t}"
            );
        }
        assert!((motion.halo_opacity(0.0) - (lo + hi) / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_spin_advances_per_tick() {
        let mut scene = scene();
        let motion = Motion::default();
        for i in 1..=4 {
            advance(&mut scene, &motion, frame(i as f64 / 60.0));
        }
        assert!((scene.spin() - 4.0 * 0.0025).abs() < 1e-9);
        assert!((scene.planet.transform.rotation.y - 0.01).abs() < 1e-6);
        let tilt = (0.01f64.sin() * 0.021) as f32;
        assert!((scene.planet.transform.rotation.x - tilt).abs() < 1e-7);
    }

    #[test]
    fn test_per_second_pacing_scales_with_delta() {
        let mut scene = scene();
        let motion = Motion {
            pacing: RotationPacing::PerSecond,
            ..Motion::default()
        };
        advance(
            &mut scene,
            &motion,
            FrameTime {
                elapsed: 1.0 / 30.0,
                delta: 1.0 / 30.0,
            },
        );
        assert!((scene.spin() - 2.0 * 0.0025).abs() < 1e-9);
    }

    #[test]
    fn test_atmosphere_counter_rotates_at_different_rate() {
        let mut scene = scene();
        let motion = Motion::default();
        for i in 0..100 {
            advance(&mut scene, &motion, frame(i as f64 / 60.0));
        }
        let planet_y = scene.planet.transform.rotation.y;
        let atmosphere_y = scene.planet.atmosphere.transform.rotation.y;
        assert!(atmosphere_y < 0.0);
        assert!((atmosphere_y + planet_y * 1.01).abs() < 1e-6);
        assert!((atmosphere_y.abs() - planet_y).abs() > 1e-6);
    }

    #[test]
    fn test_stars_stay_in_shell() {
        let mut scene = scene();
        let bounds = scene.starfield.bounds();
        let motion = Motion {
            drift: StarDrift::PerStar,
            ..Motion::default()
        };
        for i in 0..5_000 {
            advance(&mut scene, &motion, frame(i as f64 / 60.0));
        }
        assert_eq!(scene.starfield.len(), 64);
        for p in scene.starfield.positions() {
            assert!(bounds.contains(*p, 1e-3));
        }
    }

    #[test]
    fn test_rigid_drift_rotates_all_stars_equally() {
        let mut scene = scene();
        let before: Vec<Vec3> = scene.starfield.positions().to_vec();
        advance(&mut scene, &Motion::default(), frame(0.0));
        for (old, new) in before.iter().zip(scene.starfield.positions()) {
            let expected = rotate_z(*old, 0.0005);
            assert!((expected - *new).length() < 1e-4);
        }
    }

    #[test]
    fn test_camera_sways_and_faces_origin() {
        let mut scene = scene();
        let motion = Motion::default();
        for i in 0..400 {
            advance(&mut scene, &motion, frame(i as f64 / 60.0));
        }
        let expected_x = (scene.spin().sin() * 0.76) as f32;
        assert!((scene.camera.position.x - expected_x).abs() < 1e-6);
        let to_origin = (-scene.camera.position).normalize();
        assert!((scene.camera.forward() - to_origin).length() < 1e-4);
    }

    #[test]
    fn test_halo_opacity_written_each_tick() {
        let mut scene = scene();
        let motion = Motion::default();
        advance(&mut scene, &motion, frame(2.0));
        assert_eq!(scene.planet.halo.material.opacity, motion.halo_opacity(2.0));
    }

    #[test]
    fn test_long_running_spin_steps_evenly() {
        let mut scene = scene();
        scene.spin = 20_000.0;
        let motion = Motion::default();
        advance(&mut scene, &motion, frame(0.0));
        let mut previous = (
            scene.planet.transform.rotation.y,
            scene.planet.atmosphere.transform.rotation.y,
        );
        for i in 1..=6 {
            advance(&mut scene, &motion, frame(i as f64 / 60.0));
            let planet_y = scene.planet.transform.rotation.y;
            let atmosphere_y = scene.planet.atmosphere.transform.rotation.y;
            let planet_step = (planet_y - previous.0).rem_euclid(std::f32::consts::TAU);
            let atmosphere_step = (previous.1 - atmosphere_y).rem_euclid(std::f32::consts::TAU);
            assert!((planet_step - 0.0025).abs() < 1e-5, "planet step {planet_step}");
            assert!(
                (atmosphere_step - 0.0025 * 1.01).abs() < 1e-5,
                "atmosphere step {atmosphere_step}"
            );
            assert!((0.0..std::f32::consts::TAU).contains(&planet_y));
            previous = (planet_y, atmosphere_y);
        }
    }
}
